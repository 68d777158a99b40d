// SPDX-FileCopyrightText: 2026 Relink Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! SQLite persistence layer for Relink.
//!
//! Stores the conversation history and the emotion check-in journal as two
//! JSON array documents in a WAL-mode SQLite database with embedded
//! migrations and a single-writer connection via `tokio-rusqlite`.

pub mod adapter;
pub mod database;
pub mod migrations;
pub mod models;
pub mod queries;
pub mod summary;

pub use adapter::SqliteStorage;
pub use database::Database;
pub use models::*;
pub use summary::{DaySummary, weekly_days};
