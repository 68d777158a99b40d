// SPDX-FileCopyrightText: 2026 Relink Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! HTTP gateway for Relink.
//!
//! Exposes the wizard turn endpoint alongside the conversation history and
//! the emotion check-in journal. Handlers share the wizard and the storage
//! handle; every turn is answered from the transcript the client sends.

pub mod error;
pub mod extract;
pub mod handlers;
pub mod server;
pub mod shutdown;

pub use error::ApiError;
pub use extract::{ApiJson, ApiQuery};
pub use server::{AppState, ServerConfig, router, start_server};
pub use shutdown::install_signal_handler;
