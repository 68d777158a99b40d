// SPDX-FileCopyrightText: 2026 Relink Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Storage keys and re-exported record types.
//!
//! The record types live in `relink-core::types` so they can cross the
//! adapter trait boundary.

pub use relink_core::types::{Conversation, EmotionCheckIn};

/// Document holding the conversation history.
pub const CONVERSATIONS_KEY: &str = "relink_conversations";

/// Document holding the emotion check-in journal.
pub const CHECK_INS_KEY: &str = "relink_checkins";
