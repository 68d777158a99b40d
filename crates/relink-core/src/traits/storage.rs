// SPDX-FileCopyrightText: 2026 Relink Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Storage adapter trait for the conversation history and check-in journal.

use async_trait::async_trait;

use crate::error::RelinkError;
use crate::traits::adapter::PluginAdapter;
use crate::types::{Conversation, EmotionCheckIn};

/// Adapter for persistence backends.
///
/// Both collections are small ordered lists. Reads never fail on corrupt
/// data: an unreadable collection loads as empty.
#[async_trait]
pub trait StorageAdapter: PluginAdapter {
    /// Initializes the storage backend (migrations, connection setup).
    async fn initialize(&self) -> Result<(), RelinkError>;

    /// Closes the storage backend, releasing the connection.
    async fn close(&self) -> Result<(), RelinkError>;

    /// Saves a conversation, replacing any stored one with the same id.
    /// New conversations are placed at the front of the list.
    async fn save_conversation(&self, conversation: &Conversation) -> Result<(), RelinkError>;

    /// All conversations, newest first.
    async fn conversations(&self) -> Result<Vec<Conversation>, RelinkError>;

    /// A single conversation by id.
    async fn conversation(&self, id: &str) -> Result<Option<Conversation>, RelinkError>;

    /// Appends a check-in to the journal.
    async fn save_check_in(&self, check_in: &EmotionCheckIn) -> Result<(), RelinkError>;

    /// All check-ins, newest first.
    async fn check_ins(&self) -> Result<Vec<EmotionCheckIn>, RelinkError>;

    /// The `count` most recent conversations.
    async fn recent_conversations(&self, count: usize) -> Result<Vec<Conversation>, RelinkError> {
        let mut all = self.conversations().await?;
        all.truncate(count);
        Ok(all)
    }

    /// Check-ins dated within the seven days before `now_ms`.
    async fn weekly_check_ins(&self, now_ms: i64) -> Result<Vec<EmotionCheckIn>, RelinkError> {
        let since = now_ms - WEEK_MS;
        Ok(self
            .check_ins()
            .await?
            .into_iter()
            .filter(|c| c.date >= since)
            .collect())
    }
}

const WEEK_MS: i64 = 7 * 24 * 60 * 60 * 1000;
