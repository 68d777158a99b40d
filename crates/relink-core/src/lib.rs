// SPDX-FileCopyrightText: 2026 Relink Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Core library for Relink.
//!
//! This crate provides the adapter traits, error type, domain types, and the
//! fixed emotion taxonomy used throughout the Relink workspace.

pub mod error;
pub mod taxonomy;
pub mod traits;
pub mod types;

// Re-export key items at crate root for ergonomic imports.
pub use error::{ProviderErrorKind, RelinkError};
pub use types::{
    AdapterType, ChatMessage, CompletionRequest, CompletionResponse, Conversation,
    ConversationData, ConversationStage, EmotionCheckIn, HealthStatus, MainCategory, NvcData,
    Role, Speaker, Stage, TokenUsage, TranscriptMessage,
};

pub use traits::{PluginAdapter, ProviderAdapter, StorageAdapter};
