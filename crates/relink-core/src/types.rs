// SPDX-FileCopyrightText: 2026 Relink Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Common types shared by the wizard, storage, and gateway crates.
//!
//! Wire and persisted JSON uses camelCase field names so stored documents and
//! API bodies stay readable by the web client without translation.

use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};

/// Health status reported by adapter health checks.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HealthStatus {
    /// Adapter is fully operational.
    Healthy,
    /// Adapter is operational but experiencing issues.
    Degraded(String),
    /// Adapter is not operational.
    Unhealthy(String),
}

/// Identifies the type of adapter.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumString, Serialize, Deserialize,
)]
pub enum AdapterType {
    Provider,
    Storage,
}

// --- Wizard stages ---

/// One step of the guided conversation.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumString, Serialize, Deserialize,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum Stage {
    Observation,
    Feeling,
    Need,
    Empathy,
    Result,
}

impl Stage {
    /// The stage that normally follows this one. `Result` is terminal.
    pub fn next(self) -> Stage {
        match self {
            Stage::Observation => Stage::Feeling,
            Stage::Feeling => Stage::Need,
            Stage::Need => Stage::Empathy,
            Stage::Empathy | Stage::Result => Stage::Result,
        }
    }

    /// Whether the client should allow picking several options at this stage.
    pub fn is_multi_select(self) -> bool {
        matches!(self, Stage::Feeling | Stage::Need)
    }
}

// --- Chat messages ---

/// Author of a chat message on the wire.
///
/// Accepts the legacy `ai` spelling; any unknown role is treated as the
/// assistant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase", from = "String")]
pub enum Role {
    User,
    Assistant,
}

impl From<String> for Role {
    fn from(value: String) -> Self {
        match value.as_str() {
            "user" => Role::User,
            _ => Role::Assistant,
        }
    }
}

impl Role {
    /// Role string used by chat-completion APIs.
    pub fn as_str(self) -> &'static str {
        match self {
            Role::User => "user",
            Role::Assistant => "assistant",
        }
    }
}

/// A single message of the wizard conversation as sent by the client.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatMessage {
    pub role: Role,
    #[serde(default)]
    pub content: String,
}

impl ChatMessage {
    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: Role::User,
            content: content.into(),
        }
    }

    pub fn assistant(content: impl Into<String>) -> Self {
        Self {
            role: Role::Assistant,
            content: content.into(),
        }
    }
}

// --- Derived wizard data ---

/// Facts extracted from the conversation so far.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConversationData {
    /// The most concrete description of the situation the user gave.
    pub specific_situation: String,
    /// Emotions picked at the feeling stage, in selection order.
    pub selected_emotions: Vec<String>,
    /// Needs picked at the need stage, in selection order.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub selected_needs: Vec<String>,
}

/// The four NVC parts plus the composed message.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NvcData {
    pub observation: String,
    pub emotions: String,
    pub needs: String,
    pub request: String,
    pub full_message: String,
}

// --- Persisted records ---

/// Author of a persisted transcript message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Speaker {
    User,
    Ai,
}

impl From<Role> for Speaker {
    fn from(role: Role) -> Self {
        match role {
            Role::User => Speaker::User,
            Role::Assistant => Speaker::Ai,
        }
    }
}

/// A transcript entry stored with a [`Conversation`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TranscriptMessage {
    pub role: Speaker,
    pub content: String,
    /// Milliseconds since the Unix epoch.
    pub timestamp: i64,
}

/// Terminal marker stored with a conversation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum ConversationStage {
    Observation,
    Emotion,
    Need,
    Request,
    Conversion,
    Complete,
}

/// A finished wizard run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Conversation {
    pub id: String,
    /// Milliseconds since the Unix epoch.
    pub date: i64,
    pub situation: String,
    pub observation: String,
    pub emotion: String,
    pub need: String,
    pub request: String,
    pub conversion_text: String,
    pub messages: Vec<TranscriptMessage>,
    pub stage: ConversationStage,
}

impl Conversation {
    /// Builds the record saved at the end of a wizard run.
    ///
    /// `transcript` is the conversation as sent by the client; the final
    /// assistant reply and the composed message are appended after it.
    pub fn completed(
        id: String,
        now_ms: i64,
        transcript: &[ChatMessage],
        reply: &str,
        nvc: &NvcData,
    ) -> Self {
        let mut messages: Vec<TranscriptMessage> = transcript
            .iter()
            .map(|m| TranscriptMessage {
                role: m.role.into(),
                content: m.content.clone(),
                timestamp: now_ms,
            })
            .collect();
        for content in [reply, nvc.full_message.as_str()] {
            messages.push(TranscriptMessage {
                role: Speaker::Ai,
                content: content.to_string(),
                timestamp: now_ms,
            });
        }

        Self {
            id,
            date: now_ms,
            situation: nvc.observation.clone(),
            observation: nvc.observation.clone(),
            emotion: nvc.emotions.clone(),
            need: nvc.needs.clone(),
            request: nvc.request.clone(),
            conversion_text: nvc.full_message.clone(),
            messages,
            stage: ConversationStage::Complete,
        }
    }
}

/// Top-level mood family of a check-in.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumString, Serialize, Deserialize,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum MainCategory {
    Uncomfortable,
    Pleasant,
}

/// One mood-journal entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EmotionCheckIn {
    pub id: String,
    /// Milliseconds since the Unix epoch.
    pub date: i64,
    pub main_category: MainCategory,
    pub sub_category: String,
    pub emotion: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub situation: Option<String>,
}

impl EmotionCheckIn {
    /// Creates a check-in stamped at `now_ms`. A blank situation note is dropped.
    pub fn new(
        now_ms: i64,
        main_category: MainCategory,
        sub_category: impl Into<String>,
        emotion: impl Into<String>,
        situation: Option<String>,
    ) -> Self {
        let situation = situation
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty());
        Self {
            id: format!("checkin_{now_ms}"),
            date: now_ms,
            main_category,
            sub_category: sub_category.into(),
            emotion: emotion.into(),
            situation,
        }
    }
}

// --- Provider request/response ---

/// A request to a text-completion provider.
#[derive(Debug, Clone)]
pub struct CompletionRequest {
    /// Overrides the provider's default model when set.
    pub model: Option<String>,
    /// System instruction placed before the conversation.
    pub system: Option<String>,
    pub messages: Vec<ChatMessage>,
    pub temperature: f32,
    pub max_tokens: u32,
}

impl CompletionRequest {
    /// A single-turn request: one system instruction and one user message.
    pub fn single_turn(system: impl Into<String>, user: impl Into<String>, max_tokens: u32) -> Self {
        Self {
            model: None,
            system: Some(system.into()),
            messages: vec![ChatMessage::user(user)],
            temperature: 0.7,
            max_tokens,
        }
    }
}

/// Token accounting reported by the provider.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TokenUsage {
    pub prompt_tokens: u32,
    pub completion_tokens: u32,
}

/// A response from a text-completion provider.
#[derive(Debug, Clone)]
pub struct CompletionResponse {
    pub id: String,
    /// Generated text; empty when the model produced nothing.
    pub content: String,
    pub model: String,
    pub finish_reason: Option<String>,
    pub usage: TokenUsage,
}
