// SPDX-FileCopyrightText: 2026 Relink Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Mock completion provider for deterministic testing.
//!
//! `MockProvider` implements `ProviderAdapter` with pre-configured answers,
//! enabling fast, CI-runnable tests without external API calls.

use std::collections::VecDeque;
use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::Mutex;

use relink_core::traits::adapter::PluginAdapter;
use relink_core::traits::provider::ProviderAdapter;
use relink_core::types::{
    AdapterType, CompletionRequest, CompletionResponse, HealthStatus, TokenUsage,
};
use relink_core::{ProviderErrorKind, RelinkError};

/// Text returned once the scripted queue is exhausted.
pub const DEFAULT_RESPONSE: &str = "mock response";

/// A mock provider that replays scripted outcomes.
///
/// Outcomes are popped from a FIFO queue. When the queue is empty,
/// [`DEFAULT_RESPONSE`] is returned. Every request is recorded so tests can
/// assert on prompts and token budgets.
pub struct MockProvider {
    outcomes: Arc<Mutex<VecDeque<Result<String, ProviderErrorKind>>>>,
    requests: Arc<Mutex<Vec<CompletionRequest>>>,
}

impl MockProvider {
    /// Create a new mock provider with an empty queue.
    pub fn new() -> Self {
        Self {
            outcomes: Arc::new(Mutex::new(VecDeque::new())),
            requests: Arc::new(Mutex::new(Vec::new())),
        }
    }

    /// Create a mock provider pre-loaded with the given answers.
    pub fn with_responses(responses: Vec<String>) -> Self {
        Self {
            outcomes: Arc::new(Mutex::new(responses.into_iter().map(Ok).collect())),
            requests: Arc::new(Mutex::new(Vec::new())),
        }
    }

    /// Queue an answer.
    pub async fn push_response(&self, text: impl Into<String>) {
        self.outcomes.lock().await.push_back(Ok(text.into()));
    }

    /// Queue a failure of the given kind.
    pub async fn push_failure(&self, kind: ProviderErrorKind) {
        self.outcomes.lock().await.push_back(Err(kind));
    }

    /// Requests received so far, oldest first.
    pub async fn requests(&self) -> Vec<CompletionRequest> {
        self.requests.lock().await.clone()
    }

    /// Number of scripted outcomes not yet consumed.
    pub async fn remaining(&self) -> usize {
        self.outcomes.lock().await.len()
    }

    async fn next_outcome(&self) -> Result<String, ProviderErrorKind> {
        self.outcomes
            .lock()
            .await
            .pop_front()
            .unwrap_or_else(|| Ok(DEFAULT_RESPONSE.to_string()))
    }
}

impl Default for MockProvider {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl PluginAdapter for MockProvider {
    fn name(&self) -> &str {
        "mock-provider"
    }

    fn version(&self) -> semver::Version {
        semver::Version::new(0, 1, 0)
    }

    fn adapter_type(&self) -> AdapterType {
        AdapterType::Provider
    }

    async fn health_check(&self) -> Result<HealthStatus, RelinkError> {
        Ok(HealthStatus::Healthy)
    }

    async fn shutdown(&self) -> Result<(), RelinkError> {
        Ok(())
    }
}

#[async_trait]
impl ProviderAdapter for MockProvider {
    async fn complete(&self, request: CompletionRequest) -> Result<CompletionResponse, RelinkError> {
        let model = request.model.clone().unwrap_or_else(|| "mock-model".to_string());
        self.requests.lock().await.push(request);

        let text = self
            .next_outcome()
            .await
            .map_err(|kind| RelinkError::provider(kind, format!("mock failure: {kind:?}")))?;

        Ok(CompletionResponse {
            id: format!("mock-resp-{}", uuid::Uuid::new_v4()),
            content: text,
            model,
            finish_reason: Some("stop".to_string()),
            usage: TokenUsage {
                prompt_tokens: 10,
                completion_tokens: 20,
            },
        })
    }
}
