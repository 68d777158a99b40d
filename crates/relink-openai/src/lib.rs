// SPDX-FileCopyrightText: 2026 Relink Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! OpenAI provider adapter for Relink.
//!
//! This crate implements [`ProviderAdapter`] on top of the Chat Completions
//! API. Every wizard call is a single non-streaming completion.

pub mod client;
pub mod types;

use std::time::Duration;

use async_trait::async_trait;
use relink_config::model::OpenAiConfig;
use relink_core::error::RelinkError;
use relink_core::traits::{PluginAdapter, ProviderAdapter};
use relink_core::types::{
    AdapterType, CompletionRequest, CompletionResponse, HealthStatus, TokenUsage,
};
use secrecy::SecretString;
use tracing::{debug, info};

use crate::client::OpenAiClient;
use crate::types::{ApiMessage, ChatCompletionRequest};

/// OpenAI provider implementing [`ProviderAdapter`].
///
/// API key resolution order: config -> `OPENAI_API_KEY` env var -> error.
pub struct OpenAiProvider {
    client: OpenAiClient,
    model: String,
}

impl OpenAiProvider {
    /// Creates a new provider from the `[openai]` configuration section.
    ///
    /// Fails with [`RelinkError::Config`] when no usable API key is found.
    pub fn new(config: &OpenAiConfig) -> Result<Self, RelinkError> {
        let api_key = config.resolved_api_key().ok_or_else(|| {
            RelinkError::Config(
                "OpenAI API key not found. Set openai.api_key in config or the OPENAI_API_KEY environment variable.".into(),
            )
        })?;
        let api_key = SecretString::from(api_key);

        let client = OpenAiClient::new(
            &api_key,
            &config.base_url,
            Duration::from_secs(config.timeout_secs),
        )?;

        info!(model = config.model, base_url = config.base_url, "OpenAI provider initialized");

        Ok(Self {
            client,
            model: config.model.clone(),
        })
    }

    /// Creates a provider with an existing client.
    pub fn with_client(client: OpenAiClient, model: impl Into<String>) -> Self {
        Self {
            client,
            model: model.into(),
        }
    }

    /// Converts a [`CompletionRequest`] into the wire request.
    ///
    /// The system instruction, when present, becomes the first message.
    fn to_api_request(&self, request: &CompletionRequest) -> ChatCompletionRequest {
        let mut messages = Vec::with_capacity(request.messages.len() + 1);
        if let Some(system) = &request.system {
            messages.push(ApiMessage::new("system", system.clone()));
        }
        messages.extend(
            request
                .messages
                .iter()
                .map(|m| ApiMessage::new(m.role.as_str(), m.content.clone())),
        );

        ChatCompletionRequest {
            model: request.model.clone().unwrap_or_else(|| self.model.clone()),
            messages,
            temperature: request.temperature,
            max_tokens: request.max_tokens,
        }
    }
}

#[async_trait]
impl PluginAdapter for OpenAiProvider {
    fn name(&self) -> &str {
        "openai"
    }

    fn version(&self) -> semver::Version {
        semver::Version::new(0, 1, 0)
    }

    fn adapter_type(&self) -> AdapterType {
        AdapterType::Provider
    }

    async fn health_check(&self) -> Result<HealthStatus, RelinkError> {
        // Avoid spending tokens on health checks.
        Ok(HealthStatus::Healthy)
    }

    async fn shutdown(&self) -> Result<(), RelinkError> {
        debug!("OpenAI provider shutting down");
        Ok(())
    }
}

#[async_trait]
impl ProviderAdapter for OpenAiProvider {
    async fn complete(
        &self,
        request: CompletionRequest,
    ) -> Result<CompletionResponse, RelinkError> {
        let api_request = self.to_api_request(&request);
        let response = self.client.complete(&api_request).await?;

        let content = response.first_text().trim().to_string();
        let finish_reason = response.choices.first().and_then(|c| c.finish_reason.clone());
        let usage = response.usage.unwrap_or_default();

        Ok(CompletionResponse {
            id: response.id,
            content,
            model: response.model,
            finish_reason,
            usage: TokenUsage {
                prompt_tokens: usage.prompt_tokens,
                completion_tokens: usage.completion_tokens,
            },
        })
    }
}
