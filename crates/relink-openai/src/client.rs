// SPDX-FileCopyrightText: 2026 Relink Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! HTTP client for the OpenAI Chat Completions API.
//!
//! Provides [`OpenAiClient`] which handles request construction,
//! bearer authentication, transient error retry, and failure classification.

use std::time::Duration;

use relink_core::{ProviderErrorKind, RelinkError};
use reqwest::StatusCode;
use reqwest::header::{HeaderMap, HeaderValue};
use secrecy::{ExposeSecret, SecretString};
use tracing::{debug, warn};

use crate::types::{ApiErrorResponse, ChatCompletionRequest, ChatCompletionResponse};

/// HTTP client for OpenAI API communication.
///
/// Manages authentication headers, connection pooling, and retry logic
/// for transient errors (429, 500, 503).
#[derive(Debug, Clone)]
pub struct OpenAiClient {
    client: reqwest::Client,
    endpoint: String,
    timeout: Duration,
    max_retries: u32,
    retry_delay: Duration,
}

impl OpenAiClient {
    /// Creates a new client.
    ///
    /// `base_url` is the API root such as `https://api.openai.com/v1`; the
    /// `/chat/completions` path is appended.
    pub fn new(
        api_key: &SecretString,
        base_url: &str,
        timeout: Duration,
    ) -> Result<Self, RelinkError> {
        let mut auth = HeaderValue::from_str(&format!("Bearer {}", api_key.expose_secret()))
            .map_err(|e| RelinkError::Config(format!("invalid API key header value: {e}")))?;
        auth.set_sensitive(true);

        let mut headers = HeaderMap::new();
        headers.insert(reqwest::header::AUTHORIZATION, auth);
        headers.insert(
            reqwest::header::CONTENT_TYPE,
            HeaderValue::from_static("application/json"),
        );

        let client = reqwest::Client::builder()
            .default_headers(headers)
            .timeout(timeout)
            .build()
            .map_err(|e| RelinkError::Provider {
                kind: ProviderErrorKind::Other,
                message: format!("failed to build HTTP client: {e}"),
                source: Some(Box::new(e)),
            })?;

        Ok(Self {
            client,
            endpoint: format!("{}/chat/completions", base_url.trim_end_matches('/')),
            timeout,
            max_retries: 1,
            retry_delay: Duration::from_secs(1),
        })
    }

    /// Overrides the pause before a retry.
    pub fn with_retry_delay(mut self, delay: Duration) -> Self {
        self.retry_delay = delay;
        self
    }

    /// Sends a completion request and returns the full response.
    ///
    /// On transient errors (429 other than quota exhaustion, 500, 503),
    /// retries once after the retry delay.
    pub async fn complete(
        &self,
        request: &ChatCompletionRequest,
    ) -> Result<ChatCompletionResponse, RelinkError> {
        let mut last_error = None;

        for attempt in 0..=self.max_retries {
            if attempt > 0 {
                warn!(attempt, "retrying completion request after transient error");
                tokio::time::sleep(self.retry_delay).await;
            }

            let response = self
                .client
                .post(&self.endpoint)
                .json(request)
                .send()
                .await
                .map_err(|e| self.transport_error(e))?;

            let status = response.status();
            debug!(status = %status, attempt, model = %request.model, "completion response received");

            if status.is_success() {
                let body = response.text().await.map_err(|e| self.transport_error(e))?;
                return serde_json::from_str(&body).map_err(|e| RelinkError::Provider {
                    kind: ProviderErrorKind::Other,
                    message: format!("failed to parse API response: {e}"),
                    source: Some(Box::new(e)),
                });
            }

            let body = response.text().await.unwrap_or_default();
            let error = api_error(status, &body);

            let quota = error.provider_kind() == Some(ProviderErrorKind::QuotaExceeded);
            if is_transient_error(status) && !quota && attempt < self.max_retries {
                warn!(status = %status, "transient error, will retry");
                last_error = Some(error);
                continue;
            }

            return Err(error);
        }

        Err(last_error.unwrap_or_else(|| {
            RelinkError::provider(
                ProviderErrorKind::Other,
                "completion request failed after retries",
            )
        }))
    }

    fn transport_error(&self, e: reqwest::Error) -> RelinkError {
        if e.is_timeout() {
            return RelinkError::Timeout {
                duration: self.timeout,
            };
        }
        RelinkError::Provider {
            kind: ProviderErrorKind::Other,
            message: format!("HTTP request failed: {e}"),
            source: Some(Box::new(e)),
        }
    }
}

/// Returns true for HTTP status codes that indicate transient errors worth retrying.
fn is_transient_error(status: StatusCode) -> bool {
    matches!(status.as_u16(), 429 | 500 | 503)
}

/// Builds a provider error from a non-success response.
fn api_error(status: StatusCode, body: &str) -> RelinkError {
    match serde_json::from_str::<ApiErrorResponse>(body) {
        Ok(parsed) => {
            let detail = parsed.error;
            let kind = classify(status, detail.code.as_deref(), detail.type_.as_deref(), &detail.message);
            let label = detail
                .code
                .or(detail.type_)
                .unwrap_or_else(|| status.as_u16().to_string());
            RelinkError::provider(kind, format!("OpenAI API error ({label}): {}", detail.message))
        }
        Err(_) => RelinkError::provider(
            classify(status, None, None, body),
            format!("API returned {status}: {body}"),
        ),
    }
}

/// Maps an error response to the most specific failure kind.
pub(crate) fn classify(
    status: StatusCode,
    code: Option<&str>,
    type_: Option<&str>,
    message: &str,
) -> ProviderErrorKind {
    let tags = [code.unwrap_or(""), type_.unwrap_or("")];
    let lower = message.to_lowercase();

    if tags.contains(&"insufficient_quota")
        || lower.contains("quota")
        || lower.contains("billing")
    {
        return ProviderErrorKind::QuotaExceeded;
    }
    if status == StatusCode::UNAUTHORIZED || tags.contains(&"invalid_api_key") {
        return ProviderErrorKind::InvalidApiKey;
    }
    if status == StatusCode::TOO_MANY_REQUESTS || tags.contains(&"rate_limit_exceeded") {
        return ProviderErrorKind::RateLimited;
    }
    if status == StatusCode::NOT_FOUND
        || tags.contains(&"model_not_found")
        || lower.contains("does not exist")
    {
        return ProviderErrorKind::ModelUnavailable;
    }
    ProviderErrorKind::Other
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::ApiMessage;
    use wiremock::matchers::{header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn test_client(base_url: &str) -> OpenAiClient {
        OpenAiClient::new(
            &SecretString::from("sk-test-key".to_string()),
            base_url,
            Duration::from_secs(5),
        )
        .unwrap()
        .with_retry_delay(Duration::from_millis(10))
    }

    fn test_request() -> ChatCompletionRequest {
        ChatCompletionRequest {
            model: "gpt-3.5-turbo".into(),
            messages: vec![ApiMessage::new("user", "안녕하세요")],
            temperature: 0.7,
            max_tokens: 100,
        }
    }

    fn success_body(text: &str) -> serde_json::Value {
        serde_json::json!({
            "id": "chatcmpl-test",
            "object": "chat.completion",
            "model": "gpt-3.5-turbo",
            "choices": [{
                "index": 0,
                "message": {"role": "assistant", "content": text},
                "finish_reason": "stop"
            }],
            "usage": {"prompt_tokens": 10, "completion_tokens": 5, "total_tokens": 15}
        })
    }

    fn error_body(message: &str, type_: &str, code: &str) -> serde_json::Value {
        serde_json::json!({"error": {"message": message, "type": type_, "code": code}})
    }

    #[tokio::test]
    async fn complete_success_sends_bearer_auth() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/chat/completions"))
            .and(header("authorization", "Bearer sk-test-key"))
            .and(header("content-type", "application/json"))
            .respond_with(ResponseTemplate::new(200).set_body_json(success_body("반가워요")))
            .mount(&server)
            .await;

        let client = test_client(&server.uri());
        let result = client.complete(&test_request()).await.unwrap();
        assert_eq!(result.id, "chatcmpl-test");
        assert_eq!(result.first_text(), "반가워요");
    }

    #[tokio::test]
    async fn complete_retries_once_on_rate_limit() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/chat/completions"))
            .respond_with(ResponseTemplate::new(429).set_body_json(error_body(
                "Rate limit reached",
                "requests",
                "rate_limit_exceeded",
            )))
            .up_to_n_times(1)
            .mount(&server)
            .await;

        Mock::given(method("POST"))
            .and(path("/chat/completions"))
            .respond_with(ResponseTemplate::new(200).set_body_json(success_body("after retry")))
            .mount(&server)
            .await;

        let client = test_client(&server.uri());
        let result = client.complete(&test_request()).await.unwrap();
        assert_eq!(result.first_text(), "after retry");
    }

    #[tokio::test]
    async fn quota_exhaustion_is_not_retried() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/chat/completions"))
            .respond_with(ResponseTemplate::new(429).set_body_json(error_body(
                "You exceeded your current quota, please check your plan and billing details.",
                "insufficient_quota",
                "insufficient_quota",
            )))
            .expect(1)
            .mount(&server)
            .await;

        let client = test_client(&server.uri());
        let err = client.complete(&test_request()).await.unwrap_err();
        assert_eq!(err.provider_kind(), Some(ProviderErrorKind::QuotaExceeded));
    }

    #[tokio::test]
    async fn invalid_key_is_classified() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/chat/completions"))
            .respond_with(ResponseTemplate::new(401).set_body_json(error_body(
                "Incorrect API key provided: sk-test****",
                "invalid_request_error",
                "invalid_api_key",
            )))
            .mount(&server)
            .await;

        let client = test_client(&server.uri());
        let err = client.complete(&test_request()).await.unwrap_err();
        assert_eq!(err.provider_kind(), Some(ProviderErrorKind::InvalidApiKey));
        assert!(err.to_string().contains("invalid_api_key"), "got: {err}");
    }

    #[tokio::test]
    async fn exhausts_retries_on_503() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/chat/completions"))
            .respond_with(ResponseTemplate::new(503).set_body_string("upstream overloaded"))
            .expect(2)
            .mount(&server)
            .await;

        let client = test_client(&server.uri());
        let err = client.complete(&test_request()).await.unwrap_err();
        assert_eq!(err.provider_kind(), Some(ProviderErrorKind::Other));
        assert!(err.to_string().contains("overloaded"), "got: {err}");
    }

    #[test]
    fn classify_unknown_model() {
        assert_eq!(
            classify(
                StatusCode::NOT_FOUND,
                Some("model_not_found"),
                None,
                "The model `gpt-9` does not exist"
            ),
            ProviderErrorKind::ModelUnavailable
        );
        assert_eq!(
            classify(StatusCode::BAD_REQUEST, None, None, "The model `x` does not exist"),
            ProviderErrorKind::ModelUnavailable
        );
        assert_eq!(
            classify(StatusCode::BAD_REQUEST, None, None, "bad payload"),
            ProviderErrorKind::Other
        );
    }
}
