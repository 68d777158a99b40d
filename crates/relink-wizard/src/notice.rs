// SPDX-FileCopyrightText: 2026 Relink Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! User-facing notices for failed turns.
//!
//! Upstream failures are mapped to short Korean sentences. Raw error text is
//! only ever shown after API keys and bearer tokens have been masked.

use std::sync::LazyLock;

use regex::Regex;

use relink_core::{ProviderErrorKind, RelinkError};

const GENERIC: &str = "잠시 문제가 생겼어요. 다시 시도해주세요.";
const EMPTY: &str = "응답을 받지 못했어요. 다시 시도해주세요.";

/// Placeholder substituted for masked secrets.
pub const REDACTED: &str = "[REDACTED]";

static SECRET_PATTERNS: LazyLock<Vec<Regex>> = LazyLock::new(|| {
    vec![
        Regex::new(r"sk-[A-Za-z0-9_\-]{16,}").expect("valid regex"),
        Regex::new(r"Bearer\s+[A-Za-z0-9._\-]{10,}").expect("valid regex"),
    ]
});

/// Masks API keys and bearer tokens in `text`.
pub fn redact(text: &str) -> String {
    let mut result = text.to_string();
    for pattern in SECRET_PATTERNS.iter() {
        result = pattern.replace_all(&result, REDACTED).into_owned();
    }
    result
}

/// What the client shows when a turn fails.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notice {
    pub status: u16,
    pub message: String,
    /// Redacted error text for debug builds.
    pub details: Option<String>,
}

impl Notice {
    fn new(status: u16, message: impl Into<String>, err: &RelinkError) -> Self {
        Self {
            status,
            message: message.into(),
            details: Some(redact(&err.to_string())),
        }
    }

    /// Stable machine-readable code for the notice.
    pub fn code(&self) -> &'static str {
        match self.status {
            400 => "invalid_input",
            404 => "not_found",
            429 => "rate_limited",
            503 => "unavailable",
            _ => "internal",
        }
    }
}

/// Maps an error to the notice shown to the user.
pub fn notice_for(err: &RelinkError) -> Notice {
    match err {
        RelinkError::Provider { kind, message, .. } => {
            let text = match kind {
                ProviderErrorKind::QuotaExceeded => {
                    "API 사용량 한도에 도달했어요. OpenAI 계정의 결제 정보와 사용량을 확인해주세요.".to_string()
                }
                ProviderErrorKind::InvalidApiKey => "API 키에 문제가 있어요. 확인해주세요.".to_string(),
                ProviderErrorKind::RateLimited => "요청이 너무 많아요. 잠시 후 다시 시도해주세요.".to_string(),
                ProviderErrorKind::ModelUnavailable => {
                    "사용할 수 없는 모델이에요. 다른 모델로 변경이 필요해요.".to_string()
                }
                ProviderErrorKind::EmptyResponse => EMPTY.to_string(),
                ProviderErrorKind::Other => format!("오류: {}", redact(message)),
            };
            let status = match kind {
                ProviderErrorKind::RateLimited => 429,
                _ => 500,
            };
            Notice::new(status, text, err)
        }
        RelinkError::Timeout { .. } => Notice::new(500, format!("오류: {}", redact(&err.to_string())), err),
        RelinkError::InvalidInput(message) => Notice::new(400, message.clone(), err),
        RelinkError::NotFound(_) => Notice::new(404, "대화를 찾을 수 없어요.", err),
        RelinkError::Storage { .. } | RelinkError::Internal(_) | RelinkError::Config(_) => {
            Notice::new(500, GENERIC, err)
        }
    }
}

/// Notice for a server started without an API key.
pub fn missing_api_key() -> Notice {
    Notice {
        status: 503,
        message: "API 키가 설정되지 않았어요. relink.toml의 openai.api_key 또는 OPENAI_API_KEY를 설정하고 서버를 재시작해주세요."
            .to_string(),
        details: None,
    }
}

/// Notice for a request body or query string that could not be read.
///
/// `detail` is the extractor's own description, kept for debug builds.
pub fn malformed_request(detail: &str) -> Notice {
    Notice {
        status: 400,
        message: "요청 형식이 올바르지 않아요.".to_string(),
        details: Some(redact(detail)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn redacts_keys_and_tokens() {
        let text = "key sk-abcdefghijklmnop1234 and Bearer abc.def-ghijk";
        let out = redact(text);
        assert_eq!(out, "key [REDACTED] and [REDACTED]");
        assert_eq!(redact("sk-short"), "sk-short");
    }

    #[test]
    fn provider_kinds_map_to_messages() {
        let quota = notice_for(&RelinkError::provider(ProviderErrorKind::QuotaExceeded, "insufficient_quota"));
        assert!(quota.message.starts_with("API 사용량 한도"));
        assert_eq!(quota.status, 500);

        let limited = notice_for(&RelinkError::provider(ProviderErrorKind::RateLimited, "429"));
        assert_eq!(limited.status, 429);
        assert_eq!(limited.code(), "rate_limited");

        let empty = notice_for(&RelinkError::provider(ProviderErrorKind::EmptyResponse, ""));
        assert_eq!(empty.message, EMPTY);
    }

    #[test]
    fn other_provider_errors_are_redacted() {
        let err = RelinkError::provider(
            ProviderErrorKind::Other,
            "connection refused using sk-abcdefghijklmnopqrstuv",
        );
        let notice = notice_for(&err);
        assert_eq!(notice.message, "오류: connection refused using [REDACTED]");
        assert!(!notice.details.unwrap().contains("sk-abcdef"));
    }

    #[test]
    fn local_errors_use_generic_or_input_text() {
        let invalid = notice_for(&RelinkError::InvalidInput("메시지가 필요해요.".into()));
        assert_eq!(invalid.status, 400);
        assert_eq!(invalid.message, "메시지가 필요해요.");

        let storage = notice_for(&RelinkError::Storage {
            source: "disk full".into(),
        });
        assert_eq!(storage.message, GENERIC);
        assert_eq!(notice_for(&RelinkError::NotFound("x".into())).status, 404);
        assert_eq!(missing_api_key().status, 503);
    }

    #[test]
    fn malformed_request_is_a_bad_request() {
        let notice = malformed_request("missing field `messages`");
        assert_eq!(notice.code(), "invalid_input");
        assert_eq!(notice.details.as_deref(), Some("missing field `messages`"));
    }
}
