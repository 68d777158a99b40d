// SPDX-FileCopyrightText: 2026 Relink Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! JSON error bodies.

use axum::Json;
use axum::extract::rejection::{JsonRejection, QueryRejection};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::Serialize;

use relink_core::RelinkError;
use relink_wizard::notice::{self, Notice};

/// Error response body.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ErrorResponse {
    /// Message shown to the user.
    pub error: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error_code: Option<&'static str>,
    /// Redacted internal error text; debug builds only.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error_details: Option<String>,
}

/// A failed request, rendered through the notice table.
#[derive(Debug)]
pub struct ApiError(pub Notice);

impl ApiError {
    pub fn missing_api_key() -> Self {
        Self(notice::missing_api_key())
    }
}

impl From<RelinkError> for ApiError {
    fn from(err: RelinkError) -> Self {
        match &err {
            RelinkError::InvalidInput(_) | RelinkError::NotFound(_) => {
                tracing::debug!(error = %err, "request rejected");
            }
            _ => tracing::error!(error = %notice::redact(&err.to_string()), "request failed"),
        }
        Self(notice::notice_for(&err))
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        tracing::debug!(error = %rejection.body_text(), "unreadable request body");
        Self(notice::malformed_request(&rejection.body_text()))
    }
}

impl From<QueryRejection> for ApiError {
    fn from(rejection: QueryRejection) -> Self {
        tracing::debug!(error = %rejection.body_text(), "unreadable query string");
        Self(notice::malformed_request(&rejection.body_text()))
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status =
            StatusCode::from_u16(self.0.status).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
        let body = ErrorResponse {
            error_code: Some(self.0.code()),
            error: self.0.message,
            error_details: self.0.details.filter(|_| cfg!(debug_assertions)),
        };
        (status, Json(body)).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use relink_core::ProviderErrorKind;

    #[test]
    fn error_response_serializes_camel_case() {
        let resp = ErrorResponse {
            error: "요청이 너무 많아요.".to_string(),
            error_code: Some("rate_limited"),
            error_details: None,
        };
        let json = serde_json::to_value(&resp).unwrap();
        assert_eq!(json["errorCode"], "rate_limited");
        assert!(json.get("errorDetails").is_none());
    }

    #[test]
    fn provider_error_keeps_notice_status() {
        let err = ApiError::from(RelinkError::provider(ProviderErrorKind::RateLimited, "429"));
        assert_eq!(err.into_response().status(), StatusCode::TOO_MANY_REQUESTS);

        let missing = ApiError::missing_api_key().into_response();
        assert_eq!(missing.status(), StatusCode::SERVICE_UNAVAILABLE);
    }
}
