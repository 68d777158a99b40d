// SPDX-FileCopyrightText: 2026 Relink Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Error types for Relink.

use thiserror::Error;

/// Classification of an upstream text-generation failure.
///
/// The gateway turns these into user-facing notices, so the provider adapter
/// is responsible for picking the most specific kind it can detect.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProviderErrorKind {
    /// Usage quota or billing limit reached.
    QuotaExceeded,
    /// The API key was rejected.
    InvalidApiKey,
    /// Too many requests in a short period.
    RateLimited,
    /// The configured model does not exist or is not available.
    ModelUnavailable,
    /// The model answered with no text.
    EmptyResponse,
    /// Transport failures, malformed responses, and anything else.
    Other,
}

/// The primary error type used across all Relink crates.
#[derive(Debug, Error)]
pub enum RelinkError {
    /// Configuration errors (invalid TOML, missing API key, bad values).
    #[error("configuration error: {0}")]
    Config(String),

    /// Storage backend errors (database connection, query failure, serialization).
    #[error("storage error: {source}")]
    Storage {
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    /// Text-generation provider errors.
    #[error("provider error: {message}")]
    Provider {
        kind: ProviderErrorKind,
        message: String,
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// The caller sent something the wizard cannot work with.
    #[error("invalid input: {0}")]
    InvalidInput(String),

    /// A persisted record was not found.
    #[error("not found: {0}")]
    NotFound(String),

    /// Operation timed out.
    #[error("operation timed out after {duration:?}")]
    Timeout { duration: std::time::Duration },

    /// Internal or unexpected errors.
    #[error("internal error: {0}")]
    Internal(String),
}

impl RelinkError {
    /// Shorthand for a provider error without an underlying source.
    pub fn provider(kind: ProviderErrorKind, message: impl Into<String>) -> Self {
        Self::Provider {
            kind,
            message: message.into(),
            source: None,
        }
    }

    /// Returns the provider failure kind, if this is a provider error.
    pub fn provider_kind(&self) -> Option<ProviderErrorKind> {
        match self {
            Self::Provider { kind, .. } => Some(*kind),
            _ => None,
        }
    }
}
