// SPDX-FileCopyrightText: 2026 Relink Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Post-deserialization validation for configuration values.
//!
//! Validates semantic constraints that cannot be expressed via serde attributes,
//! such as valid host names, non-empty paths, and value ranges.

use crate::diagnostic::ConfigError;
use crate::model::{OpenAiConfig, RelinkConfig};

const LOG_LEVELS: &[&str] = &["trace", "debug", "info", "warn", "error"];

/// Validate a deserialized configuration for semantic correctness.
///
/// Returns `Ok(())` if all validations pass, or `Err(Vec<ConfigError>)` with
/// all collected validation errors (does not fail fast).
pub fn validate_config(config: &RelinkConfig) -> Result<(), Vec<ConfigError>> {
    let mut errors = Vec::new();

    let host = config.server.host.trim();
    if host.is_empty() {
        errors.push(ConfigError::Validation {
            key: "server.host",
            message: "server.host must not be empty".to_string(),
        });
    } else {
        let is_valid_ip = host.parse::<std::net::IpAddr>().is_ok();
        let is_valid_hostname = host
            .chars()
            .all(|c| c.is_alphanumeric() || c == '.' || c == '-' || c == ':');
        if !is_valid_ip && !is_valid_hostname {
            errors.push(ConfigError::Validation {
                key: "server.host",
                message: format!("server.host `{host}` is not a valid IP address or hostname"),
            });
        }
    }

    if !LOG_LEVELS.contains(&config.server.log_level.as_str()) {
        errors.push(ConfigError::Validation {
            key: "server.log_level",
            message: format!(
                "server.log_level must be one of {}, got `{}`",
                LOG_LEVELS.join(", "),
                config.server.log_level
            ),
        });
    }

    if config.storage.database_path.trim().is_empty() {
        errors.push(ConfigError::Validation {
            key: "storage.database_path",
            message: "storage.database_path must not be empty".to_string(),
        });
    }

    if config.openai.model.trim().is_empty() {
        errors.push(ConfigError::Validation {
            key: "openai.model",
            message: "openai.model must not be empty".to_string(),
        });
    }

    let base_url = config.openai.base_url.trim();
    if !(base_url.starts_with("http://") || base_url.starts_with("https://")) {
        errors.push(ConfigError::Validation {
            key: "openai.base_url",
            message: format!("openai.base_url `{base_url}` must start with http:// or https://"),
        });
    }

    let temperature = config.openai.temperature;
    if !(0.0..=2.0).contains(&temperature) {
        errors.push(ConfigError::Validation {
            key: "openai.temperature",
            message: format!("openai.temperature must be between 0 and 2, got {temperature}"),
        });
    }

    if config.openai.timeout_secs == 0 {
        errors.push(ConfigError::Validation {
            key: "openai.timeout_secs",
            message: "openai.timeout_secs must be at least 1".to_string(),
        });
    }

    if config.wizard.max_emotion_options == 0 {
        errors.push(ConfigError::Validation {
            key: "wizard.max_emotion_options",
            message: "wizard.max_emotion_options must be at least 1".to_string(),
        });
    }

    if config.wizard.max_need_options == 0 {
        errors.push(ConfigError::Validation {
            key: "wizard.max_need_options",
            message: "wizard.max_need_options must be at least 1".to_string(),
        });
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

/// Warn when no usable API key is configured.
///
/// Not a validation error: the server starts without a key and keeps the
/// history and check-in endpoints available.
pub fn api_key_warning(openai: &OpenAiConfig) -> Option<ConfigError> {
    openai
        .resolved_api_key()
        .is_none()
        .then_some(ConfigError::MissingApiKey)
}
