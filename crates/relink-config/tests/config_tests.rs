// SPDX-FileCopyrightText: 2026 Relink Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Integration tests for the Relink configuration system.

use relink_config::diagnostic::{suggest_key, ConfigError};
use relink_config::model::RelinkConfig;
use relink_config::{load_and_validate_str, load_config_from_str};

/// Valid TOML with all known fields deserializes successfully.
#[test]
fn valid_toml_deserializes_into_relink_config() {
    let toml = r#"
[server]
host = "0.0.0.0"
port = 8080
log_level = "debug"

[openai]
api_key = "sk-test-123"
model = "gpt-4o-mini"
base_url = "http://localhost:9000/v1"
temperature = 0.3
timeout_secs = 15

[storage]
database_path = "/tmp/relink-test.db"
wal_mode = false

[wizard]
response_delay_ms = 0
max_emotion_options = 5
max_need_options = 4
"#;

    let config = load_config_from_str(toml).expect("valid TOML should deserialize");
    assert_eq!(config.server.host, "0.0.0.0");
    assert_eq!(config.server.port, 8080);
    assert_eq!(config.server.log_level, "debug");
    assert_eq!(config.openai.api_key.as_deref(), Some("sk-test-123"));
    assert_eq!(config.openai.model, "gpt-4o-mini");
    assert_eq!(config.openai.base_url, "http://localhost:9000/v1");
    assert!((config.openai.temperature - 0.3).abs() < f32::EPSILON);
    assert_eq!(config.openai.timeout_secs, 15);
    assert_eq!(config.storage.database_path, "/tmp/relink-test.db");
    assert!(!config.storage.wal_mode);
    assert_eq!(config.wizard.response_delay_ms, 0);
    assert_eq!(config.wizard.max_emotion_options, 5);
    assert_eq!(config.wizard.max_need_options, 4);
}

/// Unknown field in [server] produces an unknown field error.
#[test]
fn unknown_field_in_server_produces_error() {
    let toml = r#"
[server]
hots = "0.0.0.0"
"#;

    let err = load_config_from_str(toml).expect_err("should reject unknown field");
    let err_str = format!("{err}");
    assert!(
        err_str.contains("unknown field") || err_str.contains("hots"),
        "error should mention unknown field or the bad key, got: {err_str}"
    );
}

/// Missing optional sections use defaults without error.
#[test]
fn missing_optional_sections_use_defaults() {
    let config = load_config_from_str("").expect("empty TOML should use defaults");

    assert_eq!(config.server.host, "127.0.0.1");
    assert_eq!(config.server.port, 3000);
    assert_eq!(config.server.log_level, "info");
    assert!(config.openai.api_key.is_none());
    assert_eq!(config.openai.model, "gpt-3.5-turbo");
    assert_eq!(config.openai.base_url, "https://api.openai.com/v1");
    assert!(config.storage.wal_mode);
    assert_eq!(config.wizard.response_delay_ms, 2000);
}

/// An env override of a multi-word key lands on the right field.
#[test]
fn dotted_override_sets_wizard_delay() {
    use figment::{
        providers::{Format, Serialized, Toml},
        Figment,
    };

    let toml_content = r#"
[wizard]
response_delay_ms = 500
"#;

    let config: RelinkConfig = Figment::new()
        .merge(Serialized::defaults(RelinkConfig::default()))
        .merge(Toml::string(toml_content))
        .merge(("wizard.response_delay_ms", 0))
        .extract()
        .expect("should merge override");

    assert_eq!(config.wizard.response_delay_ms, 0);
}

/// Missing config files are silently skipped.
#[test]
fn missing_config_files_silently_skipped() {
    use figment::{
        providers::{Format, Serialized, Toml},
        Figment,
    };

    let config: RelinkConfig = Figment::new()
        .merge(Serialized::defaults(RelinkConfig::default()))
        .merge(Toml::file("/nonexistent/path/relink.toml"))
        .extract()
        .expect("missing file should be silently skipped");

    assert_eq!(config.server.port, 3000);
}

/// Unexpected top-level section is rejected by deny_unknown_fields.
#[test]
fn deny_unknown_fields_at_top_level() {
    let toml = r#"
[telegram]
bot_token = "abc"
"#;

    let err = load_config_from_str(toml).expect_err("unknown top-level section should be rejected");
    let err_str = format!("{err}");
    assert!(
        err_str.contains("unknown field") || err_str.contains("telegram"),
        "error should mention unknown field, got: {err_str}"
    );
}

#[test]
fn diagnostic_suggests_close_key() {
    let valid_keys = &["api_key", "model", "base_url", "temperature", "timeout_secs"];
    assert_eq!(suggest_key("temprature", valid_keys), Some("temperature".to_string()));
    assert!(suggest_key("qqqqq", valid_keys).is_none());
}

/// Error output from load_and_validate_str includes the unknown key and a suggestion.
#[test]
fn diagnostic_error_includes_unknown_key() {
    let toml = r#"
[wizard]
max_need_optons = 3
"#;

    let errors = load_and_validate_str(toml).expect_err("should produce errors");
    let has_unknown_key = errors.iter().any(|e| {
        matches!(e, ConfigError::UnknownKey { key, suggestion, valid_keys, .. } if {
            key == "max_need_optons"
                && suggestion.as_deref() == Some("max_need_options")
                && valid_keys.contains("response_delay_ms")
        })
    });
    assert!(
        has_unknown_key,
        "should have UnknownKey error with suggestion, got: {errors:?}"
    );
}

/// Invalid type (string where number expected) produces a clear message.
#[test]
fn diagnostic_invalid_type_message() {
    let toml = r#"
[server]
port = "not_a_number"
"#;

    let err = load_config_from_str(toml).expect_err("should reject invalid type");
    let err_str = format!("{err}");
    assert!(
        err_str.contains("invalid type") || err_str.contains("port"),
        "error should mention type mismatch, got: {err_str}"
    );
}

/// ConfigError can be rendered using miette's graphical handler.
#[test]
fn config_error_renders_with_miette() {
    use miette::{Diagnostic, GraphicalReportHandler};

    let error = ConfigError::UnknownKey {
        key: "hots".to_string(),
        section: "server".to_string(),
        suggestion: Some("host".to_string()),
        valid_keys: "host, port, log_level".to_string(),
        span: None,
        src: None,
    };
    assert!(error.code().is_some());
    let help = error.help().expect("should have help text").to_string();
    assert!(help.contains("did you mean `host`"), "got: {help}");

    let handler = GraphicalReportHandler::new();
    let mut buf = String::new();
    handler
        .render_report(&mut buf, &error)
        .expect("should render without error");
    assert!(buf.contains("hots"));
}

/// A missing key is rendered as a warning that names the environment variable.
#[test]
fn missing_api_key_warning_renders() {
    use miette::{Diagnostic, Severity};
    use relink_config::api_key_warning;
    use relink_config::model::{API_KEY_PLACEHOLDER, OpenAiConfig};

    let openai = OpenAiConfig {
        api_key: Some(API_KEY_PLACEHOLDER.to_string()),
        ..OpenAiConfig::default()
    };
    let warning = api_key_warning(&openai).expect("placeholder key should warn");
    assert_eq!(warning.severity(), Some(Severity::Warning));

    let report = relink_config::render_report(&[warning]);
    assert!(report.contains("OPENAI_API_KEY"), "got: {report}");
    assert!(report.contains("chat turns will be refused"), "got: {report}");
}

/// An unknown key is reported against its table with the offending line.
#[test]
fn unknown_key_points_at_its_line() {
    let toml = "[server]\nport = 4000\n\n[wizard]\nmax_need_optons = 3\n";

    let errors = load_and_validate_str(toml).expect_err("should produce errors");
    let [ConfigError::UnknownKey { section, span, .. }] = errors.as_slice() else {
        panic!("expected a single unknown key, got: {errors:?}");
    };
    assert_eq!(section, "wizard");
    let span = span.expect("inline source should be located");
    assert_eq!(&toml[span.offset()..span.offset() + span.len()], "max_need_optons");

    let report = relink_config::render_report(&errors);
    assert!(report.contains("[wizard]"), "got: {report}");
}

/// Validation failures surface through load_and_validate_str.
#[test]
fn validation_catches_bad_temperature() {
    let toml = r#"
[openai]
temperature = 3.5
"#;

    let errors = load_and_validate_str(toml).expect_err("temperature 3.5 should fail");
    assert!(errors.iter().any(|e| {
        matches!(e, ConfigError::Validation { message, .. } if message.contains("temperature"))
    }));
}

#[test]
fn load_and_validate_valid_toml() {
    let toml = r#"
[server]
port = 4000
"#;

    let config = load_and_validate_str(toml).expect("valid TOML should validate");
    assert_eq!(config.server.port, 4000);
}
