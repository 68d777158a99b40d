// SPDX-FileCopyrightText: 2026 Relink Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Diagnostics for `relink.toml`.
//!
//! Figment extraction failures and semantic validation failures both end up
//! as [`ConfigError`] values that miette renders with the offending line of
//! the file. Unknown keys are matched against the keys of the section they
//! were written in, so `[wizard] max_need_optons` suggests `max_need_options`.

#![allow(unused_assignments)] // miette's Diagnostic derive generates code triggering this lint

use miette::{Diagnostic, NamedSource, SourceSpan};
use thiserror::Error;

/// Jaro-Winkler score a valid key must beat to be offered as a correction.
const SUGGESTION_THRESHOLD: f64 = 0.75;

/// A problem found while loading or checking the configuration.
#[derive(Debug, Error, Diagnostic)]
pub enum ConfigError {
    /// A key that no Relink section accepts.
    #[error("unknown key `{key}` in {}", section_label(section))]
    #[diagnostic(
        code(relink::config::unknown_key),
        help("{}", unknown_key_help(suggestion.as_deref(), valid_keys))
    )]
    UnknownKey {
        key: String,
        /// Dotted section path, empty at the top level.
        section: String,
        suggestion: Option<String>,
        /// Comma-separated keys the section accepts.
        valid_keys: String,
        #[label("not accepted here")]
        span: Option<SourceSpan>,
        #[source_code]
        src: Option<NamedSource<String>>,
    },

    /// A value that cannot be read as the setting's type.
    #[error("`{key}` has the wrong type: {detail}")]
    #[diagnostic(code(relink::config::invalid_type), help("`{key}` expects {expected}"))]
    InvalidType {
        /// Dotted path of the setting.
        key: String,
        detail: String,
        expected: String,
        #[label("expected {expected}")]
        span: Option<SourceSpan>,
        #[source_code]
        src: Option<NamedSource<String>>,
    },

    /// A required key is absent.
    #[error("missing required key `{key}`")]
    #[diagnostic(
        code(relink::config::missing_key),
        help("add `{key} = <value>` to relink.toml")
    )]
    MissingKey { key: String },

    /// A setting that parsed but is out of range or malformed.
    #[error("invalid setting: {message}")]
    #[diagnostic(code(relink::config::validation), help("{}", setting_hint(key)))]
    Validation {
        /// Dotted path of the setting, e.g. `openai.temperature`.
        key: &'static str,
        message: String,
    },

    /// No usable OpenAI key. The server still starts but refuses chat turns.
    #[error("no OpenAI API key configured; chat turns will be refused")]
    #[diagnostic(
        code(relink::config::missing_api_key),
        severity(Warning),
        help("set `openai.api_key` in relink.toml or export OPENAI_API_KEY")
    )]
    MissingApiKey,

    /// Anything figment reports that has no dedicated variant.
    #[error("configuration error: {0}")]
    #[diagnostic(code(relink::config::other))]
    Other(String),
}

impl ConfigError {
    /// Whether this diagnostic still allows Relink to start.
    pub fn is_warning(&self) -> bool {
        matches!(self, Self::MissingApiKey)
    }
}

fn section_label(section: &str) -> String {
    if section.is_empty() {
        "the top level".to_string()
    } else {
        format!("[{section}]")
    }
}

fn unknown_key_help(suggestion: Option<&str>, valid_keys: &str) -> String {
    match suggestion {
        Some(s) => format!("did you mean `{s}`? This section accepts: {valid_keys}"),
        None => format!("this section accepts: {valid_keys}"),
    }
}

/// One-line guidance for a setting that failed validation.
fn setting_hint(key: &str) -> &'static str {
    match key {
        "server.host" => "use an IP address such as 127.0.0.1 or a plain hostname",
        "server.log_level" => "pick one of trace, debug, info, warn, error",
        "storage.database_path" => "point it at a writable file, for example relink.db",
        "openai.model" => "name a chat model, for example gpt-3.5-turbo",
        "openai.base_url" => "use the API root of an OpenAI-compatible server, for example https://api.openai.com/v1",
        "openai.temperature" => "chat completions accept a temperature from 0.0 to 2.0",
        "openai.timeout_secs" => "give the provider at least one second per request",
        "wizard.max_emotion_options" | "wizard.max_need_options" => {
            "the wizard must be able to offer at least one option"
        }
        _ => "check the value against the defaults printed by `relink config check`",
    }
}

/// Convert a `figment::Error` into one [`ConfigError`] per reported problem.
///
/// `toml_sources` pairs file names with their contents and is used to point
/// the report at the offending line.
pub fn figment_to_config_errors(
    err: figment::Error,
    toml_sources: &[(String, String)],
) -> Vec<ConfigError> {
    err.into_iter()
        .map(|error| classify(&error, toml_sources))
        .collect()
}

fn classify(error: &figment::Error, toml_sources: &[(String, String)]) -> ConfigError {
    use figment::error::Kind;

    match &error.kind {
        Kind::UnknownField(field, expected) => {
            let (span, src) = locate(error, &error.path, field, toml_sources);
            ConfigError::UnknownKey {
                key: field.clone(),
                section: error.path.join("."),
                suggestion: suggest_key(field, expected),
                valid_keys: expected.join(", "),
                span,
                src,
            }
        }
        Kind::MissingField(field) => ConfigError::MissingKey {
            key: dotted(&error.path, field),
        },
        Kind::InvalidType(actual, expected) | Kind::InvalidValue(actual, expected) => {
            // The path of a type error ends at the offending key.
            let (span, src) = match error.path.split_last() {
                Some((field, parent)) => locate(error, parent, field, toml_sources),
                None => (None, None),
            };
            ConfigError::InvalidType {
                key: error.path.join("."),
                detail: format!("found {actual}"),
                expected: expected.clone(),
                span,
                src,
            }
        }
        _ => ConfigError::Other(error.to_string()),
    }
}

fn dotted(section: &[String], key: &str) -> String {
    if section.is_empty() {
        key.to_string()
    } else {
        format!("{}.{key}", section.join("."))
    }
}

/// Find the key in the file figment blamed, else in any collected source.
fn locate(
    error: &figment::Error,
    section: &[String],
    key: &str,
    toml_sources: &[(String, String)],
) -> (Option<SourceSpan>, Option<NamedSource<String>>) {
    let blamed = error
        .metadata
        .as_ref()
        .and_then(|m| m.source.as_ref())
        .and_then(|s| match s {
            figment::Source::File(path) => Some(path.display().to_string()),
            _ => None,
        });

    let ordered = toml_sources
        .iter()
        .filter(|(name, _)| blamed.as_deref() == Some(name.as_str()))
        .chain(toml_sources.iter());

    for (name, content) in ordered {
        if let Some(offset) = find_key_offset(content, section, key) {
            let span = SourceSpan::new(offset.into(), key.len());
            return (Some(span), Some(NamedSource::new(name, content.clone())));
        }
    }
    (None, None)
}

/// Byte offset of `key` as written inside the `[section]` table.
///
/// Tracks table headers line by line, so a key of the same name in another
/// table is never matched. A key naming a whole table, like `telegram` for
/// `[telegram]`, is found on its header line.
pub fn find_key_offset(content: &str, section: &[String], key: &str) -> Option<usize> {
    let wanted = section.join(".");
    let as_table = dotted(section, key);
    let mut current = String::new();
    let mut line_start = 0;

    for line in content.split_inclusive('\n') {
        let start = line_start;
        line_start += line.len();
        let indent = line.len() - line.trim_start().len();
        let trimmed = &line[indent..];

        if let Some(header) = trimmed.strip_prefix('[') {
            let name = header
                .trim_start_matches('[')
                .split(']')
                .next()
                .unwrap_or_default()
                .trim();
            if name == as_table {
                return line.rfind(key).map(|at| start + at);
            }
            current = name.to_string();
            continue;
        }

        if current == wanted
            && let Some(rest) = trimmed.strip_prefix(key)
            && rest.trim_start().starts_with('=')
        {
            return Some(start + indent);
        }
    }
    None
}

/// Closest valid key by Jaro-Winkler similarity, if any is close enough.
pub fn suggest_key(unknown: &str, valid_keys: &[&str]) -> Option<String> {
    valid_keys
        .iter()
        .map(|key| (strsim::jaro_winkler(unknown, key), *key))
        .filter(|(score, _)| *score > SUGGESTION_THRESHOLD)
        .max_by(|a, b| a.0.total_cmp(&b.0))
        .map(|(_, key)| key.to_string())
}

/// Render diagnostics with miette's graphical handler.
pub fn render_report(errors: &[ConfigError]) -> String {
    use miette::GraphicalReportHandler;

    let handler = GraphicalReportHandler::new();
    let mut out = String::new();
    for error in errors {
        let mut buf = String::new();
        match handler.render_report(&mut buf, error as &dyn Diagnostic) {
            Ok(()) => out.push_str(&buf),
            Err(_) => out.push_str(&format!("{error}\n")),
        }
    }
    out
}

/// Print diagnostics to stderr.
pub fn render_errors(errors: &[ConfigError]) {
    eprint!("{}", render_report(errors));
}
