// SPDX-FileCopyrightText: 2026 Relink Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! `relink status` command implementation.
//!
//! Queries `/health` on the configured host and port. A server that cannot
//! be reached is reported as not running rather than as an error.

use std::io::IsTerminal;
use std::time::Duration;

use relink_config::model::RelinkConfig;
use relink_core::RelinkError;
use serde::{Deserialize, Serialize};

/// Health endpoint response from the server.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct HealthResponse {
    status: String,
    version: String,
    uptime_secs: u64,
    provider_configured: bool,
    storage: String,
}

/// Structured status output for `--json` mode.
#[derive(Debug, Serialize)]
pub struct StatusResponse {
    pub running: bool,
    pub status: String,
    pub version: Option<String>,
    pub uptime_secs: Option<u64>,
    pub uptime_human: Option<String>,
    pub provider_configured: Option<bool>,
    pub storage: Option<String>,
    pub endpoint: String,
}

impl StatusResponse {
    fn offline(endpoint: String) -> Self {
        Self {
            running: false,
            status: "not running".to_string(),
            version: None,
            uptime_secs: None,
            uptime_human: None,
            provider_configured: None,
            storage: None,
            endpoint,
        }
    }

    fn from_health(health: HealthResponse, endpoint: String) -> Self {
        Self {
            running: true,
            uptime_human: Some(format_uptime(health.uptime_secs)),
            status: health.status,
            version: Some(health.version),
            uptime_secs: Some(health.uptime_secs),
            provider_configured: Some(health.provider_configured),
            storage: Some(health.storage),
            endpoint,
        }
    }
}

/// Format seconds into a human-readable duration string.
fn format_uptime(secs: u64) -> String {
    let days = secs / 86400;
    let hours = (secs % 86400) / 3600;
    let minutes = (secs % 3600) / 60;

    if days > 0 {
        format!("{days}d {hours}h {minutes}m")
    } else if hours > 0 {
        format!("{hours}h {minutes}m")
    } else {
        format!("{minutes}m")
    }
}

/// Runs the `relink status` command.
pub async fn run_status(config: &RelinkConfig, json: bool, plain: bool) -> Result<(), RelinkError> {
    let endpoint = format!("http://{}:{}/health", config.server.host, config.server.port);

    let client = reqwest::Client::builder()
        .timeout(Duration::from_secs(3))
        .build()
        .map_err(|e| RelinkError::Internal(format!("failed to create HTTP client: {e}")))?;

    let status = match client.get(&endpoint).send().await {
        Ok(resp) if resp.status().is_success() => {
            let health: HealthResponse = resp.json().await.map_err(|e| {
                RelinkError::Internal(format!("failed to parse health response: {e}"))
            })?;
            StatusResponse::from_health(health, endpoint)
        }
        _ => StatusResponse::offline(endpoint),
    };

    if json {
        let text = serde_json::to_string_pretty(&status)
            .map_err(|e| RelinkError::Internal(format!("failed to serialize status: {e}")))?;
        println!("{text}");
    } else {
        let use_color = !plain && std::io::stdout().is_terminal();
        print!("{}", render(&status, use_color));
    }
    Ok(())
}

fn render(status: &StatusResponse, use_color: bool) -> String {
    use colored::Colorize;

    let mut out = String::from("\n  relink status\n");
    out.push_str(&format!("  {}\n", "-".repeat(35)));

    if !status.running {
        let state = if use_color {
            format!("{} {}", "✗".red(), "not running".red())
        } else {
            "[FAIL] not running".to_string()
        };
        out.push_str(&format!("    State:    {state}\n"));
        out.push_str(&format!("    Endpoint: {}\n\n", status.endpoint));
        out.push_str("  Start with: relink serve\n\n");
        return out;
    }

    let uptime = status.uptime_human.as_deref().unwrap_or("?");
    let state = match (use_color, status.status.as_str()) {
        (true, "ok") => format!("{} {}", "✓".green(), "ok".green()),
        (true, other) => format!("{} {}", "!".yellow(), other.yellow()),
        (false, "ok") => "[OK] ok".to_string(),
        (false, other) => format!("[WARN] {other}"),
    };
    out.push_str(&format!("    State:    {state} (uptime: {uptime})\n"));
    if let Some(version) = &status.version {
        out.push_str(&format!("    Version:  {version}\n"));
    }
    if let Some(storage) = &status.storage {
        out.push_str(&format!("    Storage:  {storage}\n"));
    }
    let provider = match status.provider_configured {
        Some(true) => "configured",
        _ => "missing API key",
    };
    out.push_str(&format!("    Provider: {provider}\n\n"));
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn format_uptime_minutes() {
        assert_eq!(format_uptime(120), "2m");
    }

    #[test]
    fn format_uptime_hours() {
        assert_eq!(format_uptime(3720), "1h 2m");
    }

    #[test]
    fn format_uptime_days() {
        assert_eq!(format_uptime(90060), "1d 1h 1m");
    }

    #[test]
    fn health_body_maps_to_status() {
        let health: HealthResponse = serde_json::from_str(
            r#"{"status":"ok","version":"0.1.0","uptimeSecs":3600,"providerConfigured":false,"storage":"healthy"}"#,
        )
        .unwrap();
        let status = StatusResponse::from_health(health, "http://127.0.0.1:3000/health".into());
        assert!(status.running);
        assert_eq!(status.uptime_human.as_deref(), Some("1h 0m"));

        let text = render(&status, false);
        assert!(text.contains("[OK] ok (uptime: 1h 0m)"));
        assert!(text.contains("Provider: missing API key"));
    }

    #[test]
    fn offline_status_serializes_and_renders() {
        let status = StatusResponse::offline("http://127.0.0.1:3000/health".into());
        let json = serde_json::to_string(&status).unwrap();
        assert!(json.contains("\"running\":false"));
        assert!(render(&status, false).contains("[FAIL] not running"));
    }
}
