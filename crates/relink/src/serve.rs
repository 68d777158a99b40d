// SPDX-FileCopyrightText: 2026 Relink Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! `relink serve` command implementation.
//!
//! Opens the SQLite store, builds the wizard on the OpenAI provider when an
//! API key is available, and serves the HTTP API until SIGINT or SIGTERM.

use std::sync::Arc;

use relink_config::model::RelinkConfig;
use relink_core::{RelinkError, StorageAdapter};
use relink_gateway::{AppState, ServerConfig, install_signal_handler, start_server};
use relink_openai::OpenAiProvider;
use relink_storage::SqliteStorage;
use relink_wizard::Wizard;
use tracing::{info, warn};

/// Builds the wizard, or `None` when no API key is configured.
///
/// The server still starts without a key so the history and check-in
/// endpoints stay usable; chat turns answer with a setup notice.
fn build_wizard(config: &RelinkConfig) -> Option<Arc<Wizard>> {
    match OpenAiProvider::new(&config.openai) {
        Ok(provider) => {
            info!(model = %config.openai.model, "OpenAI provider ready");
            let wizard = Wizard::new(Arc::new(provider), &config.wizard)
                .with_temperature(config.openai.temperature);
            Some(Arc::new(wizard))
        }
        Err(e) => {
            warn!(error = %e, "no usable API key, chat is disabled until one is configured");
            None
        }
    }
}

/// Runs the `relink serve` command.
pub async fn run_serve(config: RelinkConfig) -> Result<(), RelinkError> {
    init_tracing(&config.server.log_level);
    info!(version = env!("CARGO_PKG_VERSION"), "starting relink serve");

    let storage = SqliteStorage::new(config.storage.clone());
    storage.initialize().await?;
    let storage: Arc<dyn StorageAdapter> = Arc::new(storage);
    info!(path = %config.storage.database_path, "storage initialized");

    let wizard = build_wizard(&config);
    let state = AppState::new(wizard, storage.clone());
    let shutdown = install_signal_handler();

    let served = start_server(&ServerConfig::from(&config.server), state, shutdown).await;

    if let Err(e) = storage.close().await {
        warn!(error = %e, "failed to close storage cleanly");
    }
    info!("relink stopped");
    served
}

/// Initializes the tracing subscriber with the given log level.
///
/// `RUST_LOG` takes precedence when set.
fn init_tracing(log_level: &str) {
    use tracing_subscriber::EnvFilter;

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        EnvFilter::new(format!(
            "relink={log_level},relink_gateway={log_level},relink_wizard={log_level},\
             relink_openai={log_level},relink_storage={log_level},tower_http={log_level},warn"
        ))
    });

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_thread_names(false)
        .init();
}
