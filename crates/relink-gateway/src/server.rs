// SPDX-FileCopyrightText: 2026 Relink Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Gateway HTTP server built on axum.
//!
//! Sets up routes, middleware, and shared state for the gateway.

use std::sync::Arc;
use std::time::Instant;

use axum::{
    Router,
    routing::{get, post},
};
use tokio_util::sync::CancellationToken;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use relink_core::{RelinkError, StorageAdapter};
use relink_wizard::Wizard;

use crate::handlers;

/// Shared state for axum request handlers.
#[derive(Clone)]
pub struct AppState {
    /// `None` when no API key is configured; chat turns then fail with a notice.
    pub wizard: Option<Arc<Wizard>>,
    pub storage: Arc<dyn StorageAdapter>,
    /// Process start time for uptime calculation.
    pub start_time: Instant,
}

impl AppState {
    pub fn new(wizard: Option<Arc<Wizard>>, storage: Arc<dyn StorageAdapter>) -> Self {
        Self {
            wizard,
            storage,
            start_time: Instant::now(),
        }
    }
}

/// Gateway server configuration.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Host address to bind.
    pub host: String,
    /// Port to bind.
    pub port: u16,
}

impl From<&relink_config::model::ServerConfig> for ServerConfig {
    fn from(config: &relink_config::model::ServerConfig) -> Self {
        Self {
            host: config.host.clone(),
            port: config.port,
        }
    }
}

/// Builds the router with all routes and middleware.
///
/// - POST /api/chat
/// - GET, POST /api/conversations; GET /api/conversations/{id}
/// - GET, POST /api/checkins; GET /api/checkins/weekly
/// - GET /api/emotions
/// - GET /health
pub fn router(state: AppState) -> Router {
    let api_routes = Router::new()
        .route("/api/chat", post(handlers::post_chat))
        .route(
            "/api/conversations",
            get(handlers::get_conversations).post(handlers::post_conversation),
        )
        .route("/api/conversations/{id}", get(handlers::get_conversation))
        .route(
            "/api/checkins",
            get(handlers::get_check_ins).post(handlers::post_check_in),
        )
        .route("/api/checkins/weekly", get(handlers::get_weekly_check_ins))
        .route("/api/emotions", get(handlers::get_emotions));

    Router::new()
        .route("/health", get(handlers::get_health))
        .merge(api_routes)
        .with_state(state)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
}

/// Start the gateway HTTP server and serve until `shutdown` is cancelled.
pub async fn start_server(
    config: &ServerConfig,
    state: AppState,
    shutdown: CancellationToken,
) -> Result<(), RelinkError> {
    let app = router(state);

    let addr = format!("{}:{}", config.host, config.port);
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .map_err(|e| RelinkError::Config(format!("failed to bind server to {addr}: {e}")))?;

    tracing::info!("Relink server listening on {addr}");

    axum::serve(listener, app)
        .with_graceful_shutdown(async move { shutdown.cancelled().await })
        .await
        .map_err(|e| RelinkError::Internal(format!("server error: {e}")))?;

    tracing::info!("server stopped");
    Ok(())
}
