// SPDX-FileCopyrightText: 2026 Prospecta Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Gateway HTTP server built on axum.
//!
//! Sets up routes, middleware, and shared state.

use std::time::Instant;

use axum::{
    middleware as axum_middleware,
    routing::{delete, get, patch, post},
    Router,
};
use prospecta_core::ProspectaError;
use prospecta_storage::Database;
use tower_http::cors::CorsLayer;

use crate::auth::{auth_middleware, AuthConfig};
use crate::handlers;

/// Shared state for axum request handlers.
#[derive(Clone)]
pub struct AppState {
    /// The SQLite store; clones share one writer thread.
    pub db: Database,
    /// Process start time for uptime reporting.
    pub start_time: Instant,
}

/// Gateway server configuration (mirrors ServerConfig from prospecta-config).
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Host address to bind.
    pub host: String,
    /// Port to bind.
    pub port: u16,
    /// Bearer token for auth (None = all requests rejected).
    pub bearer_token: Option<String>,
}

/// Build the full application router.
pub fn build_router(state: AppState, auth: AuthConfig) -> Router {
    // Unauthenticated public route (health for systemd and load balancers).
    let public_routes = Router::new()
        .route("/health", get(handlers::get_health))
        .with_state(state.clone());

    // Routes requiring authentication.
    let api_routes = Router::new()
        .route("/v1/sessions/start", post(handlers::start_session))
        .route("/v1/sessions/{id}/pause", patch(handlers::pause_session))
        .route("/v1/sessions/{id}/resume", patch(handlers::resume_session))
        .route("/v1/sessions/{id}/end", post(handlers::end_session))
        .route("/v1/sessions/active", get(handlers::get_active_session))
        .route("/v1/sessions", get(handlers::list_sessions))
        .route("/v1/remaining-leads", get(handlers::get_remaining_leads))
        .route("/v1/calls", post(handlers::record_call))
        .route("/v1/campaigns", post(handlers::create_campaign))
        .route(
            "/v1/campaigns/{id}/users/{user_id}",
            delete(handlers::remove_campaign_user),
        )
        .route_layer(axum_middleware::from_fn_with_state(auth, auth_middleware))
        .with_state(state);

    Router::new()
        .merge(public_routes)
        .merge(api_routes)
        .layer(CorsLayer::permissive())
}

/// Start the gateway HTTP server.
pub async fn start_server(config: &ServerConfig, state: AppState) -> Result<(), ProspectaError> {
    let auth = AuthConfig {
        bearer_token: config.bearer_token.clone(),
    };
    let app = build_router(state, auth);

    let addr = format!("{}:{}", config.host, config.port);
    let listener = tokio::net::TcpListener::bind(&addr).await.map_err(|e| {
        ProspectaError::Internal(format!("failed to bind gateway to {addr}: {e}"))
    })?;

    tracing::info!("gateway listening on {addr}");

    axum::serve(listener, app)
        .await
        .map_err(|e| ProspectaError::Internal(format!("gateway server error: {e}")))?;

    Ok(())
}
