// SPDX-FileCopyrightText: 2026 Prospecta Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! `prospecta serve` command implementation.
//!
//! Opens the SQLite store, runs migrations, and serves the tracker REST API.

use std::time::Instant;

use prospecta_config::ProspectaConfig;
use prospecta_core::ProspectaError;
use prospecta_gateway::server::{start_server, AppState, ServerConfig};
use prospecta_storage::Database;
use tracing::{info, warn};

/// Runs the `prospecta serve` command.
pub async fn run_serve(config: ProspectaConfig) -> Result<(), ProspectaError> {
    init_tracing(&config.log.level);

    info!("starting prospecta serve");

    let db = Database::open(&config.storage.database_path).await?;
    info!(path = config.storage.database_path.as_str(), "store opened");

    if config.server.bearer_token.is_none() {
        // Fail-closed auth means a token-less gateway answers nothing but /health.
        warn!("no server.bearer_token configured -- all API requests will be rejected");
    }

    let state = AppState {
        db,
        start_time: Instant::now(),
    };
    let server_config = ServerConfig {
        host: config.server.host.clone(),
        port: config.server.port,
        bearer_token: config.server.bearer_token.clone(),
    };

    start_server(&server_config, state).await?;

    info!("prospecta serve shutdown complete");
    Ok(())
}

/// Initializes the tracing subscriber with the given log level.
fn init_tracing(log_level: &str) {
    use tracing_subscriber::EnvFilter;

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("prospecta={log_level},warn")));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_thread_names(false)
        .init();
}
