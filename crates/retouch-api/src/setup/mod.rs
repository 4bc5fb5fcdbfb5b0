//! Application setup and initialization
//!
//! All initialization logic lives here rather than in main.rs: telemetry,
//! the storage layout, shared state, and routes.

pub mod routes;
pub mod server;

use std::sync::Arc;

use anyhow::{Context, Result};
use retouch_core::Config;

use crate::state::AppState;

/// Initialize the entire application
pub async fn initialize_app(config: Config) -> Result<(Arc<AppState>, axum::Router)> {
    // Initialize telemetry first
    crate::telemetry::init_telemetry()
        .map_err(|e| anyhow::anyhow!("Failed to initialize telemetry: {}", e))?;

    tracing::info!(
        data_dir = %config.data_dir.display(),
        pipeline_command = %config.pipeline_command.display(),
        "Configuration loaded"
    );

    let state = Arc::new(AppState::new(config));

    // The server cannot run without its directories - fail fast here.
    state
        .layout
        .ensure()
        .await
        .context("Failed to create storage directories")?;

    let router = routes::setup_routes(&state.config, state.clone())?;

    Ok((state, router))
}
