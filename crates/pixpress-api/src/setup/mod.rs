//! Application setup and initialization

pub mod routes;
pub mod server;

use crate::state::AppState;
use anyhow::{Context, Result};
use axum::Router;
use pixpress_core::Config;
use pixpress_services::{ExpirySweeper, FileRegistry};
use pixpress_storage::Workspace;
use std::sync::Arc;
use tokio::task::JoinHandle;

/// A fully wired application: state, router, and the running expiry sweeper
pub struct Application {
    pub state: Arc<AppState>,
    pub router: Router,
    sweeper: JoinHandle<()>,
}

impl Application {
    /// Stop the sweeper and remove the workspace
    pub async fn shutdown(self) {
        self.sweeper.abort();
        let _ = self.sweeper.await;

        if let Err(e) = self.state.workspace.close() {
            tracing::error!(error = %e, "Failed to remove workspace");
        }

        tracing::info!("Shutdown complete");
    }
}

/// Initialize the entire application
pub async fn initialize_app(config: Config) -> Result<Application> {
    pixpress_infra::init_telemetry(config.log_format)
        .map_err(|e| anyhow::anyhow!("Failed to initialize telemetry: {}", e))?;

    config.validate().context("Configuration validation failed")?;
    tracing::info!(environment = %config.environment, "Configuration loaded and validated successfully");

    let state = build_state(config).await?;
    let router = routes::setup_routes(&state.config, state.clone())?;
    let sweeper = start_sweeper(&state);

    Ok(Application {
        state,
        router,
        sweeper,
    })
}

/// Open the workspace and assemble the shared state
pub async fn build_state(config: Config) -> Result<Arc<AppState>> {
    let workspace = match &config.workspace_dir {
        Some(dir) => Workspace::open(dir.clone()).await,
        None => Workspace::temporary(),
    }
    .context("Failed to set up workspace")?;

    Ok(Arc::new(AppState::new(
        config,
        Arc::new(workspace),
        FileRegistry::new(),
    )))
}

pub fn start_sweeper(state: &AppState) -> JoinHandle<()> {
    let sweeper = ExpirySweeper::new(
        state.registry.clone(),
        state.workspace.clone(),
        state.config.sweep_interval(),
        state.config.file_ttl(),
    );
    Arc::new(sweeper).start()
}
