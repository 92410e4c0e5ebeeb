pub mod api; // Local HTTP API for the browser front end
pub mod bmi;
pub mod config;
pub mod core_state; // Transport-agnostic state
pub mod db;
pub mod history; // Assessment log + CSV export
pub mod models;
pub mod predictor; // Remote model client
pub mod risk; // Tiers, advice, offline heuristic
pub mod scenario; // What-if re-evaluation engine
pub mod validation;

use std::sync::Arc;
use tracing_subscriber::EnvFilter;

/// Errors that stop the service before or while it runs.
#[derive(Debug, thiserror::Error)]
pub enum RunError {
    #[error(transparent)]
    Core(#[from] core_state::CoreError),
    #[error("Server I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Start the service and block until Ctrl-C.
pub async fn run() -> Result<(), RunError> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(config::default_log_filter())),
        )
        .init();

    tracing::info!("Cancer DSS starting v{}", config::APP_VERSION);

    let config = config::AppConfig::from_env();
    let bind_addr = config.bind_addr;
    let core = Arc::new(core_state::CoreState::from_config(config)?);

    let mut server = api::start_api_server(core.clone(), bind_addr).await?;
    tracing::info!(addr = %server.addr, "Listening; press Ctrl-C to stop");

    tokio::signal::ctrl_c().await?;
    tracing::info!("Shutdown requested");

    server.shutdown();
    server.stopped().await;
    core.shutdown();
    tracing::info!("Cancer DSS stopped");
    Ok(())
}
