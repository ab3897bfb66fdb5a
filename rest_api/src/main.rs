// rest_api/src/main.rs
// Local development server exposing every clinic route.

use anyhow::{Context, Result};
use rest_api::config::{load_local_settings, load_rest_api_config};
use rest_api::{build_state, start_server};
use tracing::{info, warn};

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();
    clinic::logging::init_logging();

    let config = load_rest_api_config().context("Failed to load REST API configuration")?;
    let settings = load_local_settings().context("Failed to load clinic settings")?;
    info!(backend = %settings.storage.backend, "Starting local REST API");

    let state = build_state(&settings).await?;
    start_server(&config, state, shutdown_signal()).await
}

async fn shutdown_signal() {
    match tokio::signal::ctrl_c().await {
        Ok(()) => info!("Received Ctrl-C, shutting down"),
        Err(e) => warn!(error = %e, "Failed to listen for Ctrl-C"),
    }
}
