//! Luma API Server
//!
//! Run with: cargo run --bin luma-api
//!
//! # Configuration
//!
//! Reads the file named by `LUMA_CONFIG`, or the first of
//! `$CONFIG_DIR/luma/config.toml`, `/etc/luma/config.toml`, `./config.toml`,
//! then applies environment overrides:
//! - `LUMA_SHEET_ID` / `LUMA_SHEET_NAME`: Google Sheet to read
//! - `LUMA_CSV_PATH`: Read a local CSV export instead of the sheet
//! - `LUMA_API_HOST` / `LUMA_API_PORT`: Bind address (default: 0.0.0.0:8090)
//! - `LUMA_REFRESH_INTERVAL_SECS`: Background refresh period (0 disables)
//! - `LUMA_LOG_LEVEL` / `LUMA_LOG_FORMAT`: Logging (pretty or json)
//! - `RUST_LOG`: Full filter directive, overrides the level

use luma::api::{serve, ApiConfig, AppState};
use luma::config::{Config, LoggingConfig};
use luma::refresh::RefreshCoordinator;
use std::path::PathBuf;
use std::sync::Arc;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config_path = std::env::var("LUMA_CONFIG").ok().map(PathBuf::from);
    let config = match Config::resolve(config_path.as_deref()) {
        Ok(config) => config,
        Err(e) => {
            luma::logging::init(&LoggingConfig::default());
            tracing::error!("Failed to load config: {}", e);
            return Err(e.into());
        }
    };

    luma::logging::init(&config.logging);

    tracing::info!("Starting Luma API server v{}", env!("CARGO_PKG_VERSION"));
    config.log_origin();

    let source = config.sheet.source()?;
    match source.link() {
        Some(link) => tracing::info!("Sheet source: {} ({})", source.name(), link),
        None => tracing::info!("Sheet source: {}", source.name()),
    }

    let coordinator = Arc::new(RefreshCoordinator::new(
        source,
        config.refresh.coordinator(),
    ));

    if config.refresh.on_startup {
        tracing::info!("Running initial refresh...");
        let outcome = coordinator.refresh().await;
        tracing::info!(?outcome, "Initial refresh finished");
    }

    let refresh_handle = Arc::clone(&coordinator).start_background_refresh();

    let api_config = ApiConfig::from(&config.api);
    let state = AppState::new(coordinator, api_config.clone(), config.display.options());

    tracing::info!("Starting server on {}", api_config.addr());
    serve(state, &api_config).await?;

    if let Some(handle) = refresh_handle {
        handle.abort();
    }
    tracing::info!("Luma API server stopped");

    Ok(())
}
