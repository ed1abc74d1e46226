/// Airport snow-response report service entry point
mod config;
mod domain;
mod errors;
mod handlers;
mod query;
mod routes;
mod store;

use crate::config::AppConfig;
use crate::handlers::AppState;
use crate::routes::build_router;
use crate::store::ReportStore;
use std::sync::Arc;
use tracing::info;
use tracing_subscriber::{EnvFilter, FmtSubscriber};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize logging
    let subscriber = FmtSubscriber::builder()
        .with_env_filter(EnvFilter::from_default_env())
        .finish();
    let _ = tracing::subscriber::set_global_default(subscriber);

    // Load configuration
    let config = AppConfig::from_env()?;
    info!("Configuration loaded successfully");

    // Open the report store, bootstrapping the data directory and an
    // empty snapshot on first run
    let store = ReportStore::open(config.reports_file())
        .await
        .map_err(|e| anyhow::anyhow!("failed to open report store: {e}"))?;
    info!(path = %config.reports_file().display(), "Report store ready");

    // Initialize application state
    let state = AppState {
        store: Arc::new(store),
    };

    // Build router
    let app = build_router(state);

    // Start server
    let listener = tokio::net::TcpListener::bind(&config.bind_addr).await?;
    info!("snow_report_service listening on {}", config.bind_addr);

    axum::serve(listener, app.into_make_service()).await?;

    Ok(())
}
