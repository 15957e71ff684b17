use anyhow::Result;
use dotenv::dotenv;
use std::sync::Arc;
use tokio::signal;
use tracing::{error, info};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use smartinfra_admin::api;
use smartinfra_admin::config::Config;
use smartinfra_admin::db::init_database;

#[tokio::main]
async fn main() -> Result<()> {
    // Load environment variables from .env file if present
    dotenv().ok();

    // Initialize tracing
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| "info,smartinfra_admin=debug".into()),
        ))
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Load configuration
    let config = Config::get();
    info!("Initialized configuration for {}:{}", config.api.host, config.api.port);

    // Initialize database
    let db = Arc::new(init_database().await?);
    info!("Connected to database");

    // Start API server
    let api_handle = tokio::spawn(async move {
        if let Err(e) = api::start_api_server(db).await {
            error!("API server error: {}", e);
        }
    });

    // Handle shutdown signal
    match signal::ctrl_c().await {
        Ok(()) => info!("Shutdown signal received, initiating graceful shutdown"),
        Err(e) => error!("Failed to listen for shutdown signal: {}", e),
    }
    api_handle.abort();

    info!("SmartInfra admin API shutdown complete");
    Ok(())
}
