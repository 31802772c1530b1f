//! Main entry point for the TripFlow backend.
//!
//! This file initializes tracing, loads configuration, prepares the database
//! and serves the Axum application until Ctrl-C.

use anyhow::{Context, Result};
use tracing::info;
use tracing_subscriber::EnvFilter;
use tripflow_backend::{app, auth::service::AuthSettings, config::Config, database::Database};

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let config = Config::from_env()?;
    let db = Database::new(&config).await?;
    db.migrate().await?;

    let app = app(db.pool().clone(), AuthSettings::from_config(&config));

    let bind_address = format!("0.0.0.0:{}", config.server_port);
    let listener = tokio::net::TcpListener::bind(&bind_address)
        .await
        .with_context(|| format!("Failed to bind {}", bind_address))?;

    info!("Starting TripFlow server on port {}", config.server_port);
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("Server error")?;

    db.close().await;
    Ok(())
}

async fn shutdown_signal() {
    if let Err(error) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to listen for shutdown signal: {}", error);
        std::future::pending::<()>().await;
    }
    info!("Shutdown signal received");
}
