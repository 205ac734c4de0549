//! `catalog-server`: serves the song catalog over HTTP.
//!
//! Configuration comes from the `CATALOG_*` environment variables, see
//! [`core_runtime::config`].

use std::sync::Arc;

use anyhow::Context;
use bridge_http::{create_router, AppState};
use core_library::db::{create_pool, DatabaseConfig};
use core_runtime::config::ServerConfig;
use core_runtime::logging::{init_logging, redact_database_url};
use core_service::CatalogService;
use tokio::net::TcpListener;
use tracing::{info, warn};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = ServerConfig::from_env().context("invalid server configuration")?;
    init_logging(config.logging()).context("failed to initialise logging")?;

    info!(
        database_url = %redact_database_url(&config.database_url),
        max_connections = config.max_connections,
        "Opening catalog database"
    );

    let pool = create_pool(
        DatabaseConfig::new(config.database_url.clone()).max_connections(config.max_connections),
    )
    .await
    .context("failed to open catalog database")?;

    let catalog = CatalogService::with_system_clock(pool.clone(), config.pagination);
    let app = create_router(Arc::new(AppState::new(catalog)));

    let listener = TcpListener::bind(&config.bind_address)
        .await
        .with_context(|| format!("failed to bind {}", config.bind_address))?;
    info!(address = %listener.local_addr()?, "Listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("server error")?;

    pool.close().await;
    info!("Stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(err) = tokio::signal::ctrl_c().await {
        warn!(error = %err, "Failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
    info!("Shutdown requested");
}
