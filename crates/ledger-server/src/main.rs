//! # Ledgerlens Server
//!
//! Loads configuration, wires the analytics and transaction services, and
//! serves the REST API until a shutdown signal arrives.

use anyhow::Context;
use ledger_config::{AppConfig, ConfigLoader};
use ledger_core::telemetry::{init_telemetry, shutdown_telemetry};
use ledger_rest::create_router;
use ledger_server::di::build_components;
use ledger_server::startup::{install_metrics, print_banner, print_startup_info, shutdown_signal};
use tracing::{error, info};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = ConfigLoader::from_default_location()
        .load()
        .context("failed to load configuration")?;

    init_telemetry(&config.observability.telemetry(&config.app.name))?;
    print_banner();
    info!("Starting Ledgerlens v{}", env!("CARGO_PKG_VERSION"));

    let result = run(config).await;
    if let Err(e) = &result {
        error!("Application error: {:#}", e);
    }

    shutdown_telemetry();
    result
}

async fn run(config: AppConfig) -> anyhow::Result<()> {
    let metrics = install_metrics(&config.observability)?;
    let components = build_components(&config, metrics).await?;

    let router = create_router(components.state, &config.server, &config.observability);

    let addr = config.server.addr();
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("failed to bind {}", addr))?;
    print_startup_info(&config);

    axum::serve(listener, router)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("REST server error")?;

    components.database.close().await;
    info!("Server shutdown complete");
    Ok(())
}
