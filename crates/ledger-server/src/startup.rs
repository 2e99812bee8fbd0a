//! Server startup utilities.

use ledger_config::{AppConfig, ObservabilityConfig};
use ledger_core::{LedgerError, LedgerResult};
use metrics_exporter_prometheus::{PrometheusBuilder, PrometheusHandle};
use tokio::signal;
use tracing::{error, info};

/// Prints the startup banner.
pub fn print_banner() {
    info!(r#"
    __             __            __
   / /   ___  ____/ /___ ____   / /   ___  ____  _____
  / /   / _ \/ __  / __ `/ _ \ / /   / _ \/ __ \/ ___/
 / /___/  __/ /_/ / /_/ /  __// /___/  __/ / / (__  )
/_____/\___/\__,_/\__, /\___//_____/\___/_/ /_/____/
                 /____/
    "#);
}

/// Prints server startup information.
pub fn print_startup_info(config: &AppConfig) {
    let addr = config.server.addr();
    let separator = "=".repeat(60);
    info!("{}", separator);
    info!("Environment: {}", config.app.environment);
    info!("REST API:    http://{}/api", addr);
    info!("Health:      http://{}/health", addr);
    info!("API Docs:    http://{}/swagger-ui", addr);
    if config.observability.metrics_enabled {
        info!("Metrics:     http://{}{}", addr, config.observability.metrics_path);
    }
    info!("Cache:       {:?}", config.cache.backend);
    info!("{}", separator);
}

/// Installs the Prometheus recorder when metrics are enabled.
pub fn install_metrics(config: &ObservabilityConfig) -> LedgerResult<Option<PrometheusHandle>> {
    if !config.metrics_enabled {
        return Ok(None);
    }
    let handle = PrometheusBuilder::new()
        .install_recorder()
        .map_err(|e| LedgerError::Configuration(format!("Failed to install metrics recorder: {}", e)))?;
    ledger_service::metrics::register_metrics();
    Ok(Some(handle))
}

/// Resolves on Ctrl+C or SIGTERM.
pub async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            error!("Failed to install Ctrl+C handler: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sigterm) => {
                sigterm.recv().await;
            }
            Err(e) => {
                error!("Failed to install SIGTERM handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {
            info!("Received Ctrl+C, initiating graceful shutdown...");
        }
        () = terminate => {
            info!("Received terminate signal, initiating graceful shutdown...");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_metrics_disabled_installs_nothing() {
        let config = ObservabilityConfig {
            metrics_enabled: false,
            ..ObservabilityConfig::default()
        };
        assert!(install_metrics(&config).unwrap().is_none());
    }

    #[test]
    fn test_print_startup_info_does_not_panic() {
        print_banner();
        print_startup_info(&AppConfig::default());
    }
}
