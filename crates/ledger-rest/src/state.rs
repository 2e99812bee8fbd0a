//! Application state for Axum handlers.

use ledger_repository::HealthCheck;
use ledger_security::TokenVerifier;
use ledger_service::{AnalyticsService, CacheGateway, TransactionService};
use metrics_exporter_prometheus::PrometheusHandle;
use std::sync::Arc;

/// Shared application state.
#[derive(Clone)]
pub struct AppState {
    pub analytics_service: Arc<dyn AnalyticsService>,
    pub transaction_service: Arc<dyn TransactionService>,
    pub token_verifier: Arc<TokenVerifier>,
    pub database: Arc<dyn HealthCheck>,
    pub cache: Arc<dyn CacheGateway>,
    pub metrics: Option<PrometheusHandle>,
}

impl AppState {
    /// Creates a new application state without a metrics endpoint.
    pub fn new(
        analytics_service: Arc<dyn AnalyticsService>,
        transaction_service: Arc<dyn TransactionService>,
        token_verifier: Arc<TokenVerifier>,
        database: Arc<dyn HealthCheck>,
        cache: Arc<dyn CacheGateway>,
    ) -> Self {
        Self {
            analytics_service,
            transaction_service,
            token_verifier,
            database,
            cache,
            metrics: None,
        }
    }

    /// Exposes the Prometheus recorder on the metrics route.
    #[must_use]
    pub fn with_metrics(mut self, handle: PrometheusHandle) -> Self {
        self.metrics = Some(handle);
        self
    }
}
