//! Dependency wiring.
//!
//! Builds every long-lived component from [`AppConfig`] and hands them to the
//! REST layer as an [`AppState`].

use ledger_config::{AppConfig, CacheBackend, CacheConfig};
use ledger_core::LedgerResult;
use ledger_repository::{create_pool, DatabasePool, PgAggregationEngine, PgTransactionRepository};
use ledger_rest::AppState;
use ledger_security::TokenVerifier;
use ledger_service::{
    AnalyticsServiceImpl, AnalyticsTtl, CacheGateway, DisabledCacheGateway,
    InMemoryCacheGateway, RedisCacheGateway, TransactionServiceImpl,
};
use metrics_exporter_prometheus::PrometheusHandle;
use std::sync::Arc;
use tracing::info;

/// Everything the server needs to serve and to shut down.
pub struct AppComponents {
    pub state: AppState,
    pub database: Arc<DatabasePool>,
}

/// Creates the cache gateway selected by `cache.backend`.
///
/// A Redis server that is down at startup is not an error: the gateway
/// reports not ready and analytics run uncached.
pub async fn build_cache_gateway(config: &CacheConfig) -> LedgerResult<Arc<dyn CacheGateway>> {
    let gateway: Arc<dyn CacheGateway> = match config.backend {
        CacheBackend::Redis => Arc::new(RedisCacheGateway::connect(config).await?),
        CacheBackend::Memory => Arc::new(InMemoryCacheGateway::new()),
        CacheBackend::Disabled => Arc::new(DisabledCacheGateway::new()),
    };
    info!(backend = gateway.backend(), ready = gateway.ready(), "Analytics cache configured");
    Ok(gateway)
}

/// Connects the database and cache and builds the services.
pub async fn build_components(
    config: &AppConfig,
    metrics: Option<PrometheusHandle>,
) -> LedgerResult<AppComponents> {
    let database = create_pool(&config.database).await?;
    if config.database.run_migrations {
        database.run_migrations().await?;
    }

    let cache = build_cache_gateway(&config.cache).await?;

    let analytics_service = Arc::new(AnalyticsServiceImpl::new(
        Arc::new(PgAggregationEngine::new(Arc::clone(&database))),
        Arc::clone(&cache),
        AnalyticsTtl::from(&config.analytics),
    ));
    let transaction_service = Arc::new(TransactionServiceImpl::new(Arc::new(
        PgTransactionRepository::new(Arc::clone(&database)),
    )));
    let token_verifier = Arc::new(TokenVerifier::new(Arc::new(config.security.clone())));

    let mut state = AppState::new(
        analytics_service,
        transaction_service,
        token_verifier,
        database.clone(),
        cache,
    );
    if let Some(handle) = metrics {
        state = state.with_metrics(handle);
    }

    Ok(AppComponents { state, database })
}
