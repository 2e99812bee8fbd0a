//! Cache-aside analytics service.

use crate::analytics_service::AnalyticsService;
use crate::cache::{analytics_key, CacheGateway, CacheGatewayExt};
use crate::metrics::AnalyticsMetrics;
use crate::ttl::AnalyticsTtl;
use async_trait::async_trait;
use ledger_core::{
    AnalyticsKind, CategoryTotal, IncomeExpensePoint, LedgerError, LedgerResult, MonthlyTotal,
    Permission, Principal, QueryScope,
};
use ledger_repository::AggregationEngine;
use ledger_security::PrincipalExt;
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::future::Future;
use std::sync::Arc;
use std::time::Instant;
use tracing::{debug, error};

/// Reads analytics through the cache, aggregating on a miss.
pub struct AnalyticsServiceImpl {
    engine: Arc<dyn AggregationEngine>,
    cache: Arc<dyn CacheGateway>,
    ttl: AnalyticsTtl,
    metrics: AnalyticsMetrics,
}

impl AnalyticsServiceImpl {
    /// Creates a new analytics service.
    pub fn new(
        engine: Arc<dyn AggregationEngine>,
        cache: Arc<dyn CacheGateway>,
        ttl: AnalyticsTtl,
    ) -> Self {
        Self {
            engine,
            cache,
            ttl,
            metrics: AnalyticsMetrics,
        }
    }

    /// The cache-aside flow shared by every kind.
    ///
    /// A hit returns the cached payload untouched. Anything else (not ready,
    /// absent, a fault) aggregates and then stores the result under the same
    /// key with the kind's TTL.
    async fn read_through<T, F, Fut>(
        &self,
        principal: &Principal,
        kind: AnalyticsKind,
        year: i32,
        aggregate: F,
    ) -> LedgerResult<Vec<T>>
    where
        T: Serialize + DeserializeOwned + Send + Sync,
        F: FnOnce(QueryScope) -> Fut + Send,
        Fut: Future<Output = LedgerResult<Vec<T>>> + Send,
    {
        principal.require_permission(Permission::AnalyticsRead)?;
        let scope = QueryScope::derive(principal, kind, year);
        let key = analytics_key(&scope);

        if self.cache.ready() {
            match self.cache.get_json::<Vec<T>>(&key).await {
                Ok(Some(cached)) => {
                    debug!(key = %key, "Analytics cache hit");
                    self.metrics.hit(kind);
                    return Ok(cached);
                }
                Ok(None) => debug!(key = %key, "Analytics cache miss"),
                Err(fault) => self.metrics.fault(kind, fault.kind()),
            }
        }
        self.metrics.miss(kind);

        let started = Instant::now();
        let result = aggregate(scope).await.map_err(|e| {
            error!(key = %key, error = %e, "Aggregation failed");
            LedgerError::aggregation(kind.label(), &e)
        })?;
        self.metrics.aggregation(kind, started.elapsed());

        if self.cache.ready() {
            if let Err(fault) = self.cache.set_json(&key, &result, self.ttl.for_kind(kind)).await {
                self.metrics.fault(kind, fault.kind());
            }
        }

        Ok(result)
    }
}

#[async_trait]
impl AnalyticsService for AnalyticsServiceImpl {
    async fn monthly(&self, principal: &Principal, year: i32) -> LedgerResult<Vec<MonthlyTotal>> {
        let engine = Arc::clone(&self.engine);
        self.read_through(principal, AnalyticsKind::Monthly, year, move |scope| async move {
            engine.monthly_totals(&scope).await
        })
        .await
    }

    async fn category(&self, principal: &Principal, year: i32) -> LedgerResult<Vec<CategoryTotal>> {
        let engine = Arc::clone(&self.engine);
        self.read_through(principal, AnalyticsKind::Category, year, move |scope| async move {
            engine.category_totals(&scope).await
        })
        .await
    }

    async fn income_expense(
        &self,
        principal: &Principal,
        year: i32,
    ) -> LedgerResult<Vec<IncomeExpensePoint>> {
        let engine = Arc::clone(&self.engine);
        self.read_through(principal, AnalyticsKind::IncomeExpense, year, move |scope| async move {
            engine.income_expense(&scope).await
        })
        .await
    }
}
