//! Prometheus metrics for the analytics cache.

use ledger_core::AnalyticsKind;
use metrics::{counter, describe_counter, describe_histogram, histogram};
use std::time::Duration;

/// Metric names for analytics.
pub mod names {
    /// Requests answered from the cache.
    pub const CACHE_HITS_TOTAL: &str = "ledger_analytics_cache_hits_total";
    /// Requests that had to aggregate.
    pub const CACHE_MISSES_TOTAL: &str = "ledger_analytics_cache_misses_total";
    /// Cache faults recovered as misses.
    pub const CACHE_FAULTS_TOTAL: &str = "ledger_analytics_cache_faults_total";
    /// Aggregation query duration in seconds.
    pub const AGGREGATION_SECONDS: &str = "ledger_analytics_aggregation_seconds";
}

/// Register all metric descriptions.
pub fn register_metrics() {
    describe_counter!(
        names::CACHE_HITS_TOTAL,
        "Analytics requests served from the cache"
    );
    describe_counter!(
        names::CACHE_MISSES_TOTAL,
        "Analytics requests that ran an aggregation"
    );
    describe_counter!(
        names::CACHE_FAULTS_TOTAL,
        "Cache faults treated as misses"
    );
    describe_histogram!(
        names::AGGREGATION_SECONDS,
        "Aggregation query duration in seconds"
    );
}

/// Records analytics metrics. Labels are always the analytics kind.
#[derive(Debug, Clone, Copy, Default)]
pub struct AnalyticsMetrics;

impl AnalyticsMetrics {
    pub fn hit(&self, kind: AnalyticsKind) {
        counter!(names::CACHE_HITS_TOTAL, "kind" => kind.as_str()).increment(1);
    }

    pub fn miss(&self, kind: AnalyticsKind) {
        counter!(names::CACHE_MISSES_TOTAL, "kind" => kind.as_str()).increment(1);
    }

    pub fn fault(&self, kind: AnalyticsKind, fault: &'static str) {
        counter!(names::CACHE_FAULTS_TOTAL, "kind" => kind.as_str(), "fault" => fault).increment(1);
    }

    pub fn aggregation(&self, kind: AnalyticsKind, elapsed: Duration) {
        histogram!(names::AGGREGATION_SECONDS, "kind" => kind.as_str()).record(elapsed.as_secs_f64());
    }
}
