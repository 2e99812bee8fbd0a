//! Cache lifetimes per analytics kind.

use ledger_config::AnalyticsConfig;
use ledger_core::AnalyticsKind;
use std::time::Duration;

/// TTL tier for each analytics kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AnalyticsTtl {
    pub monthly: Duration,
    pub category: Duration,
    pub income_expense: Duration,
}

impl AnalyticsTtl {
    /// Lifetime of a cached `kind` payload.
    #[must_use]
    pub const fn for_kind(&self, kind: AnalyticsKind) -> Duration {
        match kind {
            AnalyticsKind::Monthly => self.monthly,
            AnalyticsKind::Category => self.category,
            AnalyticsKind::IncomeExpense => self.income_expense,
        }
    }
}

impl Default for AnalyticsTtl {
    fn default() -> Self {
        Self::from(&AnalyticsConfig::default())
    }
}

impl From<&AnalyticsConfig> for AnalyticsTtl {
    fn from(config: &AnalyticsConfig) -> Self {
        Self {
            monthly: Duration::from_secs(config.monthly_ttl_secs),
            category: Duration::from_secs(config.category_ttl_secs),
            income_expense: Duration::from_secs(config.income_expense_ttl_secs),
        }
    }
}
