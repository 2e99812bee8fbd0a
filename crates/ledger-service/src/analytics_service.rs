//! Analytics service trait definition.

use ledger_core::{CategoryTotal, IncomeExpensePoint, LedgerResult, MonthlyTotal, Principal};
use async_trait::async_trait;

/// Cache-aside analytics for an authenticated principal.
///
/// Every operation scopes rows to what `principal` may see. Cache trouble
/// never fails a request; a failed aggregation does.
#[async_trait]
pub trait AnalyticsService: Send + Sync {
    /// Income and expense totals per month of `year`, month ascending.
    async fn monthly(&self, principal: &Principal, year: i32) -> LedgerResult<Vec<MonthlyTotal>>;

    /// Expense totals per category for `year`, largest first.
    async fn category(&self, principal: &Principal, year: i32) -> LedgerResult<Vec<CategoryTotal>>;

    /// Income and expense series per month of `year`.
    async fn income_expense(
        &self,
        principal: &Principal,
        year: i32,
    ) -> LedgerResult<Vec<IncomeExpensePoint>>;
}
