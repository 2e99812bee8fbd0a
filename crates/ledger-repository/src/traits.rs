//! Storage and aggregation traits.

use async_trait::async_trait;
use ledger_core::{
    CategoryTotal, IncomeExpensePoint, LedgerResult, MonthlyTotal, NewTransaction, Page,
    PageRequest, PrincipalId, QueryScope, Transaction, TransactionFilter, TransactionId,
};

/// Runs the three analytics aggregations over the ledger.
///
/// Every operation honors `scope.year` and `scope.owner_filter`; months or
/// categories without rows are omitted, so an empty vector is a valid result.
#[async_trait]
pub trait AggregationEngine: Send + Sync {
    /// Income and expense totals per month, month ascending.
    async fn monthly_totals(&self, scope: &QueryScope) -> LedgerResult<Vec<MonthlyTotal>>;

    /// Expense totals per category name, total descending then name ascending.
    async fn category_totals(&self, scope: &QueryScope) -> LedgerResult<Vec<CategoryTotal>>;

    /// Income and expense series per month, month ascending.
    async fn income_expense(&self, scope: &QueryScope) -> LedgerResult<Vec<IncomeExpensePoint>>;
}

/// Transaction storage.
#[async_trait]
pub trait TransactionRepository: Send + Sync {
    async fn find_by_id(&self, id: TransactionId) -> LedgerResult<Option<Transaction>>;

    /// Lists transactions newest first. `owner` restricts to one principal's rows.
    async fn find_page(
        &self,
        owner: Option<PrincipalId>,
        filter: TransactionFilter,
        page: PageRequest,
    ) -> LedgerResult<Page<Transaction>>;

    async fn insert(&self, tx: NewTransaction) -> LedgerResult<Transaction>;

    /// Persists every mutable field of `tx`.
    async fn update(&self, tx: &Transaction) -> LedgerResult<Transaction>;

    /// Returns false when no row had that ID.
    async fn delete(&self, id: TransactionId) -> LedgerResult<bool>;
}

/// Liveness probe of the backing store.
#[async_trait]
pub trait HealthCheck: Send + Sync {
    async fn health_check(&self) -> LedgerResult<()>;
}
