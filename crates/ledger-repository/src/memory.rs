//! In-process ledger used by tests and local runs without Postgres.

use crate::{AggregationEngine, HealthCheck, TransactionRepository};
use async_trait::async_trait;
use chrono::{Datelike, Utc};
use ledger_core::{
    sort_category_totals, CategoryId, CategoryTotal, IncomeExpensePoint, LedgerError, LedgerResult,
    Money, MonthlyTotal, NewTransaction, Page, PageRequest, PrincipalId, QueryScope, Transaction,
    TransactionFilter, TransactionId, TransactionType, YearMonth, UNCATEGORIZED,
};
use std::collections::{BTreeMap, HashMap};
use tokio::sync::RwLock;

#[derive(Default)]
struct LedgerState {
    transactions: BTreeMap<TransactionId, Transaction>,
    categories: HashMap<CategoryId, String>,
    next_transaction_id: i64,
    next_category_id: i64,
}

impl LedgerState {
    fn category_name(&self, id: Option<CategoryId>) -> Option<String> {
        id.and_then(|id| self.categories.get(&id).cloned())
    }

    fn scoped<'a>(&'a self, scope: &'a QueryScope) -> impl Iterator<Item = &'a Transaction> + 'a {
        self.transactions.values().filter(move |tx| {
            tx.transaction_date.year() == scope.year && scope.admits(tx.user_id)
        })
    }

    /// Income and expense per month of the scoped year.
    fn month_sums(&self, scope: &QueryScope) -> BTreeMap<u32, (Money, Money)> {
        let mut months: BTreeMap<u32, (Money, Money)> = BTreeMap::new();
        for tx in self.scoped(scope) {
            let entry = months.entry(tx.transaction_date.month()).or_default();
            match tx.transaction_type {
                TransactionType::Income => entry.0 += tx.amount,
                TransactionType::Expense => entry.1 += tx.amount,
            }
        }
        months
    }
}

/// A ledger held in memory, implementing both storage and aggregation with
/// the same semantics as the Postgres implementations.
#[derive(Default)]
pub struct InMemoryLedger {
    state: RwLock<LedgerState>,
}

impl InMemoryLedger {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a category and returns its ID.
    pub async fn add_category(&self, name: impl Into<String>) -> CategoryId {
        let mut state = self.state.write().await;
        state.next_category_id += 1;
        let id = CategoryId(state.next_category_id);
        state.categories.insert(id, name.into());
        id
    }

    /// Number of stored transactions.
    pub async fn len(&self) -> usize {
        self.state.read().await.transactions.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.len().await == 0
    }
}

fn year_month(year: i32, month: u32) -> LedgerResult<YearMonth> {
    YearMonth::new(year, month)
        .ok_or_else(|| LedgerError::Internal(format!("Invalid month {}", month)))
}

#[async_trait]
impl AggregationEngine for InMemoryLedger {
    async fn monthly_totals(&self, scope: &QueryScope) -> LedgerResult<Vec<MonthlyTotal>> {
        let state = self.state.read().await;
        state
            .month_sums(scope)
            .into_iter()
            .map(|(month, (income, expense))| {
                Ok(MonthlyTotal {
                    month: year_month(scope.year, month)?,
                    total_income: income,
                    total_expense: expense,
                })
            })
            .collect()
    }

    async fn category_totals(&self, scope: &QueryScope) -> LedgerResult<Vec<CategoryTotal>> {
        let state = self.state.read().await;
        let mut sums: HashMap<String, Money> = HashMap::new();
        for tx in state
            .scoped(scope)
            .filter(|tx| tx.transaction_type == TransactionType::Expense)
        {
            let name = state
                .category_name(tx.category_id)
                .unwrap_or_else(|| UNCATEGORIZED.to_string());
            *sums.entry(name).or_default() += tx.amount;
        }

        let mut totals: Vec<CategoryTotal> = sums
            .into_iter()
            .map(|(category, total)| CategoryTotal { category, total })
            .collect();
        sort_category_totals(&mut totals);
        Ok(totals)
    }

    async fn income_expense(&self, scope: &QueryScope) -> LedgerResult<Vec<IncomeExpensePoint>> {
        let state = self.state.read().await;
        state
            .month_sums(scope)
            .into_iter()
            .map(|(month, (income, expense))| {
                Ok(IncomeExpensePoint {
                    month: year_month(scope.year, month)?,
                    income,
                    expense,
                })
            })
            .collect()
    }
}

#[async_trait]
impl TransactionRepository for InMemoryLedger {
    async fn find_by_id(&self, id: TransactionId) -> LedgerResult<Option<Transaction>> {
        Ok(self.state.read().await.transactions.get(&id).cloned())
    }

    async fn find_page(
        &self,
        owner: Option<PrincipalId>,
        filter: TransactionFilter,
        page: PageRequest,
    ) -> LedgerResult<Page<Transaction>> {
        let state = self.state.read().await;
        let mut rows: Vec<&Transaction> = state
            .transactions
            .values()
            .filter(|tx| owner.map_or(true, |o| tx.user_id == o))
            .filter(|tx| filter.matches(tx))
            .collect();
        rows.sort_by(|a, b| {
            b.transaction_date
                .cmp(&a.transaction_date)
                .then_with(|| b.id.cmp(&a.id))
        });

        let total = rows.len() as u64;
        let offset = usize::try_from(page.offset()).unwrap_or(usize::MAX);
        let limit = usize::try_from(page.limit()).unwrap_or(0);
        let content = rows.into_iter().skip(offset).take(limit).cloned().collect();
        Ok(Page::new(content, page, total))
    }

    async fn insert(&self, tx: NewTransaction) -> LedgerResult<Transaction> {
        let mut state = self.state.write().await;
        if let Some(category_id) = tx.category_id {
            if !state.categories.contains_key(&category_id) {
                return Err(LedgerError::validation("Referenced record does not exist"));
            }
        }
        state.next_transaction_id += 1;
        let id = TransactionId(state.next_transaction_id);
        let stored = Transaction {
            id,
            user_id: tx.user_id,
            amount: tx.amount,
            transaction_type: tx.transaction_type,
            category_id: tx.category_id,
            category: state.category_name(tx.category_id),
            description: tx.description,
            transaction_date: tx.transaction_date,
            created_at: Utc::now(),
        };
        state.transactions.insert(id, stored.clone());
        Ok(stored)
    }

    async fn update(&self, tx: &Transaction) -> LedgerResult<Transaction> {
        let mut state = self.state.write().await;
        if tx.category_id.is_some_and(|id| !state.categories.contains_key(&id)) {
            return Err(LedgerError::validation("Referenced record does not exist"));
        }
        let category = state.category_name(tx.category_id);
        let existing = state
            .transactions
            .get_mut(&tx.id)
            .ok_or_else(|| LedgerError::not_found("Transaction", tx.id))?;
        *existing = Transaction {
            user_id: existing.user_id,
            created_at: existing.created_at,
            category,
            ..tx.clone()
        };
        Ok(existing.clone())
    }

    async fn delete(&self, id: TransactionId) -> LedgerResult<bool> {
        Ok(self.state.write().await.transactions.remove(&id).is_some())
    }
}

#[async_trait]
impl HealthCheck for InMemoryLedger {
    async fn health_check(&self) -> LedgerResult<()> {
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use ledger_core::{AnalyticsKind, Principal, Role};

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn entry(user: i64, major: i64, kind: TransactionType, category: Option<CategoryId>, on: NaiveDate) -> NewTransaction {
        NewTransaction {
            user_id: PrincipalId(user),
            amount: Money::from_major(major),
            transaction_type: kind,
            category_id: category,
            description: None,
            transaction_date: on,
        }
    }

    fn scope(id: i64, role: Role, kind: AnalyticsKind, year: i32) -> QueryScope {
        QueryScope::derive(&Principal::new(PrincipalId(id), role), kind, year)
    }

    async fn seeded() -> InMemoryLedger {
        let ledger = InMemoryLedger::new();
        let rent = ledger.add_category("Rent").await;
        let food = ledger.add_category("Food").await;
        for tx in [
            entry(7, 5000, TransactionType::Income, None, date(2024, 3, 1)),
            entry(7, 1200, TransactionType::Expense, Some(rent), date(2024, 3, 5)),
            entry(7, 80, TransactionType::Expense, Some(food), date(2024, 5, 9)),
            entry(7, 15, TransactionType::Expense, None, date(2024, 5, 10)),
            entry(8, 300, TransactionType::Expense, Some(food), date(2024, 3, 2)),
            entry(7, 999, TransactionType::Income, None, date(2023, 3, 1)),
        ] {
            ledger.insert(tx).await.unwrap();
        }
        ledger
    }

    #[tokio::test]
    async fn test_monthly_totals_for_owner() {
        let ledger = seeded().await;
        let totals = ledger
            .monthly_totals(&scope(7, Role::User, AnalyticsKind::Monthly, 2024))
            .await
            .unwrap();

        assert_eq!(totals.len(), 2);
        assert_eq!(totals[0].month.to_string(), "2024-03");
        assert_eq!(totals[0].total_income, Money::from_major(5000));
        assert_eq!(totals[0].total_expense, Money::from_major(1200));
        assert_eq!(totals[1].month.to_string(), "2024-05");
        assert_eq!(totals[1].total_income, Money::ZERO);
        assert_eq!(totals[1].total_expense, Money::from_major(95));
    }

    #[tokio::test]
    async fn test_category_totals_exclude_other_owners() {
        let ledger = seeded().await;
        let totals = ledger
            .category_totals(&scope(7, Role::ReadOnly, AnalyticsKind::Category, 2024))
            .await
            .unwrap();
        let pairs: Vec<_> = totals.iter().map(|t| (t.category.as_str(), t.total)).collect();
        assert_eq!(
            pairs,
            [
                ("Rent", Money::from_major(1200)),
                ("Food", Money::from_major(80)),
                ("Uncategorized", Money::from_major(15)),
            ]
        );
    }

    #[tokio::test]
    async fn test_admin_sees_union() {
        let ledger = seeded().await;
        let totals = ledger
            .category_totals(&scope(1, Role::Admin, AnalyticsKind::Category, 2024))
            .await
            .unwrap();
        let food = totals.iter().find(|t| t.category == "Food").unwrap();
        assert_eq!(food.total, Money::from_major(380));
    }

    #[tokio::test]
    async fn test_empty_year_is_empty_result() {
        let ledger = seeded().await;
        let series = ledger
            .income_expense(&scope(7, Role::User, AnalyticsKind::IncomeExpense, 2019))
            .await
            .unwrap();
        assert!(series.is_empty());
    }

    #[tokio::test]
    async fn test_find_page_orders_newest_first() {
        let ledger = seeded().await;
        let page = ledger
            .find_page(Some(PrincipalId(7)), TransactionFilter::default(), PageRequest::new(0, 2))
            .await
            .unwrap();
        assert_eq!(page.total_elements, 5);
        assert_eq!(page.total_pages, 3);
        assert_eq!(page.content[0].transaction_date, date(2024, 5, 10));
        assert_eq!(page.content[1].transaction_date, date(2024, 5, 9));
    }

    #[tokio::test]
    async fn test_find_page_filters_by_type() {
        let ledger = seeded().await;
        let filter = TransactionFilter {
            transaction_type: Some(TransactionType::Income),
            category_id: None,
        };
        let page = ledger.find_page(None, filter, PageRequest::default()).await.unwrap();
        assert_eq!(page.total_elements, 2);
        assert!(page
            .content
            .iter()
            .all(|tx| tx.transaction_type == TransactionType::Income));
    }

    #[tokio::test]
    async fn test_insert_rejects_unknown_category() {
        let ledger = InMemoryLedger::new();
        let result = ledger
            .insert(entry(7, 10, TransactionType::Expense, Some(CategoryId(42)), date(2024, 1, 1)))
            .await;
        assert!(matches!(result, Err(LedgerError::Validation(_))));
        assert!(ledger.is_empty().await);
    }

    #[tokio::test]
    async fn test_update_keeps_owner_and_delete() {
        let ledger = seeded().await;
        let mut tx = ledger.find_by_id(TransactionId(1)).await.unwrap().unwrap();
        tx.user_id = PrincipalId(99);
        tx.amount = Money::from_major(6000);
        let updated = ledger.update(&tx).await.unwrap();
        assert_eq!(updated.user_id, PrincipalId(7));
        assert_eq!(updated.amount, Money::from_major(6000));

        assert!(ledger.delete(TransactionId(1)).await.unwrap());
        assert!(!ledger.delete(TransactionId(1)).await.unwrap());
        assert!(ledger.find_by_id(TransactionId(1)).await.unwrap().is_none());
    }
}
