//! Postgres analytics aggregation.

use crate::{AggregationEngine, DatabasePool};
use async_trait::async_trait;
use ledger_core::{
    sort_category_totals, CategoryTotal, IncomeExpensePoint, LedgerError, LedgerResult, Money,
    MonthlyTotal, QueryScope, YearMonth,
};
use sqlx::FromRow;
use std::sync::Arc;
use tracing::debug;

/// Aggregates ledger rows with SQL `GROUP BY`.
///
/// Amounts are summed as `NUMERIC` and converted to integer cents inside the
/// query, so no floating point is involved anywhere.
#[derive(Clone)]
pub struct PgAggregationEngine {
    pool: Arc<DatabasePool>,
}

impl PgAggregationEngine {
    #[must_use]
    pub fn new(pool: Arc<DatabasePool>) -> Self {
        Self { pool }
    }
}

const MONTHLY_SQL: &str = r#"
    SELECT
        EXTRACT(MONTH FROM transaction_date)::INT AS month,
        (COALESCE(SUM(CASE WHEN type = 'income' THEN amount ELSE 0 END), 0) * 100)::BIGINT AS income_cents,
        (COALESCE(SUM(CASE WHEN type = 'expense' THEN amount ELSE 0 END), 0) * 100)::BIGINT AS expense_cents
    FROM transactions
    WHERE transaction_date >= make_date($1, 1, 1)
      AND transaction_date < make_date($1 + 1, 1, 1)
      AND ($2::BIGINT IS NULL OR user_id = $2)
    GROUP BY 1
    ORDER BY 1
"#;

const CATEGORY_SQL: &str = r#"
    SELECT
        COALESCE(c.name, 'Uncategorized') AS category,
        (COALESCE(SUM(t.amount), 0) * 100)::BIGINT AS total_cents
    FROM transactions t
    LEFT JOIN categories c ON t.category_id = c.id
    WHERE t.type = 'expense'
      AND t.transaction_date >= make_date($1, 1, 1)
      AND t.transaction_date < make_date($1 + 1, 1, 1)
      AND ($2::BIGINT IS NULL OR t.user_id = $2)
    GROUP BY 1
    ORDER BY total_cents DESC, category ASC
"#;

#[derive(Debug, FromRow)]
struct MonthRow {
    month: i32,
    income_cents: i64,
    expense_cents: i64,
}

impl MonthRow {
    fn year_month(&self, year: i32) -> LedgerResult<YearMonth> {
        u32::try_from(self.month)
            .ok()
            .and_then(|m| YearMonth::new(year, m))
            .ok_or_else(|| LedgerError::Internal(format!("Invalid month {} from database", self.month)))
    }
}

#[derive(Debug, FromRow)]
struct CategoryRow {
    category: String,
    total_cents: i64,
}

impl PgAggregationEngine {
    async fn month_rows(&self, scope: &QueryScope) -> LedgerResult<Vec<MonthRow>> {
        debug!(year = scope.year, owner = ?scope.owner_filter, "Aggregating months");
        let rows = sqlx::query_as::<_, MonthRow>(MONTHLY_SQL)
            .bind(scope.year)
            .bind(scope.owner_filter.map(i64::from))
            .fetch_all(self.pool.inner())
            .await?;
        Ok(rows)
    }
}

#[async_trait]
impl AggregationEngine for PgAggregationEngine {
    async fn monthly_totals(&self, scope: &QueryScope) -> LedgerResult<Vec<MonthlyTotal>> {
        self.month_rows(scope)
            .await?
            .into_iter()
            .map(|row| {
                Ok(MonthlyTotal {
                    month: row.year_month(scope.year)?,
                    total_income: Money::from_cents(row.income_cents),
                    total_expense: Money::from_cents(row.expense_cents),
                })
            })
            .collect()
    }

    async fn category_totals(&self, scope: &QueryScope) -> LedgerResult<Vec<CategoryTotal>> {
        debug!(year = scope.year, owner = ?scope.owner_filter, "Aggregating categories");
        let rows = sqlx::query_as::<_, CategoryRow>(CATEGORY_SQL)
            .bind(scope.year)
            .bind(scope.owner_filter.map(i64::from))
            .fetch_all(self.pool.inner())
            .await?;

        let mut totals: Vec<CategoryTotal> = rows
            .into_iter()
            .map(|row| CategoryTotal {
                category: row.category,
                total: Money::from_cents(row.total_cents),
            })
            .collect();
        // Collation of ORDER BY may differ from byte order.
        sort_category_totals(&mut totals);
        Ok(totals)
    }

    async fn income_expense(&self, scope: &QueryScope) -> LedgerResult<Vec<IncomeExpensePoint>> {
        self.month_rows(scope)
            .await?
            .into_iter()
            .map(|row| {
                Ok(IncomeExpensePoint {
                    month: row.year_month(scope.year)?,
                    income: Money::from_cents(row.income_cents),
                    expense: Money::from_cents(row.expense_cents),
                })
            })
            .collect()
    }
}
