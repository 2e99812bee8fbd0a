//! Postgres transaction repository.

use crate::{DatabasePool, TransactionRepository};
use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, Utc};
use ledger_core::{
    CategoryId, LedgerError, LedgerResult, Money, NewTransaction, Page, PageRequest, PrincipalId,
    Transaction, TransactionFilter, TransactionId, TransactionType,
};
use sqlx::FromRow;
use std::sync::Arc;
use tracing::debug;

/// Postgres-backed [`TransactionRepository`].
#[derive(Clone)]
pub struct PgTransactionRepository {
    pool: Arc<DatabasePool>,
}

impl PgTransactionRepository {
    #[must_use]
    pub fn new(pool: Arc<DatabasePool>) -> Self {
        Self { pool }
    }
}

/// Database row representation of a transaction.
#[derive(Debug, FromRow)]
struct TransactionRow {
    id: i64,
    user_id: i64,
    amount_cents: i64,
    #[sqlx(rename = "type")]
    kind: String,
    category_id: Option<i64>,
    category: Option<String>,
    description: Option<String>,
    transaction_date: NaiveDate,
    created_at: DateTime<Utc>,
}

impl TryFrom<TransactionRow> for Transaction {
    type Error = LedgerError;

    fn try_from(row: TransactionRow) -> Result<Self, Self::Error> {
        let transaction_type = TransactionType::parse(&row.kind).ok_or_else(|| {
            LedgerError::Internal(format!("Invalid transaction type in database: {}", row.kind))
        })?;

        Ok(Transaction {
            id: TransactionId(row.id),
            user_id: PrincipalId(row.user_id),
            amount: Money::from_cents(row.amount_cents),
            transaction_type,
            category_id: row.category_id.map(CategoryId),
            category: row.category,
            description: row.description,
            transaction_date: row.transaction_date,
            created_at: row.created_at,
        })
    }
}

const SELECT_COLUMNS: &str = r#"
    SELECT t.id, t.user_id, (t.amount * 100)::BIGINT AS amount_cents, t.type,
           t.category_id, c.name AS category, t.description, t.transaction_date, t.created_at
    FROM transactions t
    LEFT JOIN categories c ON t.category_id = c.id
"#;

const FILTER: &str = r#"
    WHERE ($1::BIGINT IS NULL OR t.user_id = $1)
      AND ($2::TEXT IS NULL OR t.type = $2)
      AND ($3::BIGINT IS NULL OR t.category_id = $3)
"#;

impl PgTransactionRepository {
    async fn fetch(&self, id: TransactionId) -> LedgerResult<Transaction> {
        self.find_by_id(id)
            .await?
            .ok_or_else(|| LedgerError::not_found("Transaction", id))
    }
}

#[async_trait]
impl TransactionRepository for PgTransactionRepository {
    async fn find_by_id(&self, id: TransactionId) -> LedgerResult<Option<Transaction>> {
        debug!("Finding transaction by id: {}", id);

        let row = sqlx::query_as::<_, TransactionRow>(&format!("{} WHERE t.id = $1", SELECT_COLUMNS))
            .bind(id.into_inner())
            .fetch_optional(self.pool.inner())
            .await?;

        row.map(Transaction::try_from).transpose()
    }

    async fn find_page(
        &self,
        owner: Option<PrincipalId>,
        filter: TransactionFilter,
        page: PageRequest,
    ) -> LedgerResult<Page<Transaction>> {
        debug!(owner = ?owner, page = page.page, size = page.size, "Listing transactions");

        let owner = owner.map(i64::from);
        let kind = filter.transaction_type.map(|t| t.as_str());
        let category = filter.category_id.map(i64::from);

        let total: i64 = sqlx::query_scalar(&format!("SELECT COUNT(*) FROM transactions t {}", FILTER))
            .bind(owner)
            .bind(kind)
            .bind(category)
            .fetch_one(self.pool.inner())
            .await?;

        let rows = sqlx::query_as::<_, TransactionRow>(&format!(
            "{} {} ORDER BY t.transaction_date DESC, t.id DESC LIMIT $4 OFFSET $5",
            SELECT_COLUMNS, FILTER
        ))
        .bind(owner)
        .bind(kind)
        .bind(category)
        .bind(page.limit())
        .bind(page.offset())
        .fetch_all(self.pool.inner())
        .await?;

        let content = rows
            .into_iter()
            .map(Transaction::try_from)
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Page::new(content, page, u64::try_from(total).unwrap_or(0)))
    }

    async fn insert(&self, tx: NewTransaction) -> LedgerResult<Transaction> {
        let id: i64 = sqlx::query_scalar(
            r#"
            INSERT INTO transactions (user_id, amount, type, category_id, description, transaction_date)
            VALUES ($1, $2::NUMERIC / 100, $3, $4, $5, $6)
            RETURNING id
            "#,
        )
        .bind(tx.user_id.into_inner())
        .bind(tx.amount.cents())
        .bind(tx.transaction_type.as_str())
        .bind(tx.category_id.map(i64::from))
        .bind(tx.description)
        .bind(tx.transaction_date)
        .fetch_one(self.pool.inner())
        .await?;

        debug!("Created transaction {} for user {}", id, tx.user_id);
        self.fetch(TransactionId(id)).await
    }

    async fn update(&self, tx: &Transaction) -> LedgerResult<Transaction> {
        let result = sqlx::query(
            r#"
            UPDATE transactions
            SET amount = $1::NUMERIC / 100,
                type = $2,
                category_id = $3,
                description = $4,
                transaction_date = $5
            WHERE id = $6
            "#,
        )
        .bind(tx.amount.cents())
        .bind(tx.transaction_type.as_str())
        .bind(tx.category_id.map(i64::from))
        .bind(tx.description.as_deref())
        .bind(tx.transaction_date)
        .bind(tx.id.into_inner())
        .execute(self.pool.inner())
        .await?;

        if result.rows_affected() == 0 {
            return Err(LedgerError::not_found("Transaction", tx.id));
        }
        self.fetch(tx.id).await
    }

    async fn delete(&self, id: TransactionId) -> LedgerResult<bool> {
        let result = sqlx::query("DELETE FROM transactions WHERE id = $1")
            .bind(id.into_inner())
            .execute(self.pool.inner())
            .await?;
        Ok(result.rows_affected() > 0)
    }
}
