//! Ledger transactions, the rows every aggregation reads.

use crate::{CategoryId, Money, PrincipalId, TransactionId};
use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Direction of a transaction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[serde(rename_all = "lowercase")]
pub enum TransactionType {
    Income,
    Expense,
}

impl TransactionType {
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Income => "income",
            Self::Expense => "expense",
        }
    }

    /// Parses the stored or wire name.
    #[must_use]
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "income" => Some(Self::Income),
            "expense" => Some(Self::Expense),
            _ => None,
        }
    }
}

impl fmt::Display for TransactionType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A single ledger entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[serde(rename_all = "camelCase")]
pub struct Transaction {
    pub id: TransactionId,
    pub user_id: PrincipalId,
    #[cfg_attr(feature = "openapi", schema(value_type = f64))]
    pub amount: Money,
    #[serde(rename = "type")]
    pub transaction_type: TransactionType,
    pub category_id: Option<CategoryId>,
    /// Category name resolved at read time; `None` when uncategorized.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    pub description: Option<String>,
    pub transaction_date: NaiveDate,
    pub created_at: DateTime<Utc>,
}

/// Fields of a transaction that is about to be stored.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewTransaction {
    pub user_id: PrincipalId,
    pub amount: Money,
    pub transaction_type: TransactionType,
    pub category_id: Option<CategoryId>,
    pub description: Option<String>,
    pub transaction_date: NaiveDate,
}

/// Partial update; `None` keeps the current value.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TransactionChanges {
    pub amount: Option<Money>,
    pub transaction_type: Option<TransactionType>,
    pub category_id: Option<CategoryId>,
    pub description: Option<String>,
    pub transaction_date: Option<NaiveDate>,
}

impl TransactionChanges {
    /// Applies the changes to an existing transaction.
    pub fn apply_to(self, tx: &mut Transaction) {
        if let Some(amount) = self.amount {
            tx.amount = amount;
        }
        if let Some(kind) = self.transaction_type {
            tx.transaction_type = kind;
        }
        if let Some(category_id) = self.category_id {
            tx.category_id = Some(category_id);
        }
        if let Some(description) = self.description {
            tx.description = Some(description);
        }
        if let Some(date) = self.transaction_date {
            tx.transaction_date = date;
        }
    }
}

/// Optional list filters.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TransactionFilter {
    pub transaction_type: Option<TransactionType>,
    pub category_id: Option<CategoryId>,
}

impl TransactionFilter {
    /// Returns true if `tx` passes the filter.
    #[must_use]
    pub fn matches(&self, tx: &Transaction) -> bool {
        self.transaction_type.map_or(true, |t| t == tx.transaction_type)
            && self.category_id.map_or(true, |c| tx.category_id == Some(c))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> Transaction {
        Transaction {
            id: TransactionId(1),
            user_id: PrincipalId(7),
            amount: Money::from_major(5000),
            transaction_type: TransactionType::Income,
            category_id: None,
            category: None,
            description: Some("salary".into()),
            transaction_date: NaiveDate::from_ymd_opt(2024, 3, 1).unwrap(),
            created_at: Utc::now(),
        }
    }

    #[test]
    fn test_transaction_type_parse() {
        assert_eq!(TransactionType::parse("Income"), Some(TransactionType::Income));
        assert_eq!(TransactionType::parse("expense"), Some(TransactionType::Expense));
        assert_eq!(TransactionType::parse("transfer"), None);
    }

    #[test]
    fn test_transaction_serializes_type_field() {
        let json = serde_json::to_value(sample()).unwrap();
        assert_eq!(json["type"], "income");
        assert_eq!(json["userId"], 7);
        assert_eq!(json["amount"], 5000);
        assert_eq!(json["transactionDate"], "2024-03-01");
        assert!(json.get("category").is_none());
    }

    #[test]
    fn test_changes_keep_absent_fields() {
        let mut tx = sample();
        TransactionChanges {
            amount: Some(Money::from_major(10)),
            ..TransactionChanges::default()
        }
        .apply_to(&mut tx);
        assert_eq!(tx.amount, Money::from_major(10));
        assert_eq!(tx.description.as_deref(), Some("salary"));
        assert_eq!(tx.transaction_type, TransactionType::Income);
    }

    #[test]
    fn test_filter() {
        let tx = sample();
        assert!(TransactionFilter::default().matches(&tx));
        let expenses = TransactionFilter {
            transaction_type: Some(TransactionType::Expense),
            category_id: None,
        };
        assert!(!expenses.matches(&tx));
        let by_category = TransactionFilter {
            transaction_type: None,
            category_id: Some(CategoryId(2)),
        };
        assert!(!by_category.matches(&tx));
    }
}
