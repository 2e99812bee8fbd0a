//! Transaction request and response DTOs.

use crate::dto::ValidateExt;
use chrono::NaiveDate;
use ledger_core::{
    CategoryId, LedgerError, LedgerResult, Money, NewTransaction, Page, PageRequest, PrincipalId,
    Transaction, TransactionChanges, TransactionFilter, TransactionType,
};
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};
use validator::Validate;

const REQUIRED_FIELDS: &str = "amount, type, transactionDate required";
const INVALID_TYPE: &str = "type must be income or expense";
const NON_POSITIVE_AMOUNT: &str = "amount must be greater than 0";

/// Request to record a transaction.
#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateTransactionRequest {
    #[schema(value_type = Option<f64>, example = 1200)]
    pub amount: Option<Money>,

    #[serde(rename = "type")]
    #[schema(example = "expense")]
    pub transaction_type: Option<String>,

    pub category_id: Option<CategoryId>,

    #[validate(length(max = 500, message = "Description cannot exceed 500 characters"))]
    pub description: Option<String>,

    #[schema(value_type = Option<String>, example = "2024-03-05")]
    pub transaction_date: Option<NaiveDate>,
}

impl CreateTransactionRequest {
    /// Checks the request and builds the row to insert for `owner`.
    pub fn into_new_transaction(self, owner: PrincipalId) -> LedgerResult<NewTransaction> {
        let (Some(amount), Some(kind), Some(transaction_date)) =
            (self.amount, self.transaction_type.as_deref(), self.transaction_date)
        else {
            return Err(LedgerError::validation(REQUIRED_FIELDS));
        };
        let transaction_type = parse_type(kind)?;
        check_amount(amount)?;
        self.validate_request()?;

        Ok(NewTransaction {
            user_id: owner,
            amount,
            transaction_type,
            category_id: self.category_id,
            description: self.description,
            transaction_date,
        })
    }
}

/// Partial update of a transaction. Absent fields keep their current value.
#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateTransactionRequest {
    #[schema(value_type = Option<f64>)]
    pub amount: Option<Money>,

    #[serde(rename = "type")]
    pub transaction_type: Option<String>,

    pub category_id: Option<CategoryId>,

    #[validate(length(max = 500, message = "Description cannot exceed 500 characters"))]
    pub description: Option<String>,

    #[schema(value_type = Option<String>)]
    pub transaction_date: Option<NaiveDate>,
}

impl UpdateTransactionRequest {
    /// Checks the request and converts it into domain changes.
    pub fn into_changes(self) -> LedgerResult<TransactionChanges> {
        let transaction_type = self.transaction_type.as_deref().map(parse_type).transpose()?;
        if let Some(amount) = self.amount {
            check_amount(amount)?;
        }
        self.validate_request()?;

        Ok(TransactionChanges {
            amount: self.amount,
            transaction_type,
            category_id: self.category_id,
            description: self.description,
            transaction_date: self.transaction_date,
        })
    }
}

/// Query string of the transaction listing. Pages start at 1.
#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate, IntoParams)]
#[serde(rename_all = "camelCase")]
#[into_params(parameter_in = Query)]
pub struct TransactionListQuery {
    #[validate(range(min = 1, message = "page must be at least 1"))]
    pub page: Option<u32>,

    #[validate(range(min = 1, max = 100, message = "limit must be between 1 and 100"))]
    pub limit: Option<u32>,

    #[serde(rename = "type")]
    pub transaction_type: Option<String>,

    #[param(value_type = Option<i64>)]
    pub category_id: Option<CategoryId>,
}

impl TransactionListQuery {
    pub const DEFAULT_LIMIT: u32 = 10;

    /// Splits the query into a row filter and a 0-based page request.
    pub fn into_parts(self) -> LedgerResult<(TransactionFilter, PageRequest)> {
        self.validate_request()?;
        let transaction_type = self.transaction_type.as_deref().map(parse_type).transpose()?;

        let page = self.page.unwrap_or(1).saturating_sub(1);
        let limit = self.limit.unwrap_or(Self::DEFAULT_LIMIT);
        Ok((
            TransactionFilter {
                transaction_type,
                category_id: self.category_id,
            },
            PageRequest::new(page, limit),
        ))
    }
}

/// One page of transactions.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct TransactionListResponse {
    pub transactions: Vec<Transaction>,
    /// 1-based page number.
    pub page: u32,
    pub limit: u32,
    pub total: u64,
    pub total_pages: u64,
}

impl From<Page<Transaction>> for TransactionListResponse {
    fn from(page: Page<Transaction>) -> Self {
        Self {
            transactions: page.content,
            page: page.page + 1,
            limit: page.size,
            total: page.total_elements,
            total_pages: page.total_pages,
        }
    }
}

/// Plain acknowledgement body.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct MessageResponse {
    pub message: String,
}

impl MessageResponse {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

fn parse_type(raw: &str) -> LedgerResult<TransactionType> {
    TransactionType::parse(raw).ok_or_else(|| LedgerError::validation(INVALID_TYPE))
}

fn check_amount(amount: Money) -> LedgerResult<()> {
    if amount.is_positive() {
        Ok(())
    } else {
        Err(LedgerError::validation(NON_POSITIVE_AMOUNT))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn valid_create() -> CreateTransactionRequest {
        CreateTransactionRequest {
            amount: Some(Money::from_major(1200)),
            transaction_type: Some("expense".to_string()),
            category_id: Some(CategoryId(3)),
            description: Some("Rent".to_string()),
            transaction_date: NaiveDate::from_ymd_opt(2024, 3, 5),
        }
    }

    #[test]
    fn test_create_request_valid() {
        let tx = valid_create().into_new_transaction(PrincipalId(7)).unwrap();
        assert_eq!(tx.user_id, PrincipalId(7));
        assert_eq!(tx.transaction_type, TransactionType::Expense);
        assert_eq!(tx.amount, Money::from_major(1200));
    }

    #[test]
    fn test_create_request_missing_fields() {
        let request = CreateTransactionRequest {
            transaction_date: None,
            ..valid_create()
        };
        let err = request.into_new_transaction(PrincipalId(7)).unwrap_err();
        assert_eq!(err.to_string(), format!("Validation error: {}", REQUIRED_FIELDS));
    }

    #[test]
    fn test_create_request_bad_type() {
        let request = CreateTransactionRequest {
            transaction_type: Some("transfer".to_string()),
            ..valid_create()
        };
        assert!(matches!(
            request.into_new_transaction(PrincipalId(7)),
            Err(LedgerError::Validation(msg)) if msg == INVALID_TYPE
        ));
    }

    #[test]
    fn test_create_request_non_positive_amount() {
        let request = CreateTransactionRequest {
            amount: Some(Money::ZERO),
            ..valid_create()
        };
        assert!(matches!(
            request.into_new_transaction(PrincipalId(7)),
            Err(LedgerError::Validation(_))
        ));
    }

    #[test]
    fn test_create_request_description_too_long() {
        let request = CreateTransactionRequest {
            description: Some("x".repeat(501)),
            ..valid_create()
        };
        let err = request.into_new_transaction(PrincipalId(7)).unwrap_err();
        assert!(err.to_string().contains("description"));
    }

    #[test]
    fn test_create_request_from_json() {
        let json = r#"{"amount": 12.5, "type": "income", "transactionDate": "2024-01-31"}"#;
        let request: CreateTransactionRequest = serde_json::from_str(json).unwrap();
        let tx = request.into_new_transaction(PrincipalId(1)).unwrap();
        assert_eq!(tx.amount, Money::from_cents(1250));
        assert_eq!(tx.category_id, None);
    }

    #[test]
    fn test_update_request_partial() {
        let request = UpdateTransactionRequest {
            description: Some("groceries".to_string()),
            ..UpdateTransactionRequest::default()
        };
        let changes = request.into_changes().unwrap();
        assert_eq!(changes.description.as_deref(), Some("groceries"));
        assert!(changes.amount.is_none());
        assert!(changes.transaction_type.is_none());
    }

    #[test]
    fn test_list_query_defaults() {
        let (filter, page) = TransactionListQuery::default().into_parts().unwrap();
        assert_eq!(filter, TransactionFilter::default());
        assert_eq!(page, PageRequest::new(0, 10));
    }

    #[test]
    fn test_list_query_bounds() {
        let query = TransactionListQuery {
            page: Some(0),
            ..TransactionListQuery::default()
        };
        assert!(query.into_parts().is_err());

        let query = TransactionListQuery {
            limit: Some(101),
            ..TransactionListQuery::default()
        };
        assert!(query.into_parts().is_err());

        let query = TransactionListQuery {
            page: Some(3),
            limit: Some(25),
            transaction_type: Some("income".to_string()),
            category_id: None,
        };
        let (filter, page) = query.into_parts().unwrap();
        assert_eq!(filter.transaction_type, Some(TransactionType::Income));
        assert_eq!(page.offset(), 50);
    }
}
