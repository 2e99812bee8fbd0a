//! Transaction service trait definition.

use crate::dto::{
    CreateTransactionRequest, TransactionListQuery, TransactionListResponse,
    UpdateTransactionRequest,
};
use async_trait::async_trait;
use ledger_core::{LedgerResult, Principal, Transaction, TransactionId};

/// Transaction CRUD on behalf of a principal.
#[async_trait]
pub trait TransactionService: Send + Sync {
    /// Records a transaction owned by `principal`.
    async fn create(
        &self,
        principal: &Principal,
        request: CreateTransactionRequest,
    ) -> LedgerResult<Transaction>;

    /// Lists transactions visible to `principal`, newest first.
    async fn list(
        &self,
        principal: &Principal,
        query: TransactionListQuery,
    ) -> LedgerResult<TransactionListResponse>;

    /// Applies a partial update. Only the owner or an admin may update.
    async fn update(
        &self,
        principal: &Principal,
        id: TransactionId,
        request: UpdateTransactionRequest,
    ) -> LedgerResult<Transaction>;

    /// Deletes a transaction. Only the owner or an admin may delete.
    async fn delete(&self, principal: &Principal, id: TransactionId) -> LedgerResult<()>;
}
