//! Transaction service implementation.

use crate::dto::{
    CreateTransactionRequest, TransactionListQuery, TransactionListResponse,
    UpdateTransactionRequest,
};
use crate::transaction_service::TransactionService;
use async_trait::async_trait;
use ledger_core::{LedgerError, LedgerResult, Permission, Principal, Transaction, TransactionId};
use ledger_repository::TransactionRepository;
use ledger_security::PrincipalExt;
use std::sync::Arc;
use tracing::{debug, info};

/// Transaction service backed by a [`TransactionRepository`].
///
/// Writes do not touch the analytics cache; cached aggregates age out on
/// their TTL.
pub struct TransactionServiceImpl {
    repository: Arc<dyn TransactionRepository>,
}

impl TransactionServiceImpl {
    /// Creates a new transaction service.
    pub fn new(repository: Arc<dyn TransactionRepository>) -> Self {
        Self { repository }
    }

    async fn find_owned(&self, principal: &Principal, id: TransactionId) -> LedgerResult<Transaction> {
        let tx = self
            .repository
            .find_by_id(id)
            .await?
            .ok_or_else(|| LedgerError::not_found("Transaction", id))?;
        principal.require_owner_or_admin(tx.user_id)?;
        Ok(tx)
    }
}

#[async_trait]
impl TransactionService for TransactionServiceImpl {
    async fn create(
        &self,
        principal: &Principal,
        request: CreateTransactionRequest,
    ) -> LedgerResult<Transaction> {
        principal.require_permission(Permission::TransactionWrite)?;

        let new_tx = request.into_new_transaction(principal.id)?;
        let saved = self.repository.insert(new_tx).await?;

        info!(id = %saved.id, user_id = %saved.user_id, "Transaction created");
        Ok(saved)
    }

    async fn list(
        &self,
        principal: &Principal,
        query: TransactionListQuery,
    ) -> LedgerResult<TransactionListResponse> {
        principal.require_permission(Permission::TransactionRead)?;

        let (filter, page) = query.into_parts()?;
        let owner = (!principal.role.sees_whole_ledger()).then_some(principal.id);
        debug!(?owner, page = page.page, size = page.size, "Listing transactions");

        let page = self.repository.find_page(owner, filter, page).await?;
        Ok(TransactionListResponse::from(page))
    }

    async fn update(
        &self,
        principal: &Principal,
        id: TransactionId,
        request: UpdateTransactionRequest,
    ) -> LedgerResult<Transaction> {
        principal.require_permission(Permission::TransactionWrite)?;

        let changes = request.into_changes()?;
        let mut tx = self.find_owned(principal, id).await?;
        changes.apply_to(&mut tx);

        let updated = self.repository.update(&tx).await?;
        info!(id = %id, "Transaction updated");
        Ok(updated)
    }

    async fn delete(&self, principal: &Principal, id: TransactionId) -> LedgerResult<()> {
        principal.require_permission(Permission::TransactionWrite)?;

        self.find_owned(principal, id).await?;
        if !self.repository.delete(id).await? {
            return Err(LedgerError::not_found("Transaction", id));
        }

        info!(id = %id, "Transaction deleted");
        Ok(())
    }
}
