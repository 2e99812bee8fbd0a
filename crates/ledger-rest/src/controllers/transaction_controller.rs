//! Transaction controller.

use crate::{
    extractors::{AuthenticatedPrincipal, LedgerJson},
    responses::{created, ok, ApiResult, AppError},
    state::AppState,
};
use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    routing::{get, put},
    Json, Router,
};
use ledger_core::{LedgerError, Transaction, TransactionId};
use ledger_service::{
    CreateTransactionRequest, MessageResponse, TransactionListQuery, TransactionListResponse,
    UpdateTransactionRequest,
};
use tracing::debug;

/// Creates the transaction router.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(list_transactions).post(create_transaction))
        .route("/:id", put(update_transaction).delete(delete_transaction))
}

/// List transactions visible to the caller.
#[utoipa::path(
    get,
    path = "/transactions",
    tag = "transactions",
    params(TransactionListQuery),
    responses(
        (status = 200, description = "One page of transactions, newest first", body = TransactionListResponse),
        (status = 400, description = "Invalid query", body = ledger_core::ErrorResponse),
        (status = 401, description = "Missing or invalid token", body = ledger_core::ErrorResponse)
    ),
    security(("bearer_auth" = []))
)]
pub async fn list_transactions(
    State(state): State<AppState>,
    principal: AuthenticatedPrincipal,
    Query(query): Query<TransactionListQuery>,
) -> ApiResult<TransactionListResponse> {
    debug!(principal = %principal.id, "List transactions request");

    let response = state.transaction_service.list(&principal, query).await?;
    ok(response)
}

/// Record a transaction owned by the caller.
#[utoipa::path(
    post,
    path = "/transactions",
    tag = "transactions",
    request_body = CreateTransactionRequest,
    responses(
        (status = 201, description = "Transaction created", body = Transaction),
        (status = 400, description = "Invalid request", body = ledger_core::ErrorResponse),
        (status = 403, description = "Role may not write", body = ledger_core::ErrorResponse)
    ),
    security(("bearer_auth" = []))
)]
pub async fn create_transaction(
    State(state): State<AppState>,
    principal: AuthenticatedPrincipal,
    LedgerJson(request): LedgerJson<CreateTransactionRequest>,
) -> Result<(StatusCode, Json<Transaction>), AppError> {
    debug!(principal = %principal.id, "Create transaction request");

    let tx = state.transaction_service.create(&principal, request).await?;
    Ok(created(tx))
}

/// Update a transaction.
#[utoipa::path(
    put,
    path = "/transactions/{id}",
    tag = "transactions",
    params(("id" = i64, Path, description = "Transaction ID")),
    request_body = UpdateTransactionRequest,
    responses(
        (status = 200, description = "Transaction updated", body = Transaction),
        (status = 403, description = "Not the owner", body = ledger_core::ErrorResponse),
        (status = 404, description = "Transaction not found", body = ledger_core::ErrorResponse)
    ),
    security(("bearer_auth" = []))
)]
pub async fn update_transaction(
    State(state): State<AppState>,
    principal: AuthenticatedPrincipal,
    Path(id): Path<String>,
    LedgerJson(request): LedgerJson<UpdateTransactionRequest>,
) -> ApiResult<Transaction> {
    debug!(principal = %principal.id, id = %id, "Update transaction request");

    let id = parse_transaction_id(&id)?;
    let tx = state.transaction_service.update(&principal, id, request).await?;
    ok(tx)
}

/// Delete a transaction.
#[utoipa::path(
    delete,
    path = "/transactions/{id}",
    tag = "transactions",
    params(("id" = i64, Path, description = "Transaction ID")),
    responses(
        (status = 200, description = "Transaction deleted", body = MessageResponse),
        (status = 403, description = "Not the owner", body = ledger_core::ErrorResponse),
        (status = 404, description = "Transaction not found", body = ledger_core::ErrorResponse)
    ),
    security(("bearer_auth" = []))
)]
pub async fn delete_transaction(
    State(state): State<AppState>,
    principal: AuthenticatedPrincipal,
    Path(id): Path<String>,
) -> ApiResult<MessageResponse> {
    debug!(principal = %principal.id, id = %id, "Delete transaction request");

    let id = parse_transaction_id(&id)?;
    state.transaction_service.delete(&principal, id).await?;
    ok(MessageResponse::new("Transaction deleted"))
}

fn parse_transaction_id(raw: &str) -> Result<TransactionId, AppError> {
    raw.parse::<TransactionId>()
        .map_err(|_| AppError(LedgerError::validation(format!("Invalid transaction id '{}'", raw))))
}
