//! Gives timed-out requests the standard error body.

use crate::responses::AppError;
use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};
use ledger_core::LedgerError;

/// Replaces the empty `408` produced by the timeout layer with `{"message": ...}`.
pub async fn timeout_response(response: Response) -> Response {
    if response.status() == StatusCode::REQUEST_TIMEOUT {
        return AppError(LedgerError::Timeout).into_response();
    }
    response
}
