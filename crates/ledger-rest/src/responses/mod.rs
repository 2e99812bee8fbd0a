//! API response types.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use ledger_core::{ErrorResponse, LedgerError};
use serde::Serialize;
use tracing::error;

/// Application error type for Axum. Renders `{"message": ...}`.
#[derive(Debug)]
pub struct AppError(pub LedgerError);

impl From<LedgerError> for AppError {
    fn from(err: LedgerError) -> Self {
        Self(err)
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = StatusCode::from_u16(self.0.status_code())
            .unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);

        if self.0.is_server_fault() {
            error!(code = self.0.error_code(), error = %self.0, "Request failed");
        }

        (status, Json(ErrorResponse::from_error(&self.0))).into_response()
    }
}

/// Result type for Axum handlers.
pub type ApiResult<T> = Result<Json<T>, AppError>;

/// Helper to create a success response.
pub fn ok<T: Serialize>(data: T) -> ApiResult<T> {
    Ok(Json(data))
}

/// Helper to create a created (201) response.
pub fn created<T: Serialize>(data: T) -> (StatusCode, Json<T>) {
    (StatusCode::CREATED, Json(data))
}

#[cfg(test)]
mod tests {
    use super::*;
    use http_body_util::BodyExt;

    async fn render(err: LedgerError) -> (StatusCode, String) {
        let response = AppError(err).into_response();
        let status = response.status();
        let body = response.into_body().collect().await.unwrap().to_bytes();
        (status, String::from_utf8(body.to_vec()).unwrap())
    }

    #[tokio::test]
    async fn test_aggregation_error_body() {
        let source = LedgerError::Database("timeout".to_string());
        let (status, body) = render(LedgerError::aggregation("monthly analytics", &source)).await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body, r#"{"message":"Server error while fetching monthly analytics"}"#);
    }

    #[tokio::test]
    async fn test_database_detail_is_hidden() {
        let (status, body) = render(LedgerError::Database("password=hunter2".to_string())).await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body, r#"{"message":"Server error"}"#);
    }

    #[tokio::test]
    async fn test_client_errors_keep_status() {
        let (status, _) = render(LedgerError::forbidden("no")).await;
        assert_eq!(status, StatusCode::FORBIDDEN);
        let (status, _) = render(LedgerError::TokenExpired).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
    }
}
