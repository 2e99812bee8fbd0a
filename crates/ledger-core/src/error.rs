//! Unified error types for all layers of the application.

use serde::{Deserialize, Serialize};
use std::fmt::Debug;
use thiserror::Error;

/// Unified error type for all layers of Ledgerlens.
///
/// Cache faults are deliberately absent: the cache is an optimization and its
/// failures are recovered inside the service layer, never surfaced here.
#[derive(Error, Debug)]
pub enum LedgerError {
    // ============ Domain Errors ============
    /// Resource not found
    #[error("Resource not found: {resource_type} with id {id}")]
    NotFound {
        resource_type: &'static str,
        id: String,
    },

    /// Validation error
    #[error("Validation error: {0}")]
    Validation(String),

    // ============ Authentication/Authorization Errors ============
    /// Unauthorized access
    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    /// Forbidden access
    #[error("Forbidden: {0}")]
    Forbidden(String),

    /// Invalid token
    #[error("Invalid token: {0}")]
    InvalidToken(String),

    /// Token expired
    #[error("Token expired")]
    TokenExpired,

    /// The request did not complete within the server's timeout
    #[error("Request timed out")]
    Timeout,

    // ============ Infrastructure Errors ============
    /// Database error
    #[error("Database error: {0}")]
    Database(String),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// An analytics aggregation query failed. Never retried.
    #[error("Server error while fetching {label}")]
    Aggregation {
        label: &'static str,
        detail: String,
    },

    // ============ Internal Errors ============
    /// Internal error
    #[error("Internal error: {0}")]
    Internal(String),

    /// Generic error wrapper
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl LedgerError {
    /// Returns the HTTP status code for this error.
    #[must_use]
    pub const fn status_code(&self) -> u16 {
        match self {
            Self::NotFound { .. } => 404,
            Self::Validation(_) => 400,
            Self::Unauthorized(_) | Self::InvalidToken(_) | Self::TokenExpired => 401,
            Self::Forbidden(_) => 403,
            Self::Timeout => 408,
            Self::Database(_)
            | Self::Configuration(_)
            | Self::Aggregation { .. }
            | Self::Internal(_)
            | Self::Other(_) => 500,
        }
    }

    /// Returns a machine-readable error code.
    #[must_use]
    pub const fn error_code(&self) -> &'static str {
        match self {
            Self::NotFound { .. } => "NOT_FOUND",
            Self::Validation(_) => "VALIDATION_ERROR",
            Self::Unauthorized(_) => "UNAUTHORIZED",
            Self::Forbidden(_) => "FORBIDDEN",
            Self::InvalidToken(_) => "INVALID_TOKEN",
            Self::TokenExpired => "TOKEN_EXPIRED",
            Self::Timeout => "REQUEST_TIMEOUT",
            Self::Database(_) => "DATABASE_ERROR",
            Self::Configuration(_) => "CONFIGURATION_ERROR",
            Self::Aggregation { .. } => "AGGREGATION_ERROR",
            Self::Internal(_) | Self::Other(_) => "INTERNAL_ERROR",
        }
    }

    /// Returns true for server-side faults (5xx).
    #[must_use]
    pub const fn is_server_fault(&self) -> bool {
        self.status_code() >= 500
    }

    /// Message safe to show to API callers.
    ///
    /// Client errors carry their bare message. Server faults other than
    /// aggregation failures collapse into a generic message; the detail only
    /// goes to the log.
    #[must_use]
    pub fn public_message(&self) -> String {
        match self {
            Self::NotFound { resource_type, .. } => format!("{} not found", resource_type),
            Self::Validation(msg)
            | Self::Unauthorized(msg)
            | Self::Forbidden(msg)
            | Self::InvalidToken(msg) => msg.clone(),
            Self::TokenExpired | Self::Timeout | Self::Aggregation { .. } => self.to_string(),
            Self::Database(_) | Self::Configuration(_) | Self::Internal(_) | Self::Other(_) => {
                "Server error".to_string()
            }
        }
    }

    /// Creates a not found error for a resource.
    #[must_use]
    pub fn not_found<T: ToString>(resource_type: &'static str, id: T) -> Self {
        Self::NotFound {
            resource_type,
            id: id.to_string(),
        }
    }

    /// Creates a validation error.
    #[must_use]
    pub fn validation<T: Into<String>>(message: T) -> Self {
        Self::Validation(message.into())
    }

    /// Creates an unauthorized error.
    #[must_use]
    pub fn unauthorized<T: Into<String>>(message: T) -> Self {
        Self::Unauthorized(message.into())
    }

    /// Creates a forbidden error.
    #[must_use]
    pub fn forbidden<T: Into<String>>(message: T) -> Self {
        Self::Forbidden(message.into())
    }

    /// Creates an internal error.
    #[must_use]
    pub fn internal<T: Into<String>>(message: T) -> Self {
        Self::Internal(message.into())
    }

    /// Wraps a failed aggregation for the given analytics label.
    #[must_use]
    pub fn aggregation(label: &'static str, cause: &Self) -> Self {
        Self::Aggregation {
            label,
            detail: cause.to_string(),
        }
    }
}

#[cfg(feature = "sqlx")]
impl From<sqlx::Error> for LedgerError {
    fn from(err: sqlx::Error) -> Self {
        match &err {
            sqlx::Error::RowNotFound => Self::NotFound {
                resource_type: "database_row",
                id: "unknown".to_string(),
            },
            sqlx::Error::Database(db) if db.is_foreign_key_violation() => {
                Self::Validation("Referenced record does not exist".to_string())
            }
            _ => Self::Database(err.to_string()),
        }
    }
}

impl From<serde_json::Error> for LedgerError {
    fn from(err: serde_json::Error) -> Self {
        Self::Internal(format!("JSON serialization error: {}", err))
    }
}

/// Error body returned by the HTTP layer: `{"message": "..."}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct ErrorResponse {
    /// Human-readable error message
    pub message: String,
}

impl ErrorResponse {
    /// Creates a new error response from a `LedgerError`.
    #[must_use]
    pub fn from_error(error: &LedgerError) -> Self {
        Self {
            message: error.public_message(),
        }
    }
}

impl From<&LedgerError> for ErrorResponse {
    fn from(error: &LedgerError) -> Self {
        Self::from_error(error)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_status_codes() {
        assert_eq!(LedgerError::not_found("Transaction", 1).status_code(), 404);
        assert_eq!(LedgerError::validation("bad amount").status_code(), 400);
        assert_eq!(LedgerError::unauthorized("no token").status_code(), 401);
        assert_eq!(LedgerError::TokenExpired.status_code(), 401);
        assert_eq!(LedgerError::forbidden("read-only").status_code(), 403);
        assert_eq!(LedgerError::Database("down".to_string()).status_code(), 500);
        assert_eq!(LedgerError::Timeout.status_code(), 408);
        assert_eq!(LedgerError::Timeout.public_message(), "Request timed out");
    }

    #[test]
    fn test_aggregation_error_is_server_fault() {
        let cause = LedgerError::Database("connection refused".to_string());
        let err = LedgerError::aggregation("monthly analytics", &cause);
        assert_eq!(err.status_code(), 500);
        assert!(err.is_server_fault());
        assert_eq!(err.error_code(), "AGGREGATION_ERROR");
        assert_eq!(err.to_string(), "Server error while fetching monthly analytics");
    }

    #[test]
    fn test_public_message_hides_database_detail() {
        let err = LedgerError::Database("password authentication failed for user".to_string());
        let response = ErrorResponse::from_error(&err);
        assert_eq!(response.message, "Server error");
    }

    #[test]
    fn test_public_message_keeps_client_errors() {
        let err = LedgerError::forbidden("read-only principals cannot write");
        let response = ErrorResponse::from(&err);
        assert!(response.message.contains("read-only principals cannot write"));
    }

    #[test]
    fn test_public_message_for_missing_resource() {
        let err = LedgerError::not_found("Transaction", 42);
        assert_eq!(err.public_message(), "Transaction not found");
        let err = LedgerError::validation("type must be income or expense");
        assert_eq!(err.public_message(), "type must be income or expense");
    }

    #[test]
    fn test_error_response_serializes_message_only() {
        let err = LedgerError::aggregation("category breakdown", &LedgerError::internal("x"));
        let json = serde_json::to_value(ErrorResponse::from_error(&err)).unwrap();
        assert_eq!(
            json,
            serde_json::json!({ "message": "Server error while fetching category breakdown" })
        );
    }
}
