//! OpenAPI documentation for the REST API.

use crate::controllers::{CacheStatus, HealthResponse, ReadinessResponse};
use ledger_core::{
    CategoryId, CategoryTotal, ErrorResponse, IncomeExpensePoint, MonthlyTotal, PrincipalId,
    Transaction, TransactionId, TransactionType,
};
use ledger_service::{
    CreateTransactionRequest, MessageResponse, TransactionListResponse, UpdateTransactionRequest,
};
use utoipa::openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme};
use utoipa::{Modify, OpenApi};

/// OpenAPI documentation for the Ledgerlens API.
#[derive(OpenApi)]
#[openapi(
    info(
        title = "Ledgerlens API",
        version = "1.0.0",
        description = "Cached financial analytics over a transaction ledger"
    ),
    servers(
        (url = "/api", description = "Ledgerlens API")
    ),
    paths(
        // Analytics endpoints
        crate::controllers::analytics_controller::monthly,
        crate::controllers::analytics_controller::category,
        crate::controllers::analytics_controller::income_expense,
        // Transaction endpoints
        crate::controllers::transaction_controller::list_transactions,
        crate::controllers::transaction_controller::create_transaction,
        crate::controllers::transaction_controller::update_transaction,
        crate::controllers::transaction_controller::delete_transaction,
        // Health endpoints
        crate::controllers::health_controller::health_check,
        crate::controllers::health_controller::readiness_check,
        crate::controllers::health_controller::liveness_check,
    ),
    components(
        schemas(
            PrincipalId,
            TransactionId,
            CategoryId,
            TransactionType,
            Transaction,
            ErrorResponse,
            MonthlyTotal,
            CategoryTotal,
            IncomeExpensePoint,
            CreateTransactionRequest,
            UpdateTransactionRequest,
            TransactionListResponse,
            MessageResponse,
            HealthResponse,
            ReadinessResponse,
            CacheStatus,
        )
    ),
    modifiers(&SecurityAddon),
    tags(
        (name = "analytics", description = "Cached ledger analytics"),
        (name = "transactions", description = "Transaction management"),
        (name = "health", description = "Health check endpoints")
    )
)]
pub struct ApiDoc;

/// Security addon for JWT Bearer authentication.
struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "bearer_auth",
                SecurityScheme::Http(
                    HttpBuilder::new()
                        .scheme(HttpAuthScheme::Bearer)
                        .bearer_format("JWT")
                        .description(Some("JWT Bearer token authentication"))
                        .build(),
                ),
            );
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_openapi_lists_analytics_paths() {
        let doc = ApiDoc::openapi();
        for path in [
            "/analytics/monthly",
            "/analytics/category",
            "/analytics/income-expense",
            "/transactions",
            "/transactions/{id}",
        ] {
            assert!(doc.paths.paths.contains_key(path), "missing {}", path);
        }
    }
}
