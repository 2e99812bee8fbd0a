//! Analytics controller.

use crate::{extractors::AuthenticatedPrincipal, responses::ApiResult, state::AppState};
use axum::{
    extract::{Query, State},
    routing::get,
    Json, Router,
};
use ledger_core::{resolve_year, CategoryTotal, IncomeExpensePoint, MonthlyTotal};
use serde::Deserialize;
use tracing::debug;
use utoipa::IntoParams;

/// Year selector shared by every analytics endpoint.
///
/// Kept as a string so an unparseable year falls back to the current one
/// instead of failing extraction.
#[derive(Debug, Default, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct YearQuery {
    /// Calendar year in `1..=9999`. Missing, unparseable or out-of-range values
    /// (`0`, negatives, `10000`) serve the current UTC year.
    #[param(example = "2024")]
    pub year: Option<String>,
}

impl YearQuery {
    fn resolve(&self) -> i32 {
        resolve_year(self.year.as_deref())
    }
}

/// Creates the analytics router.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/monthly", get(monthly))
        .route("/category", get(category))
        .route("/income-expense", get(income_expense))
}

/// Income and expense totals per month.
#[utoipa::path(
    get,
    path = "/analytics/monthly",
    tag = "analytics",
    params(YearQuery),
    responses(
        (status = 200, description = "Monthly totals, month ascending", body = Vec<MonthlyTotal>),
        (status = 401, description = "Missing or invalid token", body = ledger_core::ErrorResponse),
        (status = 500, description = "Aggregation failed", body = ledger_core::ErrorResponse)
    ),
    security(("bearer_auth" = []))
)]
pub async fn monthly(
    State(state): State<AppState>,
    principal: AuthenticatedPrincipal,
    Query(query): Query<YearQuery>,
) -> ApiResult<Vec<MonthlyTotal>> {
    let year = query.resolve();
    debug!(principal = %principal.id, year, "Monthly analytics request");

    let result = state.analytics_service.monthly(&principal, year).await?;
    Ok(Json(result))
}

/// Expense totals per category.
#[utoipa::path(
    get,
    path = "/analytics/category",
    tag = "analytics",
    params(YearQuery),
    responses(
        (status = 200, description = "Category totals, largest first", body = Vec<CategoryTotal>),
        (status = 401, description = "Missing or invalid token", body = ledger_core::ErrorResponse),
        (status = 500, description = "Aggregation failed", body = ledger_core::ErrorResponse)
    ),
    security(("bearer_auth" = []))
)]
pub async fn category(
    State(state): State<AppState>,
    principal: AuthenticatedPrincipal,
    Query(query): Query<YearQuery>,
) -> ApiResult<Vec<CategoryTotal>> {
    let year = query.resolve();
    debug!(principal = %principal.id, year, "Category analytics request");

    let result = state.analytics_service.category(&principal, year).await?;
    Ok(Json(result))
}

/// Income vs expense series per month.
#[utoipa::path(
    get,
    path = "/analytics/income-expense",
    tag = "analytics",
    params(YearQuery),
    responses(
        (status = 200, description = "Income and expense per month", body = Vec<IncomeExpensePoint>),
        (status = 401, description = "Missing or invalid token", body = ledger_core::ErrorResponse),
        (status = 500, description = "Aggregation failed", body = ledger_core::ErrorResponse)
    ),
    security(("bearer_auth" = []))
)]
pub async fn income_expense(
    State(state): State<AppState>,
    principal: AuthenticatedPrincipal,
    Query(query): Query<YearQuery>,
) -> ApiResult<Vec<IncomeExpensePoint>> {
    let year = query.resolve();
    debug!(principal = %principal.id, year, "Income vs expense request");

    let result = state.analytics_service.income_expense(&principal, year).await?;
    Ok(Json(result))
}
