//! End-to-end router tests over the in-memory ledger and cache.

use async_trait::async_trait;
use axum::{
    body::Body,
    http::{header, Method, Request, StatusCode},
    Router,
};
use chrono::NaiveDate;
use http_body_util::BodyExt;
use ledger_config::{ObservabilityConfig, SecurityConfig, ServerConfig};
use ledger_core::{
    CategoryTotal, IncomeExpensePoint, LedgerError, LedgerResult, Money, MonthlyTotal,
    NewTransaction, Principal, PrincipalId, QueryScope, Role, TransactionType,
};
use ledger_repository::{AggregationEngine, InMemoryLedger, TransactionRepository};
use ledger_rest::{create_router, AppState};
use ledger_security::TokenVerifier;
use ledger_service::{
    AnalyticsServiceImpl, AnalyticsTtl, InMemoryCacheGateway, TransactionServiceImpl,
};
use serde_json::{json, Value};
use std::sync::Arc;
use tower::ServiceExt;

struct TestApp {
    router: Router,
    verifier: Arc<TokenVerifier>,
}

impl TestApp {
    fn with_engine(ledger: Arc<InMemoryLedger>, engine: Arc<dyn AggregationEngine>) -> Self {
        Self::build(ledger, engine, &ServerConfig::default())
    }

    fn build(ledger: Arc<InMemoryLedger>, engine: Arc<dyn AggregationEngine>, server: &ServerConfig) -> Self {
        let verifier = Arc::new(TokenVerifier::new(Arc::new(SecurityConfig::default())));
        let cache = Arc::new(InMemoryCacheGateway::new());
        let state = AppState::new(
            Arc::new(AnalyticsServiceImpl::new(engine, cache.clone(), AnalyticsTtl::default())),
            Arc::new(TransactionServiceImpl::new(ledger.clone())),
            Arc::clone(&verifier),
            ledger,
            cache,
        );
        let router = create_router(state, server, &ObservabilityConfig::default());
        Self { router, verifier }
    }

    async fn seeded() -> Self {
        let ledger = Arc::new(InMemoryLedger::new());
        let rent = ledger.add_category("Rent").await;
        for (kind, major, category) in [
            (TransactionType::Income, 5000, None),
            (TransactionType::Expense, 1200, Some(rent)),
        ] {
            ledger
                .insert(NewTransaction {
                    user_id: PrincipalId(7),
                    amount: Money::from_major(major),
                    transaction_type: kind,
                    category_id: category,
                    description: None,
                    transaction_date: NaiveDate::from_ymd_opt(2024, 3, 10).unwrap(),
                })
                .await
                .unwrap();
        }
        Self::with_engine(ledger.clone(), ledger)
    }

    fn token(&self, id: i64, role: Role) -> String {
        self.verifier
            .issue_token(&Principal::new(PrincipalId(id), role))
            .unwrap()
    }

    async fn send(&self, method: Method, uri: &str, token: Option<&str>, body: Option<Value>) -> (StatusCode, Value) {
        let mut builder = Request::builder().method(method).uri(uri);
        if let Some(token) = token {
            builder = builder.header(header::AUTHORIZATION, format!("Bearer {}", token));
        }
        let request = match body {
            Some(body) => builder
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(body.to_string()))
                .unwrap(),
            None => builder.body(Body::empty()).unwrap(),
        };

        let response = self.router.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        let value = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
        (status, value)
    }

    async fn get(&self, uri: &str, token: Option<&str>) -> (StatusCode, Value) {
        self.send(Method::GET, uri, token, None).await
    }
}

struct BrokenEngine;

#[async_trait]
impl AggregationEngine for BrokenEngine {
    async fn monthly_totals(&self, _scope: &QueryScope) -> LedgerResult<Vec<MonthlyTotal>> {
        Err(LedgerError::Database("relation \"transactions\" does not exist".to_string()))
    }

    async fn category_totals(&self, _scope: &QueryScope) -> LedgerResult<Vec<CategoryTotal>> {
        Err(LedgerError::Database("statement timeout".to_string()))
    }

    async fn income_expense(&self, _scope: &QueryScope) -> LedgerResult<Vec<IncomeExpensePoint>> {
        Err(LedgerError::Database("connection reset".to_string()))
    }
}

/// Takes longer than any request timeout used here.
struct StalledEngine;

#[async_trait]
impl AggregationEngine for StalledEngine {
    async fn monthly_totals(&self, _scope: &QueryScope) -> LedgerResult<Vec<MonthlyTotal>> {
        tokio::time::sleep(std::time::Duration::from_secs(3600)).await;
        Ok(Vec::new())
    }

    async fn category_totals(&self, _scope: &QueryScope) -> LedgerResult<Vec<CategoryTotal>> {
        tokio::time::sleep(std::time::Duration::from_secs(3600)).await;
        Ok(Vec::new())
    }

    async fn income_expense(&self, _scope: &QueryScope) -> LedgerResult<Vec<IncomeExpensePoint>> {
        tokio::time::sleep(std::time::Duration::from_secs(3600)).await;
        Ok(Vec::new())
    }
}

#[tokio::test]
async fn test_health_endpoints_are_public() {
    let app = TestApp::seeded().await;

    let (status, body) = app.get("/health", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "healthy");

    let (status, body) = app.get("/ready", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["database"], true);
    assert_eq!(body["cache"], json!({ "backend": "memory", "ready": true }));

    let (status, _) = app.get("/live", None).await;
    assert_eq!(status, StatusCode::OK);
}

#[tokio::test]
async fn test_analytics_require_token() {
    let app = TestApp::seeded().await;

    let (status, body) = app.get("/api/analytics/monthly?year=2024", None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body, json!({ "message": "Missing authorization header" }));

    let (status, _) = app.get("/api/analytics/monthly?year=2024", Some("not-a-jwt")).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_rent_scenario_over_http() {
    let app = TestApp::seeded().await;
    let token = app.token(7, Role::User);

    let (status, body) = app.get("/api/analytics/monthly?year=2024", Some(&token)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        body,
        json!([{ "month": "2024-03", "totalIncome": 5000, "totalExpense": 1200 }])
    );

    let (status, body) = app.get("/api/analytics/category?year=2024", Some(&token)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!([{ "category": "Rent", "total": 1200 }]));

    let (status, body) = app.get("/api/analytics/income-expense?year=2024", Some(&token)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!([{ "month": "2024-03", "income": 5000, "expense": 1200 }]));
}

#[tokio::test]
async fn test_other_user_sees_nothing() {
    let app = TestApp::seeded().await;
    let token = app.token(8, Role::User);

    let (status, body) = app.get("/api/analytics/category?year=2024", Some(&token)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!([]));
}

#[tokio::test]
async fn test_invalid_year_falls_back_instead_of_failing() {
    let app = TestApp::seeded().await;
    let token = app.token(7, Role::User);

    let (status, body) = app.get("/api/analytics/monthly?year=abc", Some(&token)).await;
    assert_eq!(status, StatusCode::OK);
    assert!(body.is_array());
}

#[tokio::test]
async fn test_aggregation_failure_is_500_with_message() {
    let ledger = Arc::new(InMemoryLedger::new());
    let app = TestApp::with_engine(ledger, Arc::new(BrokenEngine));
    let token = app.token(7, Role::User);

    let cases = [
        ("/api/analytics/monthly", "Server error while fetching monthly analytics"),
        ("/api/analytics/category", "Server error while fetching category breakdown"),
        ("/api/analytics/income-expense", "Server error while fetching income vs expense"),
    ];
    for (uri, message) in cases {
        let (status, body) = app.get(uri, Some(&token)).await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body, json!({ "message": message }));
    }
}

#[tokio::test]
async fn test_transaction_lifecycle() {
    let app = TestApp::seeded().await;
    let owner = app.token(7, Role::User);
    let stranger = app.token(8, Role::User);

    let (status, created) = app
        .send(
            Method::POST,
            "/api/transactions",
            Some(&owner),
            Some(json!({ "amount": 42.5, "type": "expense", "transactionDate": "2024-06-01" })),
        )
        .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(created["amount"], json!(42.5));
    assert_eq!(created["userId"], json!(7));
    let uri = format!("/api/transactions/{}", created["id"]);

    let (status, list) = app.get("/api/transactions?limit=2", Some(&owner)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(list["total"], json!(3));
    assert_eq!(list["page"], json!(1));
    assert_eq!(list["transactions"][0]["transactionDate"], json!("2024-06-01"));

    let (status, body) = app
        .send(Method::PUT, &uri, Some(&stranger), Some(json!({ "description": "x" })))
        .await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    assert!(body["message"].is_string());

    let (status, updated) = app
        .send(Method::PUT, &uri, Some(&owner), Some(json!({ "description": "Lunch" })))
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(updated["description"], json!("Lunch"));

    let (status, body) = app.send(Method::DELETE, &uri, Some(&owner), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({ "message": "Transaction deleted" }));

    let (status, body) = app.send(Method::DELETE, &uri, Some(&owner), None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body, json!({ "message": "Transaction not found" }));
}

#[tokio::test]
async fn test_create_rejections() {
    let app = TestApp::seeded().await;

    let reader = app.token(9, Role::ReadOnly);
    let (status, _) = app
        .send(
            Method::POST,
            "/api/transactions",
            Some(&reader),
            Some(json!({ "amount": 1, "type": "income", "transactionDate": "2024-01-01" })),
        )
        .await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let user = app.token(7, Role::User);
    let (status, body) = app
        .send(Method::POST, "/api/transactions", Some(&user), Some(json!({ "amount": 1 })))
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body, json!({ "message": "amount, type, transactionDate required" }));

    let (status, body) = app
        .send(
            Method::POST,
            "/api/transactions",
            Some(&user),
            Some(json!({ "amount": 1, "type": "gift", "transactionDate": "2024-01-01" })),
        )
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body, json!({ "message": "type must be income or expense" }));
}

#[tokio::test]
async fn test_admin_lists_everything() {
    let app = TestApp::seeded().await;
    let admin = app.token(1, Role::Admin);

    let (status, list) = app.get("/api/transactions?type=income", Some(&admin)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(list["total"], json!(1));
    assert_eq!(list["transactions"][0]["type"], json!("income"));
}

#[tokio::test(start_paused = true)]
async fn test_timed_out_request_gets_message_body() {
    let server = ServerConfig {
        request_timeout_secs: 1,
        ..ServerConfig::default()
    };
    let app = TestApp::build(Arc::new(InMemoryLedger::new()), Arc::new(StalledEngine), &server);
    let token = app.token(7, Role::User);

    let (status, body) = app.get("/api/analytics/category?year=2024", Some(&token)).await;
    assert_eq!(status, StatusCode::REQUEST_TIMEOUT);
    assert_eq!(body, json!({ "message": "Request timed out" }));
}
