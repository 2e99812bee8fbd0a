//! Main application router.

use crate::{
    controllers::{analytics_controller, health_controller, transaction_controller},
    middleware::{auth_middleware, logging_middleware, timeout_response},
    openapi::ApiDoc,
    state::AppState,
};
use axum::{
    http::{HeaderValue, StatusCode},
    middleware,
    routing::get,
    Router,
};
use ledger_config::{ObservabilityConfig, ServerConfig};
use std::sync::Arc;
use tower_http::{
    compression::CompressionLayer,
    cors::{AllowOrigin, CorsLayer},
    timeout::TimeoutLayer,
    trace::TraceLayer,
};
use tracing::info;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

/// Creates the main application router.
///
/// Everything under `/api` requires a bearer token. Health probes, the
/// banner, Swagger UI and the metrics endpoint are public.
pub fn create_router(
    state: AppState,
    server_config: &ServerConfig,
    observability: &ObservabilityConfig,
) -> Router {
    let cors = create_cors_layer(server_config);

    let api_router = Router::new()
        .nest("/analytics", analytics_controller::router())
        .nest("/transactions", transaction_controller::router())
        .layer(middleware::from_fn_with_state(
            Arc::clone(&state.token_verifier),
            auth_middleware,
        ));

    let mut router = Router::new()
        // Health endpoints (no auth required)
        .merge(health_controller::router())
        .nest("/api", api_router)
        .route("/", get(root));

    if let Some(handle) = state.metrics.clone() {
        router = router.route(
            &observability.metrics_path,
            get(move || std::future::ready(handle.render())),
        );
        info!("Prometheus metrics exposed at {}", observability.metrics_path);
    }

    let router = router
        .with_state(state)
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
        .layer(TimeoutLayer::with_status_code(
            StatusCode::REQUEST_TIMEOUT,
            server_config.request_timeout(),
        ))
        .layer(middleware::map_response(timeout_response))
        .layer(CompressionLayer::new())
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .layer(middleware::from_fn(logging_middleware));

    info!("Router created with REST endpoints and Swagger UI at /swagger-ui");
    router
}

/// Creates a CORS layer based on server configuration.
fn create_cors_layer(server_config: &ServerConfig) -> CorsLayer {
    if !server_config.cors_enabled {
        return CorsLayer::new();
    }
    if server_config.cors_origins.iter().any(|o| o == "*") {
        return CorsLayer::permissive();
    }

    let origins: Vec<HeaderValue> = server_config
        .cors_origins
        .iter()
        .filter_map(|origin| origin.parse().ok())
        .collect();
    CorsLayer::new()
        .allow_origin(AllowOrigin::list(origins))
        .allow_methods(tower_http::cors::Any)
        .allow_headers(tower_http::cors::Any)
}

/// Root endpoint handler.
async fn root() -> String {
    format!("Ledgerlens API v{}", env!("CARGO_PKG_VERSION"))
}
