//! Authentication middleware.

use crate::responses::AppError;
use axum::{
    body::Body,
    extract::State,
    http::{header::AUTHORIZATION, Request},
    middleware::Next,
    response::Response,
};
use ledger_security::TokenVerifier;
use std::sync::Arc;
use tracing::debug;

/// Rejects requests without a valid bearer token.
///
/// On success the authenticated [`ledger_core::Principal`] is stored in the
/// request extensions for [`crate::extractors::AuthenticatedPrincipal`].
pub async fn auth_middleware(
    State(verifier): State<Arc<TokenVerifier>>,
    mut request: Request<Body>,
    next: Next,
) -> Result<Response, AppError> {
    let header = request
        .headers()
        .get(AUTHORIZATION)
        .and_then(|h| h.to_str().ok());

    let principal = verifier.authenticate_header(header)?;
    debug!(principal = %principal.id, role = %principal.role, "Authenticated request");
    request.extensions_mut().insert(principal);

    Ok(next.run(request).await)
}
