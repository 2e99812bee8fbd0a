//! JSON body extractor with `{"message"}` rejections.

use crate::responses::AppError;
use axum::{
    async_trait,
    extract::{rejection::JsonRejection, FromRequest, Request},
    Json,
};
use ledger_core::LedgerError;
use serde::de::DeserializeOwned;

/// Like [`axum::Json`], but a malformed body is a 400 validation error.
#[derive(Debug, Clone, Copy, Default)]
pub struct LedgerJson<T>(pub T);

#[async_trait]
impl<T, S> FromRequest<S> for LedgerJson<T>
where
    T: DeserializeOwned,
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let Json(value) = Json::<T>::from_request(req, state)
            .await
            .map_err(|rejection: JsonRejection| {
                AppError(LedgerError::validation(format!("Invalid JSON: {}", rejection.body_text())))
            })?;
        Ok(Self(value))
    }
}
