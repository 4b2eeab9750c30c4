//! Extractors whose rejections use the JSON error body instead of axum's plain text.

use axum::{
    extract::{FromRequest, FromRequestParts, Path, Request},
    http::request::Parts,
    Json,
};
use serde::de::DeserializeOwned;
use service_core::error::AppError;
use validator::Validate;

/// JSON body that is deserialized and validated in one step.
///
/// Malformed bodies answer 400, failed validation 422.
pub struct ValidatedJson<T>(pub T);

#[axum::async_trait]
impl<T, S> FromRequest<S> for ValidatedJson<T>
where
    T: DeserializeOwned + Validate + 'static,
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let Json(value) = Json::<T>::from_request(req, state).await.map_err(|e| {
            AppError::BadRequest(anyhow::anyhow!("Json parse error: {}", e.body_text()))
        })?;

        value.validate()?;

        Ok(ValidatedJson(value))
    }
}

/// Numeric file id from the `:id` path segment.
///
/// Non-numeric ids answer 404 like unknown ones.
pub struct FileId(pub i64);

#[axum::async_trait]
impl<S> FromRequestParts<S> for FileId
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let Path(id) = Path::<i64>::from_request_parts(parts, state)
            .await
            .map_err(|e| {
                tracing::debug!(error = %e.body_text(), "Rejected file id");
                AppError::NotFound(anyhow::anyhow!("File not found"))
            })?;
        Ok(FileId(id))
    }
}
