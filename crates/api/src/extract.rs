//! Extractors that report rejections with the JSON error envelope.
//!
//! Axum's own `Json` and `Path` rejections answer in plain text; these
//! wrappers turn them into `VALIDATION_ERROR` responses.

use axum::extract::rejection::{JsonRejection, PathRejection};
use axum::extract::{FromRequest, FromRequestParts, Path, Request};
use axum::http::request::Parts;
use axum::Json;
use tutor_core::error::CoreError;

use crate::error::AppError;

/// `Json<T>` whose rejection is a 422 `VALIDATION_ERROR`.
pub struct ValidJson<T>(pub T);

impl<S, T> FromRequest<S> for ValidJson<T>
where
    Json<T>: FromRequest<S, Rejection = JsonRejection>,
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        match Json::<T>::from_request(req, state).await {
            Ok(Json(value)) => Ok(ValidJson(value)),
            Err(rejection) => Err(AppError::Core(CoreError::Validation(rejection.body_text()))),
        }
    }
}

/// `Path<T>` whose rejection is a 422 `VALIDATION_ERROR`.
pub struct ValidPath<T>(pub T);

impl<S, T> FromRequestParts<S> for ValidPath<T>
where
    Path<T>: FromRequestParts<S, Rejection = PathRejection>,
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        match Path::<T>::from_request_parts(parts, state).await {
            Ok(Path(value)) => Ok(ValidPath(value)),
            Err(rejection) => Err(AppError::Core(CoreError::Validation(rejection.body_text()))),
        }
    }
}
