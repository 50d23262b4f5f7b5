use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde_json::json;
use tutor_core::error::CoreError;
use tutor_db::StoreError;
use tutor_llm::GatewayError;

/// Application-level error type for HTTP handlers.
///
/// Wraps [`CoreError`] for domain errors, [`StoreError`] for storage
/// failures, and [`GatewayError`] for LLM Gateway failures. Implements
/// [`IntoResponse`] to produce consistent JSON error responses.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    /// A domain-level error from `tutor_core`.
    #[error(transparent)]
    Core(#[from] CoreError),

    /// A storage error from `tutor_db`.
    #[error(transparent)]
    Store(#[from] StoreError),

    /// An LLM Gateway error from `tutor_llm`.
    #[error(transparent)]
    Gateway(#[from] GatewayError),
}

/// Convenience type alias for handler return values.
pub type AppResult<T> = Result<T, AppError>;

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, code, message) = match &self {
            // --- CoreError variants ---
            AppError::Core(core) => classify_core_error(core),

            // --- Storage errors ---
            AppError::Store(store) => match store {
                StoreError::Sqlx(err) => classify_sqlx_error(err),
                StoreError::Duplicate { .. } | StoreError::Conflict(_) => {
                    (StatusCode::CONFLICT, "CONFLICT", store.to_string())
                }
                StoreError::NotFound { entity, id } => (
                    StatusCode::NOT_FOUND,
                    "NOT_FOUND",
                    format!("{entity} with id {id} not found"),
                ),
            },

            // --- Gateway errors ---
            AppError::Gateway(GatewayError::Timeout) => (
                StatusCode::GATEWAY_TIMEOUT,
                "GATEWAY_TIMEOUT",
                "The language gateway did not respond in time".to_string(),
            ),
            AppError::Gateway(err) => {
                tracing::warn!(error = %err, "Gateway failure");
                (
                    StatusCode::BAD_GATEWAY,
                    "GATEWAY_ERROR",
                    "The language gateway returned an unusable reply".to_string(),
                )
            }
        };

        let body = json!({
            "error": message,
            "code": code,
        });

        (status, axum::Json(body)).into_response()
    }
}

fn classify_core_error(core: &CoreError) -> (StatusCode, &'static str, String) {
    match core {
        CoreError::NotFound { entity, id } => (
            StatusCode::NOT_FOUND,
            "NOT_FOUND",
            format!("{entity} with id {id} not found"),
        ),
        CoreError::Validation(msg) => (
            StatusCode::UNPROCESSABLE_ENTITY,
            "VALIDATION_ERROR",
            msg.clone(),
        ),
        CoreError::InvalidPosition { .. } => (
            StatusCode::UNPROCESSABLE_ENTITY,
            "INVALID_POSITION",
            core.to_string(),
        ),
        CoreError::InvalidReorder(msg) => (
            StatusCode::UNPROCESSABLE_ENTITY,
            "INVALID_REORDER",
            msg.clone(),
        ),
        CoreError::Conflict(msg) => (StatusCode::CONFLICT, "CONFLICT", msg.clone()),
        CoreError::Unauthorized(msg) => (StatusCode::UNAUTHORIZED, "UNAUTHORIZED", msg.clone()),
        CoreError::GatewayTimeout(_) => (
            StatusCode::GATEWAY_TIMEOUT,
            "GATEWAY_TIMEOUT",
            core.to_string(),
        ),
        CoreError::Gateway(msg) => {
            tracing::warn!(error = %msg, "Gateway failure");
            (
                StatusCode::BAD_GATEWAY,
                "GATEWAY_ERROR",
                "The language gateway returned an unusable reply".to_string(),
            )
        }
        CoreError::Internal(msg) => {
            tracing::error!(error = %msg, "Internal core error");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                "INTERNAL_ERROR",
                "An internal error occurred".to_string(),
            )
        }
    }
}

/// Classify a sqlx error into an HTTP status, error code, and message.
///
/// - `RowNotFound` maps to 404.
/// - Unique constraint violations (constraint name starting with `uq_`) map to 409.
/// - Everything else maps to 500 with a sanitized message.
fn classify_sqlx_error(err: &sqlx::Error) -> (StatusCode, &'static str, String) {
    match err {
        sqlx::Error::RowNotFound => (
            StatusCode::NOT_FOUND,
            "NOT_FOUND",
            "Resource not found".to_string(),
        ),
        sqlx::Error::Database(db_err) => {
            // PostgreSQL unique constraint violation: error code 23505
            if db_err.code().as_deref() == Some("23505") {
                let constraint = db_err.constraint().unwrap_or("unknown");
                if constraint.starts_with("uq_") {
                    return (
                        StatusCode::CONFLICT,
                        "CONFLICT",
                        format!("Duplicate value violates unique constraint: {constraint}"),
                    );
                }
            }
            tracing::error!(error = %db_err, "Database error");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                "INTERNAL_ERROR",
                "An internal error occurred".to_string(),
            )
        }
        other => {
            tracing::error!(error = %other, "Database error");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                "INTERNAL_ERROR",
                "An internal error occurred".to_string(),
            )
        }
    }
}
