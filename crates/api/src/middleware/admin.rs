//! Shared-secret guard for the admin surface.

use axum::extract::FromRequestParts;
use axum::http::request::Parts;
use tutor_core::admin_key::{verify_admin_key, ADMIN_KEY_HEADER};
use tutor_core::error::CoreError;

use crate::error::AppError;
use crate::state::AppState;

/// Proof that the request carried the configured admin key in `X-Admin-Key`.
///
/// Mounted on the whole admin router with
/// `middleware::from_extractor_with_state`, so a request without the key
/// is rejected with 401 before any admin handler runs.
#[derive(Debug, Clone, Copy)]
pub struct RequireAdminKey;

impl FromRequestParts<AppState> for RequireAdminKey {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let provided = parts
            .headers
            .get(ADMIN_KEY_HEADER)
            .and_then(|v| v.to_str().ok())
            .ok_or_else(|| {
                AppError::Core(CoreError::Unauthorized("Missing X-Admin-Key header".into()))
            })?;

        if !verify_admin_key(provided, &state.config.admin_key) {
            tracing::warn!(path = %parts.uri.path(), "Rejected admin request with invalid key");
            return Err(AppError::Core(CoreError::Unauthorized(
                "Invalid admin key".into(),
            )));
        }
        Ok(RequireAdminKey)
    }
}
