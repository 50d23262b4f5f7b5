use axum::routing::post;
use axum::Router;

use crate::handlers::chat;
use crate::state::AppState;

/// Routes mounted at `/chat`.
///
/// ```text
/// POST   /{character_id}   -> send
/// ```
pub fn router() -> Router<AppState> {
    Router::new().route("/{character_id}", post(chat::send))
}
