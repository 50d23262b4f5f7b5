use axum::routing::get;
use axum::Router;

use crate::handlers::progress;
use crate::state::AppState;

/// Routes mounted at `/progress`.
///
/// ```text
/// GET    /{user_id}/{character_id}   -> get
/// POST   /{user_id}/{character_id}   -> start
/// PUT    /{user_id}/{character_id}   -> update
/// ```
pub fn router() -> Router<AppState> {
    Router::new().route(
        "/{user_id}/{character_id}",
        get(progress::get).post(progress::start).put(progress::update),
    )
}
