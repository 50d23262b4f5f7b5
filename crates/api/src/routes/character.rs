use axum::routing::get;
use axum::Router;

use crate::handlers::character;
use crate::state::AppState;

/// Public routes mounted at `/characters`.
///
/// ```text
/// GET    /                 -> list
/// GET    /{id}             -> get_by_id
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(character::list))
        .route("/{id}", get(character::get_by_id))
}

/// Admin routes mounted at `/admin/characters`.
///
/// ```text
/// GET    /                 -> list
/// POST   /                 -> create
/// GET    /{id}             -> get_by_id
/// PUT    /{id}             -> update
/// DELETE /{id}             -> delete
/// ```
pub fn admin_router() -> Router<AppState> {
    Router::new()
        .route("/", get(character::list).post(character::create))
        .route(
            "/{id}",
            get(character::get_by_id)
                .put(character::update)
                .delete(character::delete),
        )
}
