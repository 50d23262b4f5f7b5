use axum::routing::{delete, get, post, put};
use axum::Router;

use crate::handlers::lesson;
use crate::state::AppState;

/// Public routes mounted at `/lessons`.
///
/// ```text
/// GET    /{character_id}                                    -> list_by_character
/// POST   /{character_id}/{lesson_id}/steps/{index}/answer   -> check_answer
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/{character_id}", get(lesson::list_by_character))
        .route(
            "/{character_id}/{lesson_id}/steps/{index}/answer",
            post(lesson::check_answer),
        )
}

/// Admin routes mounted at `/admin/lessons`.
///
/// ```text
/// GET    /                                   -> list (optional ?character_id=)
/// POST   /                                   -> create (append)
/// GET    /{character_id}                     -> list_by_character
/// POST   /{character_id}/insert              -> insert
/// POST   /{character_id}/reorder             -> reorder
/// DELETE /{character_id}/positions/{position} -> delete_at_position
/// PUT    /{character_id}/{lesson_id}         -> update
/// DELETE /{character_id}/{lesson_id}         -> delete
/// ```
pub fn admin_router() -> Router<AppState> {
    Router::new()
        .route("/", get(lesson::list).post(lesson::create))
        .route("/{character_id}", get(lesson::list_by_character))
        .route("/{character_id}/insert", post(lesson::insert))
        .route("/{character_id}/reorder", post(lesson::reorder))
        .route(
            "/{character_id}/positions/{position}",
            delete(lesson::delete_at_position),
        )
        .route(
            "/{character_id}/{lesson_id}",
            put(lesson::update).delete(lesson::delete),
        )
}
