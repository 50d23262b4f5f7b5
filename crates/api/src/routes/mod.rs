pub mod character;
pub mod chat;
pub mod health;
pub mod lesson;
pub mod progress;

use axum::routing::get;
use axum::{middleware, Router};

use crate::handlers;
use crate::middleware::admin::RequireAdminKey;
use crate::state::AppState;

/// Build the public route tree.
///
/// ```text
/// /characters                                       list
/// /characters/{id}                                  get
///
/// /lessons/{character_id}                           ordered lesson list
/// /lessons/{character_id}/{lesson_id}/steps/{index}/answer
///                                                   answer check (POST)
///
/// /chat/{character_id}                              chat (POST)
///
/// /progress/{user_id}/{character_id}                get, start (POST), update (PUT)
/// ```
pub fn public_routes() -> Router<AppState> {
    Router::new()
        .nest("/characters", character::router())
        .nest("/lessons", lesson::router())
        .nest("/chat", chat::router())
        .nest("/progress", progress::router())
}

/// Build the `/admin` route tree, guarded as a whole by [`RequireAdminKey`].
///
/// ```text
/// /                                                 admin panel (HTML)
/// /characters                                       list, create
/// /characters/{id}                                  get, update, delete
/// /lessons                                          list, create
/// /lessons/{character_id}                           ordered list
/// /lessons/{character_id}/insert                    insert at position (POST)
/// /lessons/{character_id}/reorder                   reorder (POST)
/// /lessons/{character_id}/positions/{position}      delete at position (DELETE)
/// /lessons/{character_id}/{lesson_id}               update, delete
/// ```
pub fn admin_routes(state: AppState) -> Router<AppState> {
    Router::new()
        .route("/", get(handlers::admin::panel))
        .nest("/characters", character::admin_router())
        .nest("/lessons", lesson::admin_router())
        .route_layer(middleware::from_extractor_with_state::<RequireAdminKey, AppState>(
            state,
        ))
}
