use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;
use tutor_db::models::progress::UpdateProgress;

use crate::error::AppResult;
use crate::extract::{ValidJson, ValidPath};
use crate::services::progress::ProgressView;
use crate::state::AppState;

/// GET /progress/{user_id}/{character_id}
pub async fn get(
    State(state): State<AppState>,
    ValidPath((user_id, character_id)): ValidPath<(String, String)>,
) -> AppResult<Json<ProgressView>> {
    let view = state.progress.get(&user_id, &character_id).await?;
    Ok(Json(view))
}

/// POST /progress/{user_id}/{character_id}
pub async fn start(
    State(state): State<AppState>,
    ValidPath((user_id, character_id)): ValidPath<(String, String)>,
) -> AppResult<(StatusCode, Json<ProgressView>)> {
    let view = state.progress.start(&user_id, &character_id).await?;
    Ok((StatusCode::CREATED, Json(view)))
}

/// PUT /progress/{user_id}/{character_id}
pub async fn update(
    State(state): State<AppState>,
    ValidPath((user_id, character_id)): ValidPath<(String, String)>,
    ValidJson(input): ValidJson<UpdateProgress>,
) -> AppResult<Json<ProgressView>> {
    let view = state
        .progress
        .update(&user_id, &character_id, &input)
        .await?;
    Ok(Json(view))
}
