use axum::extract::State;
use axum::Json;

use crate::error::AppResult;
use crate::extract::{ValidJson, ValidPath};
use crate::services::chat::{ChatRequest, ChatResponse};
use crate::state::AppState;

/// POST /chat/{character_id}
pub async fn send(
    State(state): State<AppState>,
    ValidPath(character_id): ValidPath<String>,
    ValidJson(request): ValidJson<ChatRequest>,
) -> AppResult<Json<ChatResponse>> {
    let response = state.chat.reply(&character_id, &request).await?;
    Ok(Json(response))
}
