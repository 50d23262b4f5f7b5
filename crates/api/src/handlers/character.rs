//! Handlers for the `/characters` resource.
//!
//! Reads are public; writes are mounted under `/admin/characters`.

use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;
use tutor_db::models::character::{Character, CreateCharacter, UpdateCharacter};

use crate::error::AppResult;
use crate::extract::{ValidJson, ValidPath};
use crate::state::AppState;

/// GET /characters
pub async fn list(State(state): State<AppState>) -> AppResult<Json<Vec<Character>>> {
    let characters = state.characters.list().await?;
    Ok(Json(characters))
}

/// GET /characters/{id}
pub async fn get_by_id(
    State(state): State<AppState>,
    ValidPath(id): ValidPath<String>,
) -> AppResult<Json<Character>> {
    let character = state.characters.get(&id).await?;
    Ok(Json(character))
}

/// POST /admin/characters
pub async fn create(
    State(state): State<AppState>,
    ValidJson(input): ValidJson<CreateCharacter>,
) -> AppResult<(StatusCode, Json<Character>)> {
    let character = state.characters.create(&input).await?;
    Ok((StatusCode::CREATED, Json(character)))
}

/// PUT /admin/characters/{id}
pub async fn update(
    State(state): State<AppState>,
    ValidPath(id): ValidPath<String>,
    ValidJson(input): ValidJson<UpdateCharacter>,
) -> AppResult<Json<Character>> {
    let character = state.characters.update(&id, &input).await?;
    Ok(Json(character))
}

/// DELETE /admin/characters/{id}
pub async fn delete(
    State(state): State<AppState>,
    ValidPath(id): ValidPath<String>,
) -> AppResult<StatusCode> {
    state.characters.delete(&id).await?;
    Ok(StatusCode::NO_CONTENT)
}
