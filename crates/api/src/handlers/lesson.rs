//! Handlers for lessons.
//!
//! Learners read a character's lessons and check answers under `/lessons`;
//! editing, insertion, deletion and reordering live under `/admin/lessons`.

use axum::extract::{Query, State};
use axum::http::StatusCode;
use axum::Json;
use serde::Deserialize;
use tutor_core::answer::AnswerVerdict;
use tutor_db::models::lesson::{CreateLesson, Lesson, UpdateLesson};

use crate::error::AppResult;
use crate::extract::{ValidJson, ValidPath};
use crate::services::lessons::{InsertLessonRequest, ReorderRequest};
use crate::state::AppState;

/// Query parameters for `GET /admin/lessons`.
#[derive(Debug, Deserialize)]
pub struct LessonFilter {
    pub character_id: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct AnswerRequest {
    pub answer: String,
}

/// GET /lessons/{character_id} and GET /admin/lessons/{character_id}
pub async fn list_by_character(
    State(state): State<AppState>,
    ValidPath(character_id): ValidPath<String>,
) -> AppResult<Json<Vec<Lesson>>> {
    let lessons = state.lessons.list(&character_id).await?;
    Ok(Json(lessons))
}

/// POST /lessons/{character_id}/{lesson_id}/steps/{index}/answer
pub async fn check_answer(
    State(state): State<AppState>,
    ValidPath((character_id, lesson_id, index)): ValidPath<(String, String, usize)>,
    ValidJson(input): ValidJson<AnswerRequest>,
) -> AppResult<Json<AnswerVerdict>> {
    let verdict = state
        .lessons
        .check_answer(&character_id, &lesson_id, index, &input.answer)
        .await?;
    Ok(Json(verdict))
}

// ---------------------------------------------------------------------------
// Admin
// ---------------------------------------------------------------------------

/// GET /admin/lessons[?character_id=]
pub async fn list(
    State(state): State<AppState>,
    Query(filter): Query<LessonFilter>,
) -> AppResult<Json<Vec<Lesson>>> {
    let lessons = match filter.character_id.as_deref() {
        Some(character_id) => state.lessons.list(character_id).await?,
        None => state.lessons.list_all().await?,
    };
    Ok(Json(lessons))
}

/// POST /admin/lessons
///
/// Appends the lesson at the end of its character's list.
pub async fn create(
    State(state): State<AppState>,
    ValidJson(input): ValidJson<CreateLesson>,
) -> AppResult<(StatusCode, Json<Lesson>)> {
    let lesson = state.lessons.create(input).await?;
    Ok((StatusCode::CREATED, Json(lesson)))
}

/// PUT /admin/lessons/{character_id}/{lesson_id}
pub async fn update(
    State(state): State<AppState>,
    ValidPath((character_id, lesson_id)): ValidPath<(String, String)>,
    ValidJson(input): ValidJson<UpdateLesson>,
) -> AppResult<Json<Lesson>> {
    let lesson = state
        .lessons
        .update(&character_id, &lesson_id, &input)
        .await?;
    Ok(Json(lesson))
}

/// DELETE /admin/lessons/{character_id}/{lesson_id}
pub async fn delete(
    State(state): State<AppState>,
    ValidPath((character_id, lesson_id)): ValidPath<(String, String)>,
) -> AppResult<StatusCode> {
    state.lessons.delete(&character_id, &lesson_id).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// POST /admin/lessons/{character_id}/insert
pub async fn insert(
    State(state): State<AppState>,
    ValidPath(character_id): ValidPath<String>,
    ValidJson(input): ValidJson<InsertLessonRequest>,
) -> AppResult<Json<Vec<Lesson>>> {
    let lessons = state
        .lessons
        .insert_at(&character_id, input.position, input.lesson)
        .await?;
    Ok(Json(lessons))
}

/// POST /admin/lessons/{character_id}/reorder
pub async fn reorder(
    State(state): State<AppState>,
    ValidPath(character_id): ValidPath<String>,
    ValidJson(input): ValidJson<ReorderRequest>,
) -> AppResult<Json<Vec<Lesson>>> {
    let lessons = state
        .lessons
        .reorder(&character_id, &input.ordered_ids)
        .await?;
    Ok(Json(lessons))
}

/// DELETE /admin/lessons/{character_id}/positions/{position}
pub async fn delete_at_position(
    State(state): State<AppState>,
    ValidPath((character_id, position)): ValidPath<(String, i64)>,
) -> AppResult<Json<Vec<Lesson>>> {
    let lessons = state.lessons.delete_at(&character_id, position).await?;
    Ok(Json(lessons))
}
