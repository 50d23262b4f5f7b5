//! Learner progress entity model and DTOs.

use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use tutor_core::types::{EntityId, Timestamp};

/// A row from the `user_lesson_progress` table.
#[derive(Debug, Clone, PartialEq, FromRow, Serialize)]
pub struct Progress {
    pub user_id: String,
    pub character_id: EntityId,
    pub current_lesson_index: i32,
    pub current_step_index: i32,
    pub completed: bool,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// DTO for moving a learner's cursor. The whole cursor is replaced.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
pub struct UpdateProgress {
    pub current_lesson_index: i32,
    pub current_step_index: i32,
    #[serde(default)]
    pub completed: bool,
}
