//! Lesson entity model and DTOs.

use serde::{Deserialize, Serialize};
use sqlx::types::Json;
use sqlx::FromRow;
use tutor_core::error::CoreError;
use tutor_core::step::{validate_steps, validate_title, Step};
use tutor_core::types::{new_lesson_id, EntityId, Timestamp};

/// A lesson row from the `lessons` table.
#[derive(Debug, Clone, PartialEq, FromRow, Serialize)]
pub struct Lesson {
    pub id: EntityId,
    pub character_id: EntityId,
    /// Zero-based index within the character's lesson list.
    pub position: i32,
    pub title: String,
    pub steps: Json<Vec<Step>>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// DTO for creating a lesson.
///
/// `character_id` may be omitted when the route already names the
/// character; handlers overwrite it from the path.
#[derive(Debug, Clone, Deserialize)]
pub struct CreateLesson {
    /// Generated when omitted.
    pub id: Option<EntityId>,
    #[serde(default)]
    pub character_id: EntityId,
    pub title: String,
    #[serde(default)]
    pub steps: Vec<Step>,
}

impl CreateLesson {
    pub fn validate(&self) -> Result<(), CoreError> {
        if self.character_id.is_empty() {
            return Err(CoreError::Validation("character_id is required".into()));
        }
        if let Some(id) = &self.id {
            validate_lesson_id(id)?;
        }
        validate_title(&self.title)?;
        validate_steps(&self.steps)
    }

    /// Resolve the identifier, producing the record handed to a store.
    pub fn into_new(self) -> NewLesson {
        NewLesson {
            id: self.id.unwrap_or_else(new_lesson_id),
            character_id: self.character_id,
            title: self.title.trim().to_string(),
            steps: self.steps,
        }
    }
}

const MAX_LESSON_ID_LEN: usize = 64;

/// Path segments the admin lesson routes use next to `{lesson_id}`.
const RESERVED_LESSON_IDS: &[&str] = &["insert", "reorder", "positions"];

/// Lesson ids are URL segments: ASCII letters, digits, `-` and `_`, and
/// never one of the fixed admin route words.
pub fn validate_lesson_id(id: &str) -> Result<(), CoreError> {
    if id.is_empty() || id.len() > MAX_LESSON_ID_LEN {
        return Err(CoreError::Validation(format!(
            "lesson id must be 1..={MAX_LESSON_ID_LEN} characters"
        )));
    }
    if !id
        .chars()
        .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_')
    {
        return Err(CoreError::Validation(format!(
            "lesson id '{id}' may only contain A-Z, a-z, 0-9, '-' and '_'"
        )));
    }
    if RESERVED_LESSON_IDS
        .iter()
        .any(|reserved| id.eq_ignore_ascii_case(reserved))
    {
        return Err(CoreError::Validation(format!("lesson id '{id}' is reserved")));
    }
    Ok(())
}

/// A validated lesson with a resolved identifier, ready to store.
#[derive(Debug, Clone, PartialEq)]
pub struct NewLesson {
    pub id: EntityId,
    pub character_id: EntityId,
    pub title: String,
    pub steps: Vec<Step>,
}

/// DTO for editing a lesson. Position is deliberately absent: edits never
/// move lessons.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct UpdateLesson {
    pub title: Option<String>,
    pub steps: Option<Vec<Step>>,
}

impl UpdateLesson {
    pub fn validate(&self) -> Result<(), CoreError> {
        if let Some(title) = &self.title {
            validate_title(title)?;
        }
        if let Some(steps) = &self.steps {
            validate_steps(steps)?;
        }
        Ok(())
    }
}
