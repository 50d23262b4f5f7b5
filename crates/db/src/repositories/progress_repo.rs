//! Repository for the `user_lesson_progress` table.

use sqlx::PgPool;

use crate::models::progress::{Progress, UpdateProgress};
use crate::StoreError;

const COLUMNS: &str = "user_id, character_id, current_lesson_index, current_step_index, \
                       completed, created_at, updated_at";

/// Provides get/create/update for learner progress, keyed by
/// `(user_id, character_id)`.
pub struct ProgressRepo;

impl ProgressRepo {
    pub async fn find(
        pool: &PgPool,
        user_id: &str,
        character_id: &str,
    ) -> Result<Option<Progress>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM user_lesson_progress
             WHERE user_id = $1 AND character_id = $2"
        );
        sqlx::query_as::<_, Progress>(&query)
            .bind(user_id)
            .bind(character_id)
            .fetch_optional(pool)
            .await
    }

    /// Start a record at lesson 0, step 0.
    ///
    /// An existing record yields [`StoreError::Duplicate`]; an unknown
    /// character yields [`StoreError::NotFound`].
    pub async fn create(
        pool: &PgPool,
        user_id: &str,
        character_id: &str,
    ) -> Result<Progress, StoreError> {
        let query = format!(
            "INSERT INTO user_lesson_progress (user_id, character_id)
             VALUES ($1, $2)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Progress>(&query)
            .bind(user_id)
            .bind(character_id)
            .fetch_one(pool)
            .await
            .map_err(|e| classify(e, user_id, character_id))
    }

    /// Replace the cursor. Returns `None` if no record exists.
    pub async fn update(
        pool: &PgPool,
        user_id: &str,
        character_id: &str,
        input: &UpdateProgress,
    ) -> Result<Option<Progress>, sqlx::Error> {
        let query = format!(
            "UPDATE user_lesson_progress SET
                current_lesson_index = $3,
                current_step_index = $4,
                completed = $5
             WHERE user_id = $1 AND character_id = $2
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Progress>(&query)
            .bind(user_id)
            .bind(character_id)
            .bind(input.current_lesson_index)
            .bind(input.current_step_index)
            .bind(input.completed)
            .fetch_optional(pool)
            .await
    }
}

fn classify(err: sqlx::Error, user_id: &str, character_id: &str) -> StoreError {
    if let sqlx::Error::Database(db_err) = &err {
        match db_err.code().as_deref() {
            Some("23505") => {
                return StoreError::Duplicate {
                    entity: "Progress",
                    id: format!("{user_id}/{character_id}"),
                }
            }
            Some("23503") => {
                return StoreError::NotFound {
                    entity: "Character",
                    id: character_id.to_string(),
                }
            }
            _ => {}
        }
    }
    StoreError::Sqlx(err)
}
