//! Learner progress through a character's lessons.
//!
//! Learners are identified by an opaque `user_id` supplied by the client;
//! there are no accounts behind it.

use std::sync::Arc;

use serde::Serialize;
use tutor_core::error::CoreError;
use tutor_core::progress::{percent_complete, validate_cursor, validate_user_id};
use tutor_db::models::progress::{Progress, UpdateProgress};
use tutor_db::Store;

use crate::error::AppResult;

/// A progress record with its completion share.
#[derive(Debug, Clone, Serialize)]
pub struct ProgressView {
    #[serde(flatten)]
    pub progress: Progress,
    /// Percentage of the character's steps behind the cursor.
    pub percent_complete: u8,
}

pub struct ProgressService {
    store: Arc<dyn Store>,
}

impl ProgressService {
    pub fn new(store: Arc<dyn Store>) -> Self {
        Self { store }
    }

    pub async fn get(&self, user_id: &str, character_id: &str) -> AppResult<ProgressView> {
        validate_user_id(user_id)?;
        let step_counts = self.step_counts(character_id).await?;
        let progress = self
            .store
            .find_progress(user_id, character_id)
            .await?
            .ok_or_else(|| not_found(user_id, character_id))?;
        Ok(view(progress, &step_counts))
    }

    /// Start a learner at the first step of the first lesson.
    pub async fn start(&self, user_id: &str, character_id: &str) -> AppResult<ProgressView> {
        validate_user_id(user_id)?;
        let step_counts = self.step_counts(character_id).await?;
        let progress = self.store.create_progress(user_id, character_id).await?;
        tracing::info!(user_id, character_id, "Progress started");
        Ok(view(progress, &step_counts))
    }

    /// Move the cursor. It must point into the current lesson list.
    pub async fn update(
        &self,
        user_id: &str,
        character_id: &str,
        input: &UpdateProgress,
    ) -> AppResult<ProgressView> {
        validate_user_id(user_id)?;
        let step_counts = self.step_counts(character_id).await?;
        validate_cursor(
            input.current_lesson_index,
            input.current_step_index,
            &step_counts,
        )?;

        let progress = self
            .store
            .update_progress(user_id, character_id, input)
            .await?
            .ok_or_else(|| not_found(user_id, character_id))?;
        tracing::debug!(
            user_id,
            character_id,
            lesson = input.current_lesson_index,
            step = input.current_step_index,
            completed = input.completed,
            "Progress updated"
        );
        Ok(view(progress, &step_counts))
    }

    /// Step count of each lesson in position order; NotFound for an
    /// unknown character.
    async fn step_counts(&self, character_id: &str) -> AppResult<Vec<usize>> {
        if self.store.find_character(character_id).await?.is_none() {
            return Err(CoreError::NotFound {
                entity: "Character",
                id: character_id.to_string(),
            }
            .into());
        }
        let lessons = self.store.list_lessons(character_id).await?;
        Ok(lessons.iter().map(|l| l.steps.0.len()).collect())
    }
}

fn view(progress: Progress, step_counts: &[usize]) -> ProgressView {
    let percent_complete = percent_complete(
        progress.completed,
        progress.current_lesson_index,
        progress.current_step_index,
        step_counts,
    );
    ProgressView {
        progress,
        percent_complete,
    }
}

fn not_found(user_id: &str, character_id: &str) -> CoreError {
    CoreError::NotFound {
        entity: "Progress",
        id: format!("{user_id}/{character_id}"),
    }
}
