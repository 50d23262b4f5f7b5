//! Lesson administration with the position invariant.
//!
//! Every operation that reads a character's lesson list to decide a
//! position change holds that character's [`LessonLocks`] entry for the
//! whole read-validate-write sequence. The store then applies the change
//! in one transaction.

use std::sync::Arc;

use serde::Deserialize;
use tutor_core::answer::{check_answer, AnswerVerdict};
use tutor_core::error::CoreError;
use tutor_core::lesson_order::{validate_insert_position, validate_reorder};
use tutor_db::models::lesson::{CreateLesson, Lesson, UpdateLesson};
use tutor_db::{Store, StoreError};

use super::locks::LessonLocks;
use crate::error::AppResult;

/// Body of `POST /admin/lessons/{character_id}/insert`.
#[derive(Debug, Clone, Deserialize)]
pub struct InsertLessonRequest {
    pub position: i64,
    pub lesson: CreateLesson,
}

/// Body of `POST /admin/lessons/{character_id}/reorder`.
#[derive(Debug, Clone, Deserialize)]
pub struct ReorderRequest {
    pub ordered_ids: Vec<String>,
}

pub struct LessonAdminService {
    store: Arc<dyn Store>,
    locks: LessonLocks,
}

impl LessonAdminService {
    pub fn new(store: Arc<dyn Store>) -> Self {
        Self {
            store,
            locks: LessonLocks::new(),
        }
    }

    /// Every lesson, grouped by character and ordered by position.
    pub async fn list_all(&self) -> AppResult<Vec<Lesson>> {
        Ok(self.store.list_all_lessons().await?)
    }

    /// One character's lessons ordered by position.
    pub async fn list(&self, character_id: &str) -> AppResult<Vec<Lesson>> {
        self.require_character(character_id).await?;
        Ok(self.store.list_lessons(character_id).await?)
    }

    pub async fn get(&self, lesson_id: &str) -> AppResult<Lesson> {
        self.store
            .find_lesson(lesson_id)
            .await?
            .ok_or_else(|| lesson_not_found(lesson_id).into())
    }

    /// Append a lesson at the end of its character's list.
    pub async fn create(&self, input: CreateLesson) -> AppResult<Lesson> {
        input.validate()?;
        let new = input.into_new();

        let _guard = self.locks.lock(&new.character_id).await;
        self.require_character(&new.character_id).await?;
        let len = self.store.list_lessons(&new.character_id).await?.len();
        let lesson = self.store.insert_lesson_at(&new, position_i32(len)?).await?;

        tracing::info!(
            character_id = %lesson.character_id,
            lesson_id = %lesson.id,
            position = lesson.position,
            "Lesson created"
        );
        Ok(lesson)
    }

    /// Insert a lesson at `position`, shifting the lessons at or after it.
    /// Returns the updated list.
    pub async fn insert_at(
        &self,
        character_id: &str,
        position: i64,
        mut input: CreateLesson,
    ) -> AppResult<Vec<Lesson>> {
        input.character_id = character_id.to_string();
        input.validate()?;
        let new = input.into_new();

        let _guard = self.locks.lock(character_id).await;
        self.require_character(character_id).await?;
        let len = self.store.list_lessons(character_id).await?.len();
        let at = validate_insert_position(position, len)?;
        self.store.insert_lesson_at(&new, position_i32(at)?).await?;

        tracing::info!(character_id, lesson_id = %new.id, position = at, "Lesson inserted");
        Ok(self.store.list_lessons(character_id).await?)
    }

    /// Remove the lesson at `position` and close the gap. Returns the
    /// updated list.
    pub async fn delete_at(&self, character_id: &str, position: i64) -> AppResult<Vec<Lesson>> {
        let _guard = self.locks.lock(character_id).await;
        self.require_character(character_id).await?;
        self.delete_at_locked(character_id, position).await?;
        Ok(self.store.list_lessons(character_id).await?)
    }

    /// Remove a lesson by id. Positions behind it close up, so the list
    /// stays contiguous.
    pub async fn delete(&self, character_id: &str, lesson_id: &str) -> AppResult<()> {
        let _guard = self.locks.lock(character_id).await;
        let lesson = self
            .store
            .find_lesson(lesson_id)
            .await?
            .filter(|l| l.character_id == character_id)
            .ok_or_else(|| lesson_not_found(lesson_id))?;
        self.delete_at_locked(character_id, i64::from(lesson.position))
            .await
    }

    /// Assign positions `0..n` following `ordered_ids`, which must name
    /// exactly the character's current lessons. Returns the updated list.
    pub async fn reorder(
        &self,
        character_id: &str,
        ordered_ids: &[String],
    ) -> AppResult<Vec<Lesson>> {
        let _guard = self.locks.lock(character_id).await;
        self.require_character(character_id).await?;
        let current: Vec<String> = self
            .store
            .list_lessons(character_id)
            .await?
            .into_iter()
            .map(|l| l.id)
            .collect();
        validate_reorder(&current, ordered_ids)?;

        self.store
            .set_lesson_positions(character_id, ordered_ids)
            .await?;
        tracing::info!(character_id, count = ordered_ids.len(), "Lessons reordered");
        Ok(self.store.list_lessons(character_id).await?)
    }

    /// Edit a lesson's title and/or steps. Its position never changes.
    pub async fn update(
        &self,
        character_id: &str,
        lesson_id: &str,
        input: &UpdateLesson,
    ) -> AppResult<Lesson> {
        input.validate()?;
        let belongs = self
            .store
            .find_lesson(lesson_id)
            .await?
            .is_some_and(|l| l.character_id == character_id);
        if !belongs {
            return Err(lesson_not_found(lesson_id).into());
        }

        let lesson = self
            .store
            .update_lesson(lesson_id, input)
            .await?
            .ok_or_else(|| lesson_not_found(lesson_id))?;
        tracing::info!(character_id, lesson_id, "Lesson updated");
        Ok(lesson)
    }

    /// Check a learner's answer to step `index` of a lesson.
    pub async fn check_answer(
        &self,
        character_id: &str,
        lesson_id: &str,
        index: usize,
        answer: &str,
    ) -> AppResult<AnswerVerdict> {
        let lesson = self
            .store
            .find_lesson(lesson_id)
            .await?
            .filter(|l| l.character_id == character_id)
            .ok_or_else(|| lesson_not_found(lesson_id))?;
        let step = lesson.steps.get(index).ok_or_else(|| CoreError::NotFound {
            entity: "Step",
            id: format!("{lesson_id}#{index}"),
        })?;
        Ok(check_answer(step, answer))
    }

    /// Caller must hold the character's lock.
    async fn delete_at_locked(&self, character_id: &str, position: i64) -> AppResult<()> {
        let missing = || CoreError::NotFound {
            entity: "Lesson",
            id: format!("{character_id}@{position}"),
        };
        let at = i32::try_from(position).map_err(|_| missing())?;
        let removed = self
            .store
            .delete_lesson_at(character_id, at)
            .await?
            .ok_or_else(missing)?;
        tracing::info!(
            character_id,
            lesson_id = %removed.id,
            position = removed.position,
            "Lesson deleted"
        );
        Ok(())
    }

    async fn require_character(&self, character_id: &str) -> AppResult<()> {
        match self.store.find_character(character_id).await? {
            Some(_) => Ok(()),
            None => Err(StoreError::NotFound {
                entity: "Character",
                id: character_id.to_string(),
            }
            .into()),
        }
    }
}

fn lesson_not_found(id: &str) -> CoreError {
    CoreError::NotFound {
        entity: "Lesson",
        id: id.to_string(),
    }
}

fn position_i32(position: usize) -> Result<i32, CoreError> {
    i32::try_from(position)
        .map_err(|_| CoreError::Validation(format!("position {position} is too large")))
}
