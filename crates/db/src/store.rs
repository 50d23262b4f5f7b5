//! Repository traits the service layer depends on.
//!
//! The capability set is narrow: get/list/create/update/delete by
//! identifier, position-aware operations for lessons, and a per-learner
//! progress record. Services only
//! see `Arc<dyn Store>`, so the storage engine can be swapped without
//! touching them.

use async_trait::async_trait;

use crate::models::character::{Character, CreateCharacter, UpdateCharacter};
use crate::models::lesson::{Lesson, NewLesson, UpdateLesson};
use crate::models::progress::{Progress, UpdateProgress};
use crate::repositories::{CharacterRepo, LessonRepo, ProgressRepo};
use crate::{DbPool, StoreError};

#[async_trait]
pub trait CharacterStore: Send + Sync {
    async fn list_characters(&self) -> Result<Vec<Character>, StoreError>;

    async fn find_character(&self, id: &str) -> Result<Option<Character>, StoreError>;

    async fn create_character(&self, input: &CreateCharacter) -> Result<Character, StoreError>;

    async fn update_character(
        &self,
        id: &str,
        input: &UpdateCharacter,
    ) -> Result<Option<Character>, StoreError>;

    /// Delete a character together with its lessons.
    async fn delete_character(&self, id: &str) -> Result<bool, StoreError>;
}

#[async_trait]
pub trait LessonStore: Send + Sync {
    async fn list_all_lessons(&self) -> Result<Vec<Lesson>, StoreError>;

    /// One character's lessons ordered by position.
    async fn list_lessons(&self, character_id: &str) -> Result<Vec<Lesson>, StoreError>;

    async fn find_lesson(&self, id: &str) -> Result<Option<Lesson>, StoreError>;

    /// Atomically shift lessons at or after `position` and store `lesson` there.
    async fn insert_lesson_at(&self, lesson: &NewLesson, position: i32)
        -> Result<Lesson, StoreError>;

    /// Edit title/steps without moving any lesson.
    async fn update_lesson(
        &self,
        id: &str,
        input: &UpdateLesson,
    ) -> Result<Option<Lesson>, StoreError>;

    /// Atomically remove the lesson at `position` and close the gap.
    async fn delete_lesson_at(
        &self,
        character_id: &str,
        position: i32,
    ) -> Result<Option<Lesson>, StoreError>;

    /// Atomically assign position `i` to `ordered_ids[i]`.
    async fn set_lesson_positions(
        &self,
        character_id: &str,
        ordered_ids: &[String],
    ) -> Result<(), StoreError>;
}

#[async_trait]
pub trait ProgressStore: Send + Sync {
    async fn find_progress(
        &self,
        user_id: &str,
        character_id: &str,
    ) -> Result<Option<Progress>, StoreError>;

    /// Start a record at lesson 0, step 0. Fails with `Duplicate` if one
    /// exists and `NotFound` if the character does not.
    async fn create_progress(
        &self,
        user_id: &str,
        character_id: &str,
    ) -> Result<Progress, StoreError>;

    async fn update_progress(
        &self,
        user_id: &str,
        character_id: &str,
        input: &UpdateProgress,
    ) -> Result<Option<Progress>, StoreError>;
}

/// The full document store: characters, lessons, learner progress, and a
/// liveness probe.
#[async_trait]
pub trait Store: CharacterStore + LessonStore + ProgressStore {
    async fn ping(&self) -> Result<(), StoreError>;
}

// ---------------------------------------------------------------------------
// PostgreSQL
// ---------------------------------------------------------------------------

/// [`Store`] backed by PostgreSQL through the zero-sized repositories.
#[derive(Clone)]
pub struct PgStore {
    pool: DbPool,
}

impl PgStore {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }

    pub fn pool(&self) -> &DbPool {
        &self.pool
    }
}

#[async_trait]
impl CharacterStore for PgStore {
    async fn list_characters(&self) -> Result<Vec<Character>, StoreError> {
        Ok(CharacterRepo::list(&self.pool).await?)
    }

    async fn find_character(&self, id: &str) -> Result<Option<Character>, StoreError> {
        Ok(CharacterRepo::find_by_id(&self.pool, id).await?)
    }

    async fn create_character(&self, input: &CreateCharacter) -> Result<Character, StoreError> {
        CharacterRepo::create(&self.pool, input).await
    }

    async fn update_character(
        &self,
        id: &str,
        input: &UpdateCharacter,
    ) -> Result<Option<Character>, StoreError> {
        Ok(CharacterRepo::update(&self.pool, id, input).await?)
    }

    async fn delete_character(&self, id: &str) -> Result<bool, StoreError> {
        Ok(CharacterRepo::delete(&self.pool, id).await?)
    }
}

#[async_trait]
impl LessonStore for PgStore {
    async fn list_all_lessons(&self) -> Result<Vec<Lesson>, StoreError> {
        Ok(LessonRepo::list_all(&self.pool).await?)
    }

    async fn list_lessons(&self, character_id: &str) -> Result<Vec<Lesson>, StoreError> {
        Ok(LessonRepo::list_by_character(&self.pool, character_id).await?)
    }

    async fn find_lesson(&self, id: &str) -> Result<Option<Lesson>, StoreError> {
        Ok(LessonRepo::find_by_id(&self.pool, id).await?)
    }

    async fn insert_lesson_at(
        &self,
        lesson: &NewLesson,
        position: i32,
    ) -> Result<Lesson, StoreError> {
        LessonRepo::insert_at(&self.pool, lesson, position).await
    }

    async fn update_lesson(
        &self,
        id: &str,
        input: &UpdateLesson,
    ) -> Result<Option<Lesson>, StoreError> {
        Ok(LessonRepo::update(&self.pool, id, input).await?)
    }

    async fn delete_lesson_at(
        &self,
        character_id: &str,
        position: i32,
    ) -> Result<Option<Lesson>, StoreError> {
        LessonRepo::delete_at(&self.pool, character_id, position).await
    }

    async fn set_lesson_positions(
        &self,
        character_id: &str,
        ordered_ids: &[String],
    ) -> Result<(), StoreError> {
        LessonRepo::set_positions(&self.pool, character_id, ordered_ids).await
    }
}

#[async_trait]
impl ProgressStore for PgStore {
    async fn find_progress(
        &self,
        user_id: &str,
        character_id: &str,
    ) -> Result<Option<Progress>, StoreError> {
        Ok(ProgressRepo::find(&self.pool, user_id, character_id).await?)
    }

    async fn create_progress(
        &self,
        user_id: &str,
        character_id: &str,
    ) -> Result<Progress, StoreError> {
        ProgressRepo::create(&self.pool, user_id, character_id).await
    }

    async fn update_progress(
        &self,
        user_id: &str,
        character_id: &str,
        input: &UpdateProgress,
    ) -> Result<Option<Progress>, StoreError> {
        Ok(ProgressRepo::update(&self.pool, user_id, character_id, input).await?)
    }
}

#[async_trait]
impl Store for PgStore {
    async fn ping(&self) -> Result<(), StoreError> {
        Ok(crate::health_check(&self.pool).await?)
    }
}
