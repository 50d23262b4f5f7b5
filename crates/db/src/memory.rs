//! In-process [`Store`] used by tests and local development.
//!
//! All state sits behind one `RwLock`, so each trait call is atomic with
//! respect to every other call. Lesson lists are kept as position-ordered
//! vectors and renumbered with the shared ordering rules after each change.

use std::collections::{BTreeMap, HashMap};

use async_trait::async_trait;
use chrono::Utc;
use sqlx::types::Json;
use tokio::sync::RwLock;
use tutor_core::lesson_order;

use crate::models::character::{Character, CreateCharacter, UpdateCharacter};
use crate::models::lesson::{Lesson, NewLesson, UpdateLesson};
use crate::models::progress::{Progress, UpdateProgress};
use crate::store::{CharacterStore, LessonStore, ProgressStore, Store};
use crate::StoreError;

#[derive(Default)]
struct Inner {
    characters: BTreeMap<String, Character>,
    /// Lessons per character id, index == position.
    lessons: HashMap<String, Vec<Lesson>>,
    /// Keyed by `(user_id, character_id)`.
    progress: HashMap<(String, String), Progress>,
}

impl Inner {
    fn require_character(&self, id: &str) -> Result<(), StoreError> {
        if self.characters.contains_key(id) {
            Ok(())
        } else {
            Err(StoreError::NotFound {
                entity: "Character",
                id: id.to_string(),
            })
        }
    }

    fn lesson_id_taken(&self, id: &str) -> bool {
        self.lessons.values().flatten().any(|l| l.id == id)
    }

    fn find_lesson_mut(&mut self, id: &str) -> Option<&mut Lesson> {
        self.lessons.values_mut().flatten().find(|l| l.id == id)
    }
}

/// Write each lesson's `position` from its index.
fn renumber(list: &mut [Lesson]) {
    for (i, lesson) in list.iter_mut().enumerate() {
        let position = i as i32;
        if lesson.position != position {
            lesson.position = position;
            lesson.updated_at = Utc::now();
        }
    }
}

/// Map an ordering rule violation to the store's error vocabulary.
fn ordering_conflict(err: tutor_core::error::CoreError) -> StoreError {
    StoreError::Conflict(err.to_string())
}

#[derive(Default)]
pub struct MemoryStore {
    inner: RwLock<Inner>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl CharacterStore for MemoryStore {
    async fn list_characters(&self) -> Result<Vec<Character>, StoreError> {
        let inner = self.inner.read().await;
        let mut list: Vec<Character> = inner.characters.values().cloned().collect();
        list.sort_by(|a, b| a.name.cmp(&b.name).then_with(|| a.id.cmp(&b.id)));
        Ok(list)
    }

    async fn find_character(&self, id: &str) -> Result<Option<Character>, StoreError> {
        Ok(self.inner.read().await.characters.get(id).cloned())
    }

    async fn create_character(&self, input: &CreateCharacter) -> Result<Character, StoreError> {
        let mut inner = self.inner.write().await;
        if inner.characters.contains_key(&input.id) {
            return Err(StoreError::Duplicate {
                entity: "Character",
                id: input.id.clone(),
            });
        }
        let now = Utc::now();
        let character = Character {
            id: input.id.clone(),
            name: input.name.trim().to_string(),
            name_gurmukhi: input.name_gurmukhi.clone(),
            role: input.role.clone(),
            persona: input.persona.clone(),
            default_expression: input.expression().to_string(),
            created_at: now,
            updated_at: now,
        };
        inner
            .characters
            .insert(character.id.clone(), character.clone());
        Ok(character)
    }

    async fn update_character(
        &self,
        id: &str,
        input: &UpdateCharacter,
    ) -> Result<Option<Character>, StoreError> {
        let mut inner = self.inner.write().await;
        let Some(character) = inner.characters.get_mut(id) else {
            return Ok(None);
        };
        if let Some(name) = &input.name {
            character.name = name.trim().to_string();
        }
        if let Some(v) = &input.name_gurmukhi {
            character.name_gurmukhi = Some(v.clone());
        }
        if let Some(v) = &input.role {
            character.role = Some(v.clone());
        }
        if let Some(v) = &input.persona {
            character.persona = v.clone();
        }
        if let Some(e) = input.default_expression {
            character.default_expression = e.as_str().to_string();
        }
        character.updated_at = Utc::now();
        Ok(Some(character.clone()))
    }

    async fn delete_character(&self, id: &str) -> Result<bool, StoreError> {
        let mut inner = self.inner.write().await;
        let removed = inner.characters.remove(id).is_some();
        if removed {
            inner.lessons.remove(id);
            inner.progress.retain(|(_, character_id), _| character_id != id);
        }
        Ok(removed)
    }
}

#[async_trait]
impl LessonStore for MemoryStore {
    async fn list_all_lessons(&self) -> Result<Vec<Lesson>, StoreError> {
        let inner = self.inner.read().await;
        let mut ids: Vec<&String> = inner.lessons.keys().collect();
        ids.sort();
        Ok(ids
            .into_iter()
            .flat_map(|id| inner.lessons[id].iter().cloned())
            .collect())
    }

    async fn list_lessons(&self, character_id: &str) -> Result<Vec<Lesson>, StoreError> {
        let inner = self.inner.read().await;
        Ok(inner.lessons.get(character_id).cloned().unwrap_or_default())
    }

    async fn find_lesson(&self, id: &str) -> Result<Option<Lesson>, StoreError> {
        let inner = self.inner.read().await;
        Ok(inner.lessons.values().flatten().find(|l| l.id == id).cloned())
    }

    async fn insert_lesson_at(
        &self,
        lesson: &NewLesson,
        position: i32,
    ) -> Result<Lesson, StoreError> {
        let mut inner = self.inner.write().await;
        inner.require_character(&lesson.character_id)?;
        if inner.lesson_id_taken(&lesson.id) {
            return Err(StoreError::Duplicate {
                entity: "Lesson",
                id: lesson.id.clone(),
            });
        }

        let now = Utc::now();
        let record = Lesson {
            id: lesson.id.clone(),
            character_id: lesson.character_id.clone(),
            position,
            title: lesson.title.clone(),
            steps: Json(lesson.steps.clone()),
            created_at: now,
            updated_at: now,
        };

        let list = inner.lessons.entry(lesson.character_id.clone()).or_default();
        let at = lesson_order::insert_at(list, i64::from(position), record)
            .map_err(ordering_conflict)?;
        renumber(list);
        Ok(list[at].clone())
    }

    async fn update_lesson(
        &self,
        id: &str,
        input: &UpdateLesson,
    ) -> Result<Option<Lesson>, StoreError> {
        let mut inner = self.inner.write().await;
        let Some(lesson) = inner.find_lesson_mut(id) else {
            return Ok(None);
        };
        if let Some(title) = &input.title {
            lesson.title = title.trim().to_string();
        }
        if let Some(steps) = &input.steps {
            lesson.steps = Json(steps.clone());
        }
        lesson.updated_at = Utc::now();
        Ok(Some(lesson.clone()))
    }

    async fn delete_lesson_at(
        &self,
        character_id: &str,
        position: i32,
    ) -> Result<Option<Lesson>, StoreError> {
        let mut inner = self.inner.write().await;
        inner.require_character(character_id)?;
        let Some(list) = inner.lessons.get_mut(character_id) else {
            return Ok(None);
        };
        match lesson_order::remove_at(list, i64::from(position), character_id) {
            Ok(removed) => {
                renumber(list);
                Ok(Some(removed))
            }
            Err(_) => Ok(None),
        }
    }

    async fn set_lesson_positions(
        &self,
        character_id: &str,
        ordered_ids: &[String],
    ) -> Result<(), StoreError> {
        let mut inner = self.inner.write().await;
        inner.require_character(character_id)?;
        let list = inner.lessons.entry(character_id.to_string()).or_default();

        let current = std::mem::take(list);
        match lesson_order::reorder(current.clone(), ordered_ids, |l| l.id.as_str()) {
            Ok(mut reordered) => {
                renumber(&mut reordered);
                *list = reordered;
                Ok(())
            }
            Err(e) => {
                *list = current;
                Err(ordering_conflict(e))
            }
        }
    }
}

#[async_trait]
impl ProgressStore for MemoryStore {
    async fn find_progress(
        &self,
        user_id: &str,
        character_id: &str,
    ) -> Result<Option<Progress>, StoreError> {
        let inner = self.inner.read().await;
        Ok(inner
            .progress
            .get(&(user_id.to_string(), character_id.to_string()))
            .cloned())
    }

    async fn create_progress(
        &self,
        user_id: &str,
        character_id: &str,
    ) -> Result<Progress, StoreError> {
        let mut inner = self.inner.write().await;
        inner.require_character(character_id)?;
        let key = (user_id.to_string(), character_id.to_string());
        if inner.progress.contains_key(&key) {
            return Err(StoreError::Duplicate {
                entity: "Progress",
                id: format!("{user_id}/{character_id}"),
            });
        }
        let now = Utc::now();
        let record = Progress {
            user_id: key.0.clone(),
            character_id: key.1.clone(),
            current_lesson_index: 0,
            current_step_index: 0,
            completed: false,
            created_at: now,
            updated_at: now,
        };
        inner.progress.insert(key, record.clone());
        Ok(record)
    }

    async fn update_progress(
        &self,
        user_id: &str,
        character_id: &str,
        input: &UpdateProgress,
    ) -> Result<Option<Progress>, StoreError> {
        let mut inner = self.inner.write().await;
        let key = (user_id.to_string(), character_id.to_string());
        let Some(record) = inner.progress.get_mut(&key) else {
            return Ok(None);
        };
        record.current_lesson_index = input.current_lesson_index;
        record.current_step_index = input.current_step_index;
        record.completed = input.completed;
        record.updated_at = Utc::now();
        Ok(Some(record.clone()))
    }
}

#[async_trait]
impl Store for MemoryStore {
    async fn ping(&self) -> Result<(), StoreError> {
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use assert_matches::assert_matches;

    use super::*;

    async fn store_with_character(id: &str) -> MemoryStore {
        let store = MemoryStore::new();
        store
            .create_character(&CreateCharacter {
                id: id.to_string(),
                name: id.to_uppercase(),
                name_gurmukhi: None,
                role: None,
                persona: String::new(),
                default_expression: None,
            })
            .await
            .unwrap();
        store
    }

    fn new_lesson(id: &str, character_id: &str) -> NewLesson {
        NewLesson {
            id: id.to_string(),
            character_id: character_id.to_string(),
            title: format!("Lesson {id}"),
            steps: vec![],
        }
    }

    async fn order(store: &MemoryStore, character_id: &str) -> Vec<(String, i32)> {
        store
            .list_lessons(character_id)
            .await
            .unwrap()
            .into_iter()
            .map(|l| (l.id, l.position))
            .collect()
    }

    #[tokio::test]
    async fn insert_shifts_following_lessons() {
        let store = store_with_character("bibi").await;
        store.insert_lesson_at(&new_lesson("a", "bibi"), 0).await.unwrap();
        store.insert_lesson_at(&new_lesson("b", "bibi"), 1).await.unwrap();
        let inserted = store.insert_lesson_at(&new_lesson("c", "bibi"), 1).await.unwrap();

        assert_eq!(inserted.position, 1);
        assert_eq!(
            order(&store, "bibi").await,
            vec![("a".into(), 0), ("c".into(), 1), ("b".into(), 2)]
        );
    }

    #[tokio::test]
    async fn insert_for_unknown_character_fails() {
        let store = MemoryStore::new();
        assert_matches!(
            store.insert_lesson_at(&new_lesson("a", "ghost"), 0).await,
            Err(StoreError::NotFound { entity: "Character", .. })
        );
    }

    #[tokio::test]
    async fn duplicate_lesson_id_is_rejected() {
        let store = store_with_character("bibi").await;
        store.insert_lesson_at(&new_lesson("a", "bibi"), 0).await.unwrap();
        assert_matches!(
            store.insert_lesson_at(&new_lesson("a", "bibi"), 1).await,
            Err(StoreError::Duplicate { entity: "Lesson", .. })
        );
    }

    #[tokio::test]
    async fn delete_compacts_positions() {
        let store = store_with_character("bibi").await;
        for (i, id) in ["a", "b", "c"].iter().enumerate() {
            store
                .insert_lesson_at(&new_lesson(id, "bibi"), i as i32)
                .await
                .unwrap();
        }

        let removed = store.delete_lesson_at("bibi", 1).await.unwrap().unwrap();
        assert_eq!(removed.id, "b");
        assert_eq!(
            order(&store, "bibi").await,
            vec![("a".into(), 0), ("c".into(), 1)]
        );
        assert!(store.delete_lesson_at("bibi", 5).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn failed_reorder_leaves_list_untouched() {
        let store = store_with_character("bibi").await;
        store.insert_lesson_at(&new_lesson("a", "bibi"), 0).await.unwrap();
        store.insert_lesson_at(&new_lesson("b", "bibi"), 1).await.unwrap();

        let err = store
            .set_lesson_positions("bibi", &["b".to_string()])
            .await
            .unwrap_err();
        assert_matches!(err, StoreError::Conflict(_));
        assert_eq!(
            order(&store, "bibi").await,
            vec![("a".into(), 0), ("b".into(), 1)]
        );

        store
            .set_lesson_positions("bibi", &["b".to_string(), "a".to_string()])
            .await
            .unwrap();
        assert_eq!(
            order(&store, "bibi").await,
            vec![("b".into(), 0), ("a".into(), 1)]
        );
    }

    #[tokio::test]
    async fn deleting_character_drops_its_lessons() {
        let store = store_with_character("bibi").await;
        store.insert_lesson_at(&new_lesson("a", "bibi"), 0).await.unwrap();

        assert!(store.delete_character("bibi").await.unwrap());
        assert!(store.find_lesson("a").await.unwrap().is_none());
        assert!(!store.delete_character("bibi").await.unwrap());
    }

    #[tokio::test]
    async fn update_lesson_keeps_position() {
        let store = store_with_character("bibi").await;
        store.insert_lesson_at(&new_lesson("a", "bibi"), 0).await.unwrap();
        store.insert_lesson_at(&new_lesson("b", "bibi"), 1).await.unwrap();

        let updated = store
            .update_lesson(
                "b",
                &UpdateLesson {
                    title: Some("Numbers".into()),
                    steps: None,
                },
            )
            .await
            .unwrap()
            .unwrap();
        assert_eq!(updated.title, "Numbers");
        assert_eq!(updated.position, 1);
    }

    #[tokio::test]
    async fn progress_starts_at_zero_and_is_keyed_per_learner() {
        let store = store_with_character("bibi").await;

        let created = store.create_progress("u1", "bibi").await.unwrap();
        assert_eq!((created.current_lesson_index, created.current_step_index), (0, 0));
        assert!(!created.completed);
        assert_matches!(
            store.create_progress("u1", "bibi").await,
            Err(StoreError::Duplicate { entity: "Progress", .. })
        );
        assert_matches!(
            store.create_progress("u1", "ghost").await,
            Err(StoreError::NotFound { entity: "Character", .. })
        );

        let moved = UpdateProgress {
            current_lesson_index: 1,
            current_step_index: 2,
            completed: false,
        };
        let updated = store.update_progress("u1", "bibi", &moved).await.unwrap().unwrap();
        assert_eq!(updated.current_step_index, 2);
        assert!(store.update_progress("u2", "bibi", &moved).await.unwrap().is_none());
        assert!(store.find_progress("u2", "bibi").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn deleting_character_drops_its_progress() {
        let store = store_with_character("bibi").await;
        store.create_progress("u1", "bibi").await.unwrap();

        store.delete_character("bibi").await.unwrap();
        assert!(store.find_progress("u1", "bibi").await.unwrap().is_none());
    }
}
