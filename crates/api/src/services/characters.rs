//! Character reads for the public API and CRUD for the admin panel.

use std::sync::Arc;

use tutor_core::error::CoreError;
use tutor_db::models::character::{Character, CreateCharacter, UpdateCharacter};
use tutor_db::Store;

use crate::error::AppResult;

pub struct CharacterService {
    store: Arc<dyn Store>,
}

impl CharacterService {
    pub fn new(store: Arc<dyn Store>) -> Self {
        Self { store }
    }

    pub async fn list(&self) -> AppResult<Vec<Character>> {
        Ok(self.store.list_characters().await?)
    }

    pub async fn get(&self, id: &str) -> AppResult<Character> {
        self.store
            .find_character(id)
            .await?
            .ok_or_else(|| not_found(id).into())
    }

    pub async fn create(&self, input: &CreateCharacter) -> AppResult<Character> {
        input.validate()?;
        let character = self.store.create_character(input).await?;
        tracing::info!(character_id = %character.id, "Character created");
        Ok(character)
    }

    pub async fn update(&self, id: &str, input: &UpdateCharacter) -> AppResult<Character> {
        input.validate()?;
        let character = self
            .store
            .update_character(id, input)
            .await?
            .ok_or_else(|| not_found(id))?;
        tracing::info!(character_id = %id, "Character updated");
        Ok(character)
    }

    /// Delete a character and, with it, its lessons.
    pub async fn delete(&self, id: &str) -> AppResult<()> {
        if !self.store.delete_character(id).await? {
            return Err(not_found(id).into());
        }
        tracing::info!(character_id = %id, "Character deleted");
        Ok(())
    }
}

fn not_found(id: &str) -> CoreError {
    CoreError::NotFound {
        entity: "Character",
        id: id.to_string(),
    }
}
