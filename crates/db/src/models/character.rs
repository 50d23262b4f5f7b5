//! Character entity model and DTOs.

use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use tutor_core::chat::{Expression, Persona};
use tutor_core::error::CoreError;
use tutor_core::types::{EntityId, Timestamp};

/// Maximum length of a character identifier.
pub const MAX_CHARACTER_ID_LEN: usize = 64;

/// A character row from the `characters` table.
#[derive(Debug, Clone, PartialEq, FromRow, Serialize, Deserialize)]
pub struct Character {
    pub id: EntityId,
    pub name: String,
    pub name_gurmukhi: Option<String>,
    pub role: Option<String>,
    /// System-prompt text describing how the character talks and behaves.
    pub persona: String,
    pub default_expression: String,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

impl Character {
    /// The persona fields used to build a chat prompt.
    pub fn persona(&self) -> Persona<'_> {
        Persona {
            name: &self.name,
            name_gurmukhi: self.name_gurmukhi.as_deref(),
            role: self.role.as_deref(),
            persona: &self.persona,
        }
    }
}

/// DTO for creating a new character.
#[derive(Debug, Clone, Deserialize)]
pub struct CreateCharacter {
    pub id: EntityId,
    pub name: String,
    pub name_gurmukhi: Option<String>,
    pub role: Option<String>,
    #[serde(default)]
    pub persona: String,
    /// Defaults to `neutral` if omitted.
    pub default_expression: Option<Expression>,
}

impl CreateCharacter {
    pub fn validate(&self) -> Result<(), CoreError> {
        validate_character_id(&self.id)?;
        validate_name(&self.name)
    }

    pub fn expression(&self) -> &'static str {
        self.default_expression.unwrap_or_default().as_str()
    }
}

/// DTO for updating an existing character. All fields are optional.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct UpdateCharacter {
    pub name: Option<String>,
    pub name_gurmukhi: Option<String>,
    pub role: Option<String>,
    pub persona: Option<String>,
    pub default_expression: Option<Expression>,
}

impl UpdateCharacter {
    pub fn validate(&self) -> Result<(), CoreError> {
        match &self.name {
            Some(name) => validate_name(name),
            None => Ok(()),
        }
    }
}

/// Identifiers are URL slugs: lowercase ASCII letters, digits, `-` and `_`.
pub fn validate_character_id(id: &str) -> Result<(), CoreError> {
    if id.is_empty() || id.len() > MAX_CHARACTER_ID_LEN {
        return Err(CoreError::Validation(format!(
            "character id must be 1..={MAX_CHARACTER_ID_LEN} characters"
        )));
    }
    if !id
        .chars()
        .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '-' || c == '_')
    {
        return Err(CoreError::Validation(format!(
            "character id '{id}' may only contain a-z, 0-9, '-' and '_'"
        )));
    }
    Ok(())
}

fn validate_name(name: &str) -> Result<(), CoreError> {
    if name.trim().is_empty() {
        return Err(CoreError::Validation("character name must not be empty".into()));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn slug_ids_are_accepted() {
        assert!(validate_character_id("shopkeeper").is_ok());
        assert!(validate_character_id("chacha_ji-2").is_ok());
    }

    #[test]
    fn bad_ids_are_rejected() {
        assert!(validate_character_id("").is_err());
        assert!(validate_character_id("Bibi").is_err());
        assert!(validate_character_id("has space").is_err());
        assert!(validate_character_id(&"a".repeat(MAX_CHARACTER_ID_LEN + 1)).is_err());
    }

    #[test]
    fn create_defaults_expression_to_neutral() {
        let input: CreateCharacter =
            serde_json::from_value(serde_json::json!({ "id": "bibi", "name": "Bibi" })).unwrap();
        assert_eq!(input.expression(), "neutral");
        assert!(input.persona.is_empty());
        assert!(input.validate().is_ok());
    }

    #[test]
    fn update_rejects_blank_name() {
        let input = UpdateCharacter {
            name: Some("  ".into()),
            ..Default::default()
        };
        assert!(input.validate().is_err());
    }
}
