//! Repository for the `characters` table.

use sqlx::PgPool;

use crate::map_unique_violation;
use crate::models::character::{Character, CreateCharacter, UpdateCharacter};
use crate::StoreError;

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str =
    "id, name, name_gurmukhi, role, persona, default_expression, created_at, updated_at";

/// Provides CRUD operations for characters.
pub struct CharacterRepo;

impl CharacterRepo {
    /// Insert a new character, returning the created row.
    ///
    /// A taken `id` yields [`StoreError::Duplicate`].
    pub async fn create(pool: &PgPool, input: &CreateCharacter) -> Result<Character, StoreError> {
        let query = format!(
            "INSERT INTO characters (id, name, name_gurmukhi, role, persona, default_expression)
             VALUES ($1, $2, $3, $4, $5, $6)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Character>(&query)
            .bind(&input.id)
            .bind(input.name.trim())
            .bind(&input.name_gurmukhi)
            .bind(&input.role)
            .bind(&input.persona)
            .bind(input.expression())
            .fetch_one(pool)
            .await
            .map_err(|e| map_unique_violation(e, "Character", &input.id))
    }

    /// Find a character by its identifier.
    pub async fn find_by_id(pool: &PgPool, id: &str) -> Result<Option<Character>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM characters WHERE id = $1");
        sqlx::query_as::<_, Character>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// List all characters, ordered by name ascending.
    pub async fn list(pool: &PgPool) -> Result<Vec<Character>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM characters ORDER BY name ASC, id ASC");
        sqlx::query_as::<_, Character>(&query).fetch_all(pool).await
    }

    /// Update a character. Only non-`None` fields in `input` are applied.
    ///
    /// Returns `None` if no row with the given `id` exists.
    pub async fn update(
        pool: &PgPool,
        id: &str,
        input: &UpdateCharacter,
    ) -> Result<Option<Character>, sqlx::Error> {
        let query = format!(
            "UPDATE characters SET
                name = COALESCE($2, name),
                name_gurmukhi = COALESCE($3, name_gurmukhi),
                role = COALESCE($4, role),
                persona = COALESCE($5, persona),
                default_expression = COALESCE($6, default_expression)
             WHERE id = $1
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Character>(&query)
            .bind(id)
            .bind(input.name.as_deref().map(str::trim))
            .bind(&input.name_gurmukhi)
            .bind(&input.role)
            .bind(&input.persona)
            .bind(input.default_expression.map(|e| e.as_str()))
            .fetch_optional(pool)
            .await
    }

    /// Delete a character (and, via `ON DELETE CASCADE`, its lessons).
    /// Returns `true` if a row was removed.
    pub async fn delete(pool: &PgPool, id: &str) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM characters WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}
