//! Repository for the `lessons` table.
//!
//! Every method that moves positions runs in one transaction and first
//! takes a row lock on the owning character (`SELECT ... FOR UPDATE`), so
//! concurrent renumbering of the same list serialises even across
//! processes while other characters' lists stay independent.

use sqlx::types::Json;
use sqlx::{PgConnection, PgPool};

use crate::map_unique_violation;
use crate::models::lesson::{Lesson, NewLesson, UpdateLesson};
use crate::StoreError;

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str = "id, character_id, position, title, steps, created_at, updated_at";

/// Provides CRUD and position-aware operations for lessons.
pub struct LessonRepo;

impl LessonRepo {
    /// List every lesson, grouped by character and ordered by position.
    pub async fn list_all(pool: &PgPool) -> Result<Vec<Lesson>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM lessons ORDER BY character_id, position");
        sqlx::query_as::<_, Lesson>(&query).fetch_all(pool).await
    }

    /// List one character's lessons ordered by position.
    pub async fn list_by_character(
        pool: &PgPool,
        character_id: &str,
    ) -> Result<Vec<Lesson>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM lessons WHERE character_id = $1 ORDER BY position ASC"
        );
        sqlx::query_as::<_, Lesson>(&query)
            .bind(character_id)
            .fetch_all(pool)
            .await
    }

    /// Find a lesson by its identifier.
    pub async fn find_by_id(pool: &PgPool, id: &str) -> Result<Option<Lesson>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM lessons WHERE id = $1");
        sqlx::query_as::<_, Lesson>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// Insert `lesson` at `position`, shifting every lesson at or after it
    /// down by one.
    pub async fn insert_at(
        pool: &PgPool,
        lesson: &NewLesson,
        position: i32,
    ) -> Result<Lesson, StoreError> {
        let mut tx = pool.begin().await?;
        let len = lock_character(&mut tx, &lesson.character_id).await?;
        if i64::from(position) > len {
            return Err(StoreError::Conflict(format!(
                "position {position} is past the end of a {len}-lesson list"
            )));
        }

        sqlx::query(
            "UPDATE lessons SET position = position + 1
             WHERE character_id = $1 AND position >= $2",
        )
        .bind(&lesson.character_id)
        .bind(position)
        .execute(&mut *tx)
        .await?;

        let query = format!(
            "INSERT INTO lessons (id, character_id, position, title, steps)
             VALUES ($1, $2, $3, $4, $5)
             RETURNING {COLUMNS}"
        );
        let created = sqlx::query_as::<_, Lesson>(&query)
            .bind(&lesson.id)
            .bind(&lesson.character_id)
            .bind(position)
            .bind(&lesson.title)
            .bind(Json(&lesson.steps))
            .fetch_one(&mut *tx)
            .await
            .map_err(|e| map_unique_violation(e, "Lesson", &lesson.id))?;

        tx.commit()
            .await
            .map_err(|e| map_unique_violation(e, "Lesson", &lesson.id))?;
        Ok(created)
    }

    /// Update a lesson's title and/or steps. Never touches positions.
    pub async fn update(
        pool: &PgPool,
        id: &str,
        input: &UpdateLesson,
    ) -> Result<Option<Lesson>, sqlx::Error> {
        let query = format!(
            "UPDATE lessons SET
                title = COALESCE($2, title),
                steps = COALESCE($3, steps)
             WHERE id = $1
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Lesson>(&query)
            .bind(id)
            .bind(input.title.as_deref().map(str::trim))
            .bind(input.steps.as_ref().map(Json))
            .fetch_optional(pool)
            .await
    }

    /// Remove the lesson at `position` and close the gap behind it.
    ///
    /// Returns `None` if the character has no lesson at that position.
    pub async fn delete_at(
        pool: &PgPool,
        character_id: &str,
        position: i32,
    ) -> Result<Option<Lesson>, StoreError> {
        let mut tx = pool.begin().await?;
        lock_character(&mut tx, character_id).await?;

        let query = format!(
            "DELETE FROM lessons WHERE character_id = $1 AND position = $2 RETURNING {COLUMNS}"
        );
        let Some(removed) = sqlx::query_as::<_, Lesson>(&query)
            .bind(character_id)
            .bind(position)
            .fetch_optional(&mut *tx)
            .await?
        else {
            return Ok(None);
        };

        sqlx::query(
            "UPDATE lessons SET position = position - 1
             WHERE character_id = $1 AND position > $2",
        )
        .bind(character_id)
        .bind(position)
        .execute(&mut *tx)
        .await?;

        tx.commit().await?;
        Ok(Some(removed))
    }

    /// Rewrite the positions of a character's lessons in one statement.
    ///
    /// `ordered_ids[i]` receives position `i`. Every id must belong to the
    /// character and the list must cover all of its lessons; otherwise the
    /// transaction is rolled back.
    pub async fn set_positions(
        pool: &PgPool,
        character_id: &str,
        ordered_ids: &[String],
    ) -> Result<(), StoreError> {
        let mut tx = pool.begin().await?;
        let len = lock_character(&mut tx, character_id).await?;
        if len != ordered_ids.len() as i64 {
            return Err(StoreError::Conflict(format!(
                "reorder names {} lessons but the character has {len}",
                ordered_ids.len()
            )));
        }

        let positions: Vec<i32> = (0..ordered_ids.len() as i32).collect();
        let result = sqlx::query(
            "UPDATE lessons AS l SET position = v.position
             FROM UNNEST($2::text[], $3::int[]) AS v(id, position)
             WHERE l.character_id = $1 AND l.id = v.id",
        )
        .bind(character_id)
        .bind(ordered_ids)
        .bind(&positions)
        .execute(&mut *tx)
        .await?;

        if result.rows_affected() != ordered_ids.len() as u64 {
            // Dropping `tx` rolls the partial update back.
            return Err(StoreError::Conflict(
                "reorder names lessons that are not in this character's list".into(),
            ));
        }

        tx.commit()
            .await
            .map_err(|e| map_unique_violation(e, "Lesson", character_id))?;
        Ok(())
    }
}

/// Lock the character row for the rest of the transaction and return its
/// current lesson count.
async fn lock_character(conn: &mut PgConnection, character_id: &str) -> Result<i64, StoreError> {
    let locked: Option<String> =
        sqlx::query_scalar("SELECT id FROM characters WHERE id = $1 FOR UPDATE")
            .bind(character_id)
            .fetch_optional(&mut *conn)
            .await?;
    if locked.is_none() {
        return Err(StoreError::NotFound {
            entity: "Character",
            id: character_id.to_string(),
        });
    }

    let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM lessons WHERE character_id = $1")
        .bind(character_id)
        .fetch_one(&mut *conn)
        .await?;
    Ok(count)
}
