//! Document store for characters, lessons and learner progress.
//!
//! - [`models`] -- row structs and create/update DTOs.
//! - [`repositories`] -- zero-sized PostgreSQL repositories.
//! - [`store`] -- the narrow [`store::Store`] trait services depend on, with
//!   the PostgreSQL implementation.
//! - [`memory`] -- an in-process implementation of the same trait.

use sqlx::postgres::PgPoolOptions;

pub mod memory;
pub mod models;
pub mod repositories;
pub mod store;

pub use memory::MemoryStore;
pub use store::{CharacterStore, LessonStore, PgStore, ProgressStore, Store};

pub type DbPool = sqlx::PgPool;

/// Errors raised by any [`Store`] implementation.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// An error from the PostgreSQL driver.
    #[error(transparent)]
    Sqlx(#[from] sqlx::Error),

    /// A row with the same identifier already exists.
    #[error("{entity} with id {id} already exists")]
    Duplicate { entity: &'static str, id: String },

    /// A row required by the operation (usually the parent character) is missing.
    #[error("{entity} with id {id} not found")]
    NotFound { entity: &'static str, id: String },

    /// The stored data no longer matches what the caller validated against.
    #[error("Conflicting concurrent change: {0}")]
    Conflict(String),
}

/// Create a connection pool from a database URL.
pub async fn create_pool(database_url: &str) -> Result<DbPool, sqlx::Error> {
    PgPoolOptions::new()
        .max_connections(20)
        .connect(database_url)
        .await
}

/// Round-trip a trivial query to confirm the database is reachable.
pub async fn health_check(pool: &DbPool) -> Result<(), sqlx::Error> {
    sqlx::query("SELECT 1").execute(pool).await?;
    Ok(())
}

/// Apply the embedded migrations in `crates/db/migrations`.
pub async fn run_migrations(pool: &DbPool) -> Result<(), sqlx::migrate::MigrateError> {
    sqlx::migrate!("./migrations").run(pool).await
}

/// Map a PostgreSQL unique violation (SQLSTATE 23505) on a primary key to
/// [`StoreError::Duplicate`]; leave every other error untouched.
pub(crate) fn map_unique_violation(err: sqlx::Error, entity: &'static str, id: &str) -> StoreError {
    if let sqlx::Error::Database(db_err) = &err {
        if db_err.code().as_deref() == Some("23505") {
            let constraint = db_err.constraint().unwrap_or_default();
            if constraint.ends_with("_pkey") {
                return StoreError::Duplicate {
                    entity,
                    id: id.to_string(),
                };
            }
            return StoreError::Conflict(format!("unique constraint {constraint} violated"));
        }
    }
    StoreError::Sqlx(err)
}
