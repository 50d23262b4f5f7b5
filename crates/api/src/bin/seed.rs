//! Load the bundled characters and lessons into PostgreSQL.
//!
//! Reads `DATABASE_URL` and `SEED_DIR` (default `./seed`).

use std::path::PathBuf;

use anyhow::Context;
use tutor_api::config::LogFormat;
use tutor_api::seed::seed_from_dir;
use tutor_api::telemetry::init_tracing;
use tutor_db::PgStore;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    init_tracing(LogFormat::Pretty, "tutor_api=info,tutor_seed=info");

    let database_url = std::env::var("DATABASE_URL").context("DATABASE_URL must be set")?;
    let seed_dir = PathBuf::from(std::env::var("SEED_DIR").unwrap_or_else(|_| "./seed".into()));

    let pool = tutor_db::create_pool(&database_url)
        .await
        .context("connecting to database")?;
    tutor_db::run_migrations(&pool)
        .await
        .context("running migrations")?;

    let store = PgStore::new(pool);
    let report = seed_from_dir(&store, &seed_dir).await?;
    tracing::info!(
        characters_created = report.characters_created,
        characters_skipped = report.characters_skipped,
        lessons_created = report.lessons_created,
        lesson_files_skipped = report.lesson_files_skipped,
        dir = %seed_dir.display(),
        "Seeding complete"
    );
    Ok(())
}
