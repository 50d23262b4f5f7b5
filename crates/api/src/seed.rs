//! Loading of bundled characters and lessons into a store.
//!
//! Layout of a seed directory:
//!
//! ```text
//! characters.json          [ {id, name, name_gurmukhi?, role?, persona, default_expression?}, ... ]
//! lessons/<anything>.json  { "character_id": "...", "lessons": [ {id?, title, steps}, ... ] }
//! ```
//!
//! Seeding is idempotent: existing characters are left alone and lessons
//! are only added for characters that have none yet.

use std::path::{Path, PathBuf};

use anyhow::{bail, Context};
use serde::Deserialize;
use tutor_db::models::character::CreateCharacter;
use tutor_db::models::lesson::CreateLesson;
use tutor_db::Store;

#[derive(Debug, Deserialize)]
struct LessonFile {
    character_id: String,
    lessons: Vec<CreateLesson>,
}

/// What a seeding run changed.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct SeedReport {
    pub characters_created: usize,
    pub characters_skipped: usize,
    pub lessons_created: usize,
    pub lesson_files_skipped: usize,
}

/// Seed `store` from the directory at `dir`.
pub async fn seed_from_dir(store: &dyn Store, dir: &Path) -> anyhow::Result<SeedReport> {
    let mut report = SeedReport::default();

    let characters_path = dir.join("characters.json");
    let raw = tokio::fs::read_to_string(&characters_path)
        .await
        .with_context(|| format!("reading {}", characters_path.display()))?;
    let characters: Vec<CreateCharacter> = serde_json::from_str(&raw)
        .with_context(|| format!("parsing {}", characters_path.display()))?;

    for character in &characters {
        character
            .validate()
            .with_context(|| format!("character '{}'", character.id))?;
        if store.find_character(&character.id).await?.is_some() {
            report.characters_skipped += 1;
            continue;
        }
        store.create_character(character).await?;
        tracing::info!(character_id = %character.id, "Seeded character");
        report.characters_created += 1;
    }

    for path in lesson_files(&dir.join("lessons")).await? {
        let raw = tokio::fs::read_to_string(&path)
            .await
            .with_context(|| format!("reading {}", path.display()))?;
        let file: LessonFile =
            serde_json::from_str(&raw).with_context(|| format!("parsing {}", path.display()))?;

        if store.find_character(&file.character_id).await?.is_none() {
            tracing::warn!(
                character_id = %file.character_id,
                file = %path.display(),
                "Skipping lessons for unknown character"
            );
            report.lesson_files_skipped += 1;
            continue;
        }
        if !store.list_lessons(&file.character_id).await?.is_empty() {
            report.lesson_files_skipped += 1;
            continue;
        }

        // The whole file is checked before anything is stored, so a bad
        // lesson never leaves the character half-seeded.
        let mut lessons = Vec::with_capacity(file.lessons.len());
        for (index, mut lesson) in file.lessons.into_iter().enumerate() {
            lesson.character_id = file.character_id.clone();
            lesson
                .validate()
                .with_context(|| format!("{} lesson {index}", path.display()))?;
            let Ok(position) = i32::try_from(index) else {
                bail!("{} holds too many lessons", path.display());
            };
            lessons.push((position, lesson.into_new()));
        }

        for (position, new) in &lessons {
            store.insert_lesson_at(new, *position).await?;
            report.lessons_created += 1;
        }
        tracing::info!(character_id = %file.character_id, "Seeded lessons");
    }

    Ok(report)
}

/// `*.json` files under `dir`, sorted by name. A missing directory is empty.
async fn lesson_files(dir: &Path) -> anyhow::Result<Vec<PathBuf>> {
    let mut entries = match tokio::fs::read_dir(dir).await {
        Ok(entries) => entries,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(Vec::new()),
        Err(e) => return Err(e).with_context(|| format!("listing {}", dir.display())),
    };

    let mut files = Vec::new();
    while let Some(entry) = entries.next_entry().await? {
        let path = entry.path();
        if path.extension().is_some_and(|ext| ext == "json") {
            files.push(path);
        }
    }
    files.sort();
    Ok(files)
}
