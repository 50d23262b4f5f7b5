//! Repository layer.
//!
//! Each repository is a zero-sized struct providing async methods that
//! accept `&PgPool` as the first argument.

pub mod character_repo;
pub mod lesson_repo;
pub mod progress_repo;

pub use character_repo::CharacterRepo;
pub use lesson_repo::LessonRepo;
pub use progress_repo::ProgressRepo;
