/// Characters and lessons are keyed by stable string identifiers
/// (e.g. `"shopkeeper"`), not database sequences.
pub type EntityId = String;

/// All timestamps are UTC.
pub type Timestamp = chrono::DateTime<chrono::Utc>;

/// Generate a fresh lesson identifier (time-ordered UUIDv7).
pub fn new_lesson_id() -> EntityId {
    uuid::Uuid::now_v7().to_string()
}
