use crate::types::EntityId;

#[derive(Debug, thiserror::Error)]
pub enum CoreError {
    #[error("Entity not found: {entity} with id {id}")]
    NotFound { entity: &'static str, id: EntityId },

    #[error("Validation failed: {0}")]
    Validation(String),

    #[error("Invalid position {position}: must be within 0..={len}")]
    InvalidPosition { position: i64, len: usize },

    #[error("Invalid reorder: {0}")]
    InvalidReorder(String),

    #[error("Conflict: {0}")]
    Conflict(String),

    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    #[error("Language gateway timed out after {0} seconds")]
    GatewayTimeout(u64),

    #[error("Language gateway error: {0}")]
    Gateway(String),

    #[error("Internal error: {0}")]
    Internal(String),
}
