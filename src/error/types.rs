use thiserror::Error;

use crate::persistence::StoreError;

/// Unified result type for the room structure crate.
pub type Result<T> = std::result::Result<T, StructureError>;

/// Errors surfaced by the room structure engine.
#[derive(Debug, Error)]
pub enum StructureError {
    #[error(transparent)]
    Store(#[from] StoreError),
    #[error("malformed room document: {0}")]
    Serde(#[from] serde_json::Error),
    #[error("room `{0}` not found")]
    RoomNotFound(usize),
    #[error("component `{0}` not found")]
    ComponentNotFound(String),
    #[error("nesting exceeds {limit} levels")]
    NestingTooDeep { limit: usize },
}
