use crate::model::EntityKind;

pub type Result<T> = std::result::Result<T, StoreError>;

/// Failures reported by a [`CatalogStore`](crate::store::CatalogStore).
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("{kind} not found: {id}")]
    NotFound { kind: EntityKind, id: String },

    #[error("store unavailable: {0}")]
    Unavailable(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}
