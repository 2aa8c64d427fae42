//! Error types for history and saved-query storage

use thiserror::Error;
use uuid::Uuid;

#[derive(Error, Debug)]
pub enum HistoryError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("History record not found: {0}")]
    NotFound(Uuid),

    #[error("Saved query not found: {0}")]
    SavedNotFound(String),

    #[error("A saved query named '{0}' already exists")]
    DuplicateName(String),

    #[error("Invalid saved query name: {0:?}")]
    InvalidName(String),
}
