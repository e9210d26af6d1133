//! Error types for the roster.

use crate::types::RecordId;
use thiserror::Error;

/// Main error type for roster operations.
#[derive(Debug, Error)]
pub enum RosterError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Index {index} out of range (len {len})")]
    IndexOutOfRange { index: usize, len: usize },

    #[error("Stale index {index}: expected record {expected}, found {found:?}")]
    StaleIndex {
        index: usize,
        expected: RecordId,
        found: Option<RecordId>,
    },

    #[error("Record not found: {0}")]
    RecordNotFound(RecordId),

    #[error("Invalid page: {0} (pages start at 1)")]
    InvalidPage(usize),

    #[error("Corrupt persisted data: {0}")]
    CorruptPersistedData(String),

    #[error("Serialization error: {0}")]
    Serialization(String),

    #[error("Roster is locked by another process")]
    Locked,

    #[error("Roster not initialized")]
    NotInitialized,
}

impl From<serde_json::Error> for RosterError {
    fn from(e: serde_json::Error) -> Self {
        RosterError::Serialization(e.to_string())
    }
}

/// Result type for roster operations.
pub type Result<T> = std::result::Result<T, RosterError>;
