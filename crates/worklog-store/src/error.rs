//! Store error types

use std::path::PathBuf;

/// Errors raised while loading, mutating or persisting the work log
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("failed to read {}: {source}", .path.display())]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("failed to write {}: {source}", .path.display())]
    Write {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("{} is not a valid work log: {source}", .path.display())]
    Corrupt {
        path: PathBuf,
        source: serde_json::Error,
    },

    #[error("failed to encode work log: {0}")]
    Encode(#[from] serde_json::Error),

    #[error("no entry with id {0}")]
    NotFound(String),

    #[error("an entry with id {0} already exists")]
    DuplicateId(String),

    #[error("index {index} is out of range ({len} entries)")]
    IndexOutOfRange { index: usize, len: usize },

    #[error("background file task failed: {0}")]
    Task(#[from] tokio::task::JoinError),
}
