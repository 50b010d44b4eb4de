use std::path::PathBuf;

use bookstock_core::error::CoreError;

/// Failures reading or writing the catalog document.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("Failed to read catalog document {}: {source}", .path.display())]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Malformed catalog document {}: {source}", .path.display())]
    Malformed {
        path: PathBuf,
        source: serde_json::Error,
    },

    #[error("Failed to encode catalog: {0}")]
    Encode(#[source] serde_json::Error),

    #[error("Failed to write catalog document {}: {source}", .path.display())]
    Write {
        path: PathBuf,
        source: std::io::Error,
    },
}

/// Error returned by repository operations: either the request was rejected
/// by domain rules or the document could not be read/written.
#[derive(Debug, thiserror::Error)]
pub enum RepoError {
    #[error(transparent)]
    Core(#[from] CoreError),

    #[error(transparent)]
    Store(#[from] StoreError),

    /// The task running a read-modify-write panicked or was cancelled.
    #[error("Catalog write task failed: {0}")]
    Task(#[from] tokio::task::JoinError),
}
