//! Error types for favorability storage.

use std::path::PathBuf;

/// Result type for store and configuration operations.
pub type FavorResult<T> = Result<T, FavorError>;

/// Errors surfaced by the favorability store.
///
/// Nothing here is retried or recovered by the store; the caller decides what
/// the user gets to see.
#[derive(Debug, thiserror::Error)]
pub enum FavorError {
    /// The backing directory or file could not be created, read or written.
    #[error("I/O failure on {}: {source}", .path.display())]
    IoFailure {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The backing document is not a JSON object of integer scores.
    #[error("Favorability data in {} is corrupt: {source}", .path.display())]
    StorageCorrupt {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    /// Invalid configuration.
    #[error("Configuration error: {0}")]
    Config(String),
}

impl FavorError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::IoFailure {
            path: path.into(),
            source,
        }
    }

    pub(crate) fn corrupt(path: impl Into<PathBuf>, source: serde_json::Error) -> Self {
        Self::StorageCorrupt {
            path: path.into(),
            source,
        }
    }

    /// Whether the error came from an unreadable document rather than the filesystem.
    pub fn is_corrupt(&self) -> bool {
        matches!(self, Self::StorageCorrupt { .. })
    }
}
