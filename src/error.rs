//! Error types for timestamp reconciliation.

use std::path::PathBuf;
use thiserror::Error;

/// Manifest persistence errors
#[derive(Debug, Error)]
pub enum ManifestError {
    #[error("Failed to read manifest {path:?}: {source}")]
    Unreadable {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Failed to parse manifest {path:?}: {source}")]
    Malformed {
        path: PathBuf,
        source: serde_json::Error,
    },

    #[error("Failed to write manifest {path:?}: {source}")]
    Write {
        path: PathBuf,
        source: std::io::Error,
    },
}

/// Reconciliation run errors
///
/// Every variant is fatal: a condition either resolves silently (a restored
/// timestamp) or aborts the run before the new manifest is saved. There is no
/// partial-success mode.
#[derive(Debug, Error)]
pub enum ReconcileError {
    #[error("Configuration error: {0}")]
    Configuration(String),

    #[error("Manifest error: {0}")]
    Manifest(#[from] ManifestError),

    #[error("Failed to walk tree: {0}")]
    Walk(#[from] walkdir::Error),

    #[error("Failed to read file {path:?}: {source}")]
    UnreadableFile {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Failed to read symlink {path:?}: {source}")]
    UnreadableLink {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Failed to read directory {path:?}: {source}")]
    UnreadableDirectory {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Failed to set timestamps on {path:?}: {source}")]
    TimestampWrite {
        path: PathBuf,
        source: std::io::Error,
    },
}
