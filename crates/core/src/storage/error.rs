//! Error types for the storage module.

use std::path::PathBuf;
use thiserror::Error;

/// Errors that can occur while persisting images and records.
#[derive(Debug, Error)]
pub enum StorageError {
    /// Failed to create the storage directory.
    #[error("Failed to create directory: {path}")]
    DirectoryCreationFailed {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Failed to write a file.
    #[error("Failed to write {path}")]
    WriteFailed {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Failed to move a temp file over its target.
    #[error("Failed to move file from {source} to {destination}")]
    MoveFailed {
        source: PathBuf,
        destination: PathBuf,
        #[source]
        error: std::io::Error,
    },

    /// Failed to copy the current image into the archive.
    #[error("Failed to archive {path}")]
    ArchiveFailed {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// There is no current image to operate on.
    #[error("No current image at {path}")]
    NoCurrentImage { path: PathBuf },

    /// Failed to encode a record.
    #[error("Failed to serialize record: {0}")]
    Serialization(#[from] serde_json::Error),

    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl StorageError {
    pub fn write_failed(path: PathBuf, source: std::io::Error) -> Self {
        Self::WriteFailed { path, source }
    }

    pub fn move_failed(source: PathBuf, destination: PathBuf, error: std::io::Error) -> Self {
        Self::MoveFailed {
            source,
            destination,
            error,
        }
    }
}
