//! Failure taxonomy of a sync run.

use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum SyncError {
    #[error("Failed to list folder {folder_id}: {source:#}")]
    Listing {
        folder_id: String,
        #[source]
        source: anyhow::Error,
    },

    #[error("Failed to check whether {key} exists: {source:#}")]
    ExistenceCheck {
        key: String,
        #[source]
        source: anyhow::Error,
    },

    #[error("Failed to download {name} ({file_id}): {source:#}")]
    Download {
        file_id: String,
        name: String,
        #[source]
        source: anyhow::Error,
    },

    #[error("Failed to write staging file {}: {source}", path.display())]
    Staging {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to upload {key}: {source:#}")]
    Upload {
        key: String,
        #[source]
        source: anyhow::Error,
    },

    #[error("Folder {folder_id} appears twice on the path {path}")]
    Structural { folder_id: String, path: String },
}

impl SyncError {
    /// Recoverable errors are recorded against their key and the walk goes on.
    /// Everything else aborts the run.
    pub fn is_recoverable(&self) -> bool {
        matches!(self, SyncError::Upload { .. })
    }
}
