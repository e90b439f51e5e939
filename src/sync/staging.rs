use log::{debug, info, warn};
use std::path::{Path, PathBuf};
use tokio::fs;
use uuid::Uuid;

use crate::sync::errors::SyncError;

/// Local directory holding transient copies of files being transferred
#[derive(Debug, Clone)]
pub struct StagingArea {
    dir: PathBuf,
}

/// A downloaded file waiting to be uploaded
#[derive(Debug)]
pub struct StagedFile {
    pub path: PathBuf,
    pub name: String,
    pub content_type: String,
    pub bytes: u64,
}

impl StagingArea {
    /// Use `dir` for staging, creating it if necessary
    pub async fn new(dir: &Path) -> Result<Self, SyncError> {
        if !dir.exists() {
            fs::create_dir_all(dir).await.map_err(|source| SyncError::Staging {
                path: dir.to_path_buf(),
                source,
            })?;
            info!("Created staging directory: {}", dir.display());
        }
        Ok(Self {
            dir: dir.to_path_buf(),
        })
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Unique path for a file named `name`. Same-named files never share a path.
    pub fn path_for(&self, name: &str) -> PathBuf {
        let file_name: String = name
            .chars()
            .map(|c| if c == '/' || c == '\\' { '_' } else { c })
            .collect();
        self.dir.join(format!("{}-{}", Uuid::new_v4(), file_name))
    }

    /// Write `data` to a fresh staging file. A partial write is removed.
    pub async fn stage(&self, name: &str, content_type: &str, data: &[u8]) -> Result<StagedFile, SyncError> {
        let path = self.path_for(name);
        if let Err(source) = fs::write(&path, data).await {
            if let Err(e) = fs::remove_file(&path).await {
                debug!("No partial staging file removed at {}: {}", path.display(), e);
            }
            return Err(SyncError::Staging { path, source });
        }
        debug!("Staged {} ({} bytes) at {}", name, data.len(), path.display());
        Ok(StagedFile {
            path,
            name: name.to_string(),
            content_type: content_type.to_string(),
            bytes: data.len() as u64,
        })
    }
}

impl StagedFile {
    /// Remove the staging copy. Failure only leaves litter behind, so it is logged.
    pub async fn release(self) {
        if let Err(e) = fs::remove_file(&self.path).await {
            warn!("Failed to remove staging file {}: {}", self.path.display(), e);
        }
    }
}
