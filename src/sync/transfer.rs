//! Moving one file's bytes from the source tree into the bucket

use crate::drive_service::{DownloadProgress, SourceTree};
use crate::storage_service::{ObjectStore, PutOutcome};
use crate::sync::errors::SyncError;
use crate::sync::staging::{StagedFile, StagingArea};
use log::{debug, info};
use std::sync::atomic::{AtomicU8, Ordering};
use std::sync::Arc;

pub struct Transferer {
    source: Arc<dyn SourceTree>,
    store: Arc<dyn ObjectStore>,
    staging: StagingArea,
}

impl Transferer {
    pub fn new(source: Arc<dyn SourceTree>, store: Arc<dyn ObjectStore>, staging: StagingArea) -> Self {
        Self {
            source,
            store,
            staging,
        }
    }

    /// Download a file into the staging area
    pub async fn fetch(&self, file_id: &str, name: &str, content_type: &str) -> Result<StagedFile, SyncError> {
        // Logged at whole-percent steps only
        let last_percent = AtomicU8::new(u8::MAX);
        let on_progress = |progress: DownloadProgress| match progress.percent() {
            Some(percent) => {
                if last_percent.swap(percent, Ordering::Relaxed) != percent {
                    info!("Downloading {} {}%", name, percent);
                }
            }
            None => debug!("Downloading {} {} bytes", name, progress.bytes_received),
        };

        let data = self
            .source
            .download_content(file_id, &on_progress)
            .await
            .map_err(|source| SyncError::Download {
                file_id: file_id.to_string(),
                name: name.to_string(),
                source,
            })?;
        info!("Downloaded {} from Drive", name);

        self.staging.stage(name, content_type, &data).await
    }

    /// Upload a staged file under `key`
    pub async fn store(&self, staged: &StagedFile, bucket: &str, key: &str) -> Result<PutOutcome, SyncError> {
        self.store
            .put_object(bucket, key, &staged.path, &staged.content_type)
            .await
            .map_err(|source| SyncError::Upload {
                key: key.to_string(),
                source,
            })
    }
}
