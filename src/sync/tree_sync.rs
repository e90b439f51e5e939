//! Recursive mirror of a source folder tree into the bucket

use crate::drive_service::{SourceNode, SourceTree};
use crate::storage_service::{ObjectStore, PutOutcome};
use crate::sync::errors::SyncError;
use crate::sync::report::{LeafOutcome, RunReport, TargetReport};
use crate::sync::staging::StagingArea;
use crate::sync::target::{destination_key, SyncTarget};
use crate::sync::transfer::Transferer;
use log::{debug, error, info};
use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;

type WalkFuture<'a> = Pin<Box<dyn Future<Output = Result<(), SyncError>> + Send + 'a>>;

/// Walks source folders depth-first and copies every file whose key is
/// not yet taken in the bucket. Existing objects are never overwritten.
pub struct TreeSync {
    source: Arc<dyn SourceTree>,
    store: Arc<dyn ObjectStore>,
    bucket: String,
    transferer: Transferer,
}

impl TreeSync {
    pub fn new(
        source: Arc<dyn SourceTree>,
        store: Arc<dyn ObjectStore>,
        bucket: &str,
        staging: StagingArea,
    ) -> Self {
        let transferer = Transferer::new(source.clone(), store.clone(), staging);
        Self {
            source,
            store,
            bucket: bucket.to_string(),
            transferer,
        }
    }

    /// Sync every target in order. The first fatal error aborts the run.
    pub async fn run(&self, targets: &[SyncTarget]) -> Result<RunReport, SyncError> {
        let mut run = RunReport::start();
        for target in targets {
            info!(
                "Syncing folder {} into gs://{}/{}",
                target.folder_id, self.bucket, target.prefix
            );
            let report = self.sync(&target.folder_id, &target.prefix).await?;
            info!("Finished {}", report);
            run.targets.push(report);
        }
        run.finish();
        Ok(run)
    }

    /// Ensure every file under `folder_id` exists in the bucket below `dest_prefix`
    pub async fn sync(&self, folder_id: &str, dest_prefix: &str) -> Result<TargetReport, SyncError> {
        let mut report = TargetReport::new(dest_prefix);
        let mut ancestors = Vec::new();
        self.walk_folder(folder_id, dest_prefix, &mut ancestors, &mut report)
            .await?;
        Ok(report)
    }

    fn walk_folder<'a>(
        &'a self,
        folder_id: &'a str,
        dest_prefix: &'a str,
        ancestors: &'a mut Vec<String>,
        report: &'a mut TargetReport,
    ) -> WalkFuture<'a> {
        Box::pin(async move {
            if ancestors.iter().any(|id| id == folder_id) {
                return Err(SyncError::Structural {
                    folder_id: folder_id.to_string(),
                    path: dest_prefix.to_string(),
                });
            }

            let children = self
                .source
                .list_children(folder_id)
                .await
                .map_err(|source| SyncError::Listing {
                    folder_id: folder_id.to_string(),
                    source,
                })?;
            report.folders_visited += 1;
            debug!("{}: {} children", dest_prefix, children.len());

            ancestors.push(folder_id.to_string());
            for child in children {
                let key = destination_key(dest_prefix, child.name());
                match child {
                    SourceNode::Folder { id, .. } => {
                        self.walk_folder(&id, &key, ancestors, report).await?;
                    }
                    SourceNode::File { id, name, mime_type } => {
                        match self.sync_file(&id, &name, &mime_type, &key).await {
                            Ok(outcome) => report.record(outcome),
                            Err(e) if e.is_recoverable() => {
                                error!("{}", e);
                                report.record_failure(&key, &e);
                            }
                            Err(e) => return Err(e),
                        }
                    }
                }
            }
            ancestors.pop();
            Ok(())
        })
    }

    /// Existence-gated transfer of a single file
    async fn sync_file(
        &self,
        file_id: &str,
        name: &str,
        content_type: &str,
        key: &str,
    ) -> Result<LeafOutcome, SyncError> {
        let exists = self
            .store
            .object_exists(&self.bucket, key)
            .await
            .map_err(|source| SyncError::ExistenceCheck {
                key: key.to_string(),
                source,
            })?;
        if exists {
            info!("{} already exists in {}, skipping", key, self.bucket);
            return Ok(LeafOutcome::Skipped {
                key: key.to_string(),
            });
        }

        let staged = self.transferer.fetch(file_id, name, content_type).await?;
        let stored = self.transferer.store(&staged, &self.bucket, key).await;
        staged.release().await;

        match stored? {
            PutOutcome::Created { bytes } => {
                info!("{} uploaded to {}", key, self.bucket);
                Ok(LeafOutcome::Transferred {
                    key: key.to_string(),
                    bytes,
                })
            }
            PutOutcome::AlreadyExists => {
                info!("{} appeared in {} during transfer, skipping", key, self.bucket);
                Ok(LeafOutcome::Skipped {
                    key: key.to_string(),
                })
            }
        }
    }
}
