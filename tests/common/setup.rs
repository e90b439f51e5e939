use drive_gcs_sync::sync::{StagingArea, TreeSync};
use std::sync::Arc;
use tempfile::TempDir;

use crate::common::fixtures::TEST_BUCKET;
use crate::common::mock_object_store::MockObjectStore;
use crate::common::mock_source_tree::MockSourceTree;

/// Mocks plus a private staging directory for one test
pub struct TestEnv {
    pub source: MockSourceTree,
    pub store: MockObjectStore,
    pub staging_dir: TempDir,
}

impl TestEnv {
    pub fn new() -> Self {
        let _ = env_logger::builder().is_test(true).try_init();
        Self {
            source: MockSourceTree::new(),
            store: MockObjectStore::new(),
            staging_dir: TempDir::new().expect("Failed to create staging directory"),
        }
    }

    pub async fn tree_sync(&self) -> TreeSync {
        let staging = StagingArea::new(self.staging_dir.path())
            .await
            .expect("Failed to create staging area");
        TreeSync::new(
            Arc::new(self.source.clone()),
            Arc::new(self.store.clone()),
            TEST_BUCKET,
            staging,
        )
    }

    /// Files left behind in the staging directory
    pub fn staged_files(&self) -> Vec<String> {
        std::fs::read_dir(self.staging_dir.path())
            .expect("Failed to read staging directory")
            .filter_map(|entry| entry.ok())
            .map(|entry| entry.file_name().to_string_lossy().to_string())
            .collect()
    }
}
