use anyhow::{anyhow, Result};
use async_trait::async_trait;
use drive_gcs_sync::drive_service::{DownloadProgress, ProgressFn, SourceNode, SourceTree};
use std::collections::{HashMap, HashSet};
use std::sync::{Arc, Mutex};

/// Chunk size used to replay downloads through the progress callback
const MOCK_CHUNK_SIZE: usize = 4;

#[derive(Debug, Default)]
struct MockTree {
    folders: HashMap<String, Vec<SourceNode>>,
    contents: HashMap<String, Vec<u8>>,
    failing_folders: HashSet<String>,
    failing_downloads: HashSet<String>,
}

/// In-memory folder tree implementing `SourceTree`
#[derive(Clone, Default)]
pub struct MockSourceTree {
    tree: Arc<Mutex<MockTree>>,
    call_counter: Arc<Mutex<HashMap<String, usize>>>,
    listed_folders: Arc<Mutex<Vec<String>>>,
    downloaded_files: Arc<Mutex<Vec<String>>>,
    progress_events: Arc<Mutex<Vec<DownloadProgress>>>,
}

impl MockSourceTree {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a folder and its (possibly empty) children
    pub fn add_folder(&self, folder_id: &str, children: Vec<SourceNode>) {
        let mut tree = self.tree.lock().unwrap();
        tree.folders.insert(folder_id.to_string(), children);
    }

    pub fn set_file_content(&self, file_id: &str, data: &[u8]) {
        let mut tree = self.tree.lock().unwrap();
        tree.contents.insert(file_id.to_string(), data.to_vec());
    }

    pub fn fail_listing(&self, folder_id: &str) {
        let mut tree = self.tree.lock().unwrap();
        tree.failing_folders.insert(folder_id.to_string());
    }

    pub fn fail_download(&self, file_id: &str) {
        let mut tree = self.tree.lock().unwrap();
        tree.failing_downloads.insert(file_id.to_string());
    }

    pub fn get_call_count(&self, operation: &str) -> usize {
        *self.call_counter.lock().unwrap().get(operation).unwrap_or(&0)
    }

    pub fn listed_folders(&self) -> Vec<String> {
        self.listed_folders.lock().unwrap().clone()
    }

    pub fn downloaded_files(&self) -> Vec<String> {
        self.downloaded_files.lock().unwrap().clone()
    }

    pub fn progress_events(&self) -> Vec<DownloadProgress> {
        self.progress_events.lock().unwrap().clone()
    }

    fn increment_call_count(&self, operation: &str) {
        let mut counter = self.call_counter.lock().unwrap();
        *counter.entry(operation.to_string()).or_insert(0) += 1;
    }
}

#[async_trait]
impl SourceTree for MockSourceTree {
    async fn list_children(&self, folder_id: &str) -> Result<Vec<SourceNode>> {
        self.increment_call_count("list_children");
        self.listed_folders.lock().unwrap().push(folder_id.to_string());

        let tree = self.tree.lock().unwrap();
        if tree.failing_folders.contains(folder_id) {
            return Err(anyhow!("Mock listing failure for folder {}", folder_id));
        }
        tree.folders
            .get(folder_id)
            .cloned()
            .ok_or_else(|| anyhow!("Mock folder not found: {}", folder_id))
    }

    async fn download_content(&self, file_id: &str, on_progress: ProgressFn<'_>) -> Result<Vec<u8>> {
        self.increment_call_count("download_content");
        self.downloaded_files.lock().unwrap().push(file_id.to_string());

        let data = {
            let tree = self.tree.lock().unwrap();
            if tree.failing_downloads.contains(file_id) {
                return Err(anyhow!("Mock download failure for file {}", file_id));
            }
            tree.contents
                .get(file_id)
                .cloned()
                .unwrap_or_else(|| format!("content of {}", file_id).into_bytes())
        };

        let total_bytes = Some(data.len() as u64);
        let mut received = 0usize;
        for chunk in data.chunks(MOCK_CHUNK_SIZE) {
            received += chunk.len();
            let progress = DownloadProgress {
                bytes_received: received as u64,
                total_bytes,
            };
            self.progress_events.lock().unwrap().push(progress);
            on_progress(progress);
        }
        Ok(data)
    }
}
