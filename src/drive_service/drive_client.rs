use crate::auth::TokenProvider;
use crate::drive_service::drive_models::{DownloadProgress, DriveFileList, SourceNode};
use crate::http_client::HttpClient;
use anyhow::{Context, Result};
use async_trait::async_trait;
use log::debug;
use std::sync::Arc;

const DRIVE_API_BASE: &str = "https://www.googleapis.com/drive/v3";

/// Fields requested from `files.list`
const LIST_FIELDS: &str = "nextPageToken, files(id, name, mimeType)";

const PAGE_SIZE: &str = "1000";

/// Progress callback invoked after every received chunk
pub type ProgressFn<'a> = &'a (dyn Fn(DownloadProgress) + Send + Sync);

/// Read-only view of the remote folder tree
#[async_trait]
pub trait SourceTree: Send + Sync {
    /// Direct children of a folder. Non-recursive.
    async fn list_children(&self, folder_id: &str) -> Result<Vec<SourceNode>>;

    /// Full content of a file, reporting cumulative progress per chunk
    async fn download_content(&self, file_id: &str, on_progress: ProgressFn<'_>) -> Result<Vec<u8>>;
}

/// Google Drive v3 client
pub struct DriveClient {
    http_client: HttpClient,
    auth: Arc<dyn TokenProvider>,
}

impl DriveClient {
    pub fn new(auth: Arc<dyn TokenProvider>) -> Self {
        Self::with_base_url(auth, DRIVE_API_BASE)
    }

    pub fn with_base_url(auth: Arc<dyn TokenProvider>, base_url: &str) -> Self {
        Self {
            http_client: HttpClient::new(base_url),
            auth,
        }
    }

    fn children_query(folder_id: &str) -> String {
        format!("'{}' in parents", folder_id.replace('\'', "\\'"))
    }

    async fn list_page(&self, folder_id: &str, page_token: Option<&str>) -> Result<DriveFileList> {
        let auth_header = self.auth.auth_header().await?;
        let query = Self::children_query(folder_id);
        let mut params = vec![
            ("q", query.as_str()),
            ("fields", LIST_FIELDS),
            ("pageSize", PAGE_SIZE),
            ("supportsAllDrives", "true"),
            ("includeItemsFromAllDrives", "true"),
        ];
        if let Some(token) = page_token {
            params.push(("pageToken", token));
        }
        self.http_client.get("/files", &params, &auth_header).await
    }
}

#[async_trait]
impl SourceTree for DriveClient {
    async fn list_children(&self, folder_id: &str) -> Result<Vec<SourceNode>> {
        let mut children = Vec::new();
        let mut page_token: Option<String> = None;
        loop {
            let page = self
                .list_page(folder_id, page_token.as_deref())
                .await
                .with_context(|| format!("Failed to list children of folder {}", folder_id))?;
            children.extend(page.files.into_iter().map(SourceNode::from));
            match page.next_page_token {
                Some(token) if !token.is_empty() => page_token = Some(token),
                _ => break,
            }
        }
        debug!("Folder {} has {} children", folder_id, children.len());
        Ok(children)
    }

    async fn download_content(&self, file_id: &str, on_progress: ProgressFn<'_>) -> Result<Vec<u8>> {
        let auth_header = self.auth.auth_header().await?;
        let url = format!("/files/{}", urlencoding::encode(file_id));
        let mut response = self
            .http_client
            .download(&url, &[("alt", "media"), ("supportsAllDrives", "true")], &auth_header)
            .await
            .with_context(|| format!("Failed to start download of file {}", file_id))?;

        let total_bytes = response.content_length();
        let mut buffer = Vec::with_capacity(total_bytes.unwrap_or(0) as usize);
        while let Some(chunk) = response
            .chunk()
            .await
            .with_context(|| format!("Failed to read content of file {}", file_id))?
        {
            buffer.extend_from_slice(&chunk);
            on_progress(DownloadProgress {
                bytes_received: buffer.len() as u64,
                total_bytes,
            });
        }
        Ok(buffer)
    }
}
