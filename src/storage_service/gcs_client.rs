use crate::auth::TokenProvider;
use crate::http_client::HttpClient;
use anyhow::{anyhow, Context, Result};
use async_trait::async_trait;
use log::{debug, info};
use reqwest::StatusCode;
use std::path::Path;
use std::sync::Arc;

const STORAGE_API_BASE: &str = "https://storage.googleapis.com";

/// Result of a create-only upload
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PutOutcome {
    Created { bytes: u64 },
    /// Another writer created the object first; nothing was written
    AlreadyExists,
}

/// Flat-namespace object store addressed by bucket and key
#[async_trait]
pub trait ObjectStore: Send + Sync {
    async fn object_exists(&self, bucket: &str, key: &str) -> Result<bool>;

    /// Upload a local file to `key`. Never replaces an existing object.
    async fn put_object(
        &self,
        bucket: &str,
        key: &str,
        local_path: &Path,
        content_type: &str,
    ) -> Result<PutOutcome>;
}

/// Cloud Storage JSON API client
pub struct GcsClient {
    http_client: HttpClient,
    auth: Arc<dyn TokenProvider>,
}

impl GcsClient {
    pub fn new(auth: Arc<dyn TokenProvider>) -> Self {
        Self::with_base_url(auth, STORAGE_API_BASE)
    }

    pub fn with_base_url(auth: Arc<dyn TokenProvider>, base_url: &str) -> Self {
        Self {
            http_client: HttpClient::new(base_url),
            auth,
        }
    }

    fn object_url(bucket: &str, key: &str) -> String {
        format!(
            "/storage/v1/b/{}/o/{}",
            urlencoding::encode(bucket),
            urlencoding::encode(key)
        )
    }

    fn upload_url(bucket: &str) -> String {
        format!("/upload/storage/v1/b/{}/o", urlencoding::encode(bucket))
    }
}

#[async_trait]
impl ObjectStore for GcsClient {
    async fn object_exists(&self, bucket: &str, key: &str) -> Result<bool> {
        let auth_header = self.auth.auth_header().await?;
        let status = self
            .http_client
            .fetch_status(&Self::object_url(bucket, key), &auth_header)
            .await
            .with_context(|| format!("Failed to check gs://{}/{}", bucket, key))?;

        match status {
            s if s.is_success() => Ok(true),
            StatusCode::NOT_FOUND => Ok(false),
            s => Err(anyhow!(
                "Existence check for gs://{}/{} failed with status {}",
                bucket,
                key,
                s
            )),
        }
    }

    async fn put_object(
        &self,
        bucket: &str,
        key: &str,
        local_path: &Path,
        content_type: &str,
    ) -> Result<PutOutcome> {
        let data = tokio::fs::read(local_path)
            .await
            .with_context(|| format!("Failed to read staged file: {}", local_path.display()))?;
        let bytes = data.len() as u64;

        let auth_header = self.auth.auth_header().await?;
        // ifGenerationMatch=0 makes the write succeed only if no live object exists
        let query = [("uploadType", "media"), ("name", key), ("ifGenerationMatch", "0")];
        let response = self
            .http_client
            .upload_bytes(&Self::upload_url(bucket), &query, data, content_type, &auth_header)
            .await
            .with_context(|| format!("Failed to upload gs://{}/{}", bucket, key))?;

        if response.status() == StatusCode::PRECONDITION_FAILED {
            debug!("gs://{}/{} was created concurrently", bucket, key);
            return Ok(PutOutcome::AlreadyExists);
        }
        HttpClient::ensure_success(response)
            .await
            .with_context(|| format!("Upload of gs://{}/{} was rejected", bucket, key))?;

        info!("Uploaded {} bytes to gs://{}/{}", bytes, bucket, key);
        Ok(PutOutcome::Created { bytes })
    }
}
