use anyhow::{anyhow, Context, Result};
use log::debug;
use reqwest::{Client, Response, StatusCode};
use serde::de::DeserializeOwned;

/// HTTP client for Google REST API operations
#[derive(Clone)]
pub struct HttpClient {
    client: Client,
    base_url: String,
}

impl HttpClient {
    pub fn new(base_url: &str) -> Self {
        Self {
            client: Client::new(),
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Get full URL by prepending the API base if needed
    pub fn get_full_url(&self, url: &str) -> String {
        if url.starts_with("http") {
            url.to_string()
        } else {
            format!("{}{}", self.base_url, url)
        }
    }

    /// Make a GET request with authorization header and decode the JSON body
    pub async fn get<T>(&self, url: &str, query: &[(&str, &str)], auth_header: &str) -> Result<T>
    where
        T: DeserializeOwned,
    {
        let url = self.get_full_url(url);
        debug!("Getting url: {}", url);

        let response = self
            .client
            .get(&url)
            .query(query)
            .header("Authorization", auth_header)
            .send()
            .await
            .context("Failed to get response")?;
        let response = Self::ensure_success(response).await?;

        response
            .json::<T>()
            .await
            .context("Failed to deserialize response")
    }

    /// Make a GET request and report only the status code.
    /// Transport failures are errors, any HTTP status is returned as-is.
    pub async fn fetch_status(&self, url: &str, auth_header: &str) -> Result<StatusCode> {
        let url = self.get_full_url(url);
        debug!("Checking url: {}", url);

        let response = self
            .client
            .get(&url)
            .header("Authorization", auth_header)
            .send()
            .await
            .context("Failed to get response for status check")?;
        Ok(response.status())
    }

    /// Start a download; the caller reads the body chunk by chunk
    pub async fn download(
        &self,
        url: &str,
        query: &[(&str, &str)],
        auth_header: &str,
    ) -> Result<Response> {
        let url = self.get_full_url(url);
        debug!("Downloading url: {}", url);

        let response = self
            .client
            .get(&url)
            .query(query)
            .header("Authorization", auth_header)
            .send()
            .await
            .context("Failed to get response for download")?;

        Self::ensure_success(response).await
    }

    /// Upload raw bytes with authorization header. The response is returned
    /// unchecked so callers can interpret precondition statuses.
    pub async fn upload_bytes(
        &self,
        url: &str,
        query: &[(&str, &str)],
        body: Vec<u8>,
        content_type: &str,
        auth_header: &str,
    ) -> Result<Response> {
        let url = self.get_full_url(url);
        debug!("Uploading {} bytes to url: {}", body.len(), url);

        self.client
            .post(&url)
            .query(query)
            .header("Authorization", auth_header)
            .header("Content-Type", content_type)
            .body(body)
            .send()
            .await
            .context("Failed to get response for upload")
    }

    /// Turn a non-success status into an error carrying the response body
    pub async fn ensure_success(response: Response) -> Result<Response> {
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }
        let error_text = response.text().await.unwrap_or_default();
        Err(anyhow!("Request failed with status {}: {}", status, error_text))
    }
}
