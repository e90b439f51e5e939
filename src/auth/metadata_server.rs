use anyhow::{anyhow, Context, Result};
use async_trait::async_trait;
use log::debug;
use reqwest::Client;
use tokio::sync::Mutex;

use crate::auth::token_provider::{CachedToken, TokenProvider, TokenResponse};

/// Compute metadata server, reachable from Cloud Run, Functions and GCE
const METADATA_BASE: &str = "http://metadata.google.internal/computeMetadata/v1";

/// Ambient credentials of the runtime's default service account.
/// Used only to read the credential secret.
pub struct MetadataServerAuth {
    client: Client,
    base_url: String,
    cached: Mutex<Option<CachedToken>>,
}

impl MetadataServerAuth {
    pub fn new() -> Self {
        Self::with_base_url(METADATA_BASE)
    }

    pub fn with_base_url(base_url: &str) -> Self {
        Self {
            client: Client::new(),
            base_url: base_url.trim_end_matches('/').to_string(),
            cached: Mutex::new(None),
        }
    }

    fn token_url(&self) -> String {
        format!("{}/instance/service-accounts/default/token", self.base_url)
    }

    fn project_id_url(&self) -> String {
        format!("{}/project/project-id", self.base_url)
    }

    async fn get_text(&self, url: &str) -> Result<String> {
        debug!("Querying metadata server: {}", url);
        let response = self
            .client
            .get(url)
            .header("Metadata-Flavor", "Google")
            .send()
            .await
            .context("Metadata server is not reachable")?;
        if !response.status().is_success() {
            return Err(anyhow!("Metadata server returned status {}", response.status()));
        }
        response.text().await.context("Failed to read metadata response")
    }

    /// Project that hosts the runtime
    pub async fn project_id(&self) -> Result<String> {
        let project = self.get_text(&self.project_id_url()).await?;
        Ok(project.trim().to_string())
    }
}

impl Default for MetadataServerAuth {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl TokenProvider for MetadataServerAuth {
    async fn access_token(&self) -> Result<String> {
        let mut cached = self.cached.lock().await;
        if let Some(token) = cached.as_ref().filter(|t| t.is_fresh()) {
            return Ok(token.access_token.clone());
        }
        let body = self.get_text(&self.token_url()).await?;
        let response: TokenResponse =
            serde_json::from_str(&body).context("Failed to parse metadata token response")?;
        let token = CachedToken::from_response(response);
        let access_token = token.access_token.clone();
        *cached = Some(token);
        Ok(access_token)
    }
}
