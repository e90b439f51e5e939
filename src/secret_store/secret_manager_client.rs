use anyhow::{anyhow, Context, Result};
use async_trait::async_trait;
use base64::{engine::general_purpose::STANDARD, Engine};
use log::info;
use serde::Deserialize;
use std::sync::Arc;

use crate::auth::TokenProvider;
use crate::http_client::HttpClient;
use crate::secret_store::SecretStore;

const SECRET_MANAGER_API_BASE: &str = "https://secretmanager.googleapis.com/v1";

const LATEST_VERSION: &str = "latest";

/// Fully qualified secret version resource
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SecretName {
    pub project: String,
    pub secret: String,
    pub version: String,
}

impl SecretName {
    /// Resolve a short secret id against `project`, or parse a full
    /// `projects/<p>/secrets/<s>[/versions/<v>]` resource name.
    pub fn parse(name: &str, project: Option<&str>) -> Result<Self> {
        let segments: Vec<&str> = name.trim_matches('/').split('/').collect();
        match segments.as_slice() {
            ["projects", project, "secrets", secret] => Ok(Self {
                project: project.to_string(),
                secret: secret.to_string(),
                version: LATEST_VERSION.to_string(),
            }),
            ["projects", project, "secrets", secret, "versions", version] => Ok(Self {
                project: project.to_string(),
                secret: secret.to_string(),
                version: version.to_string(),
            }),
            [secret] if !secret.is_empty() => {
                let project = project
                    .ok_or_else(|| anyhow!("No project known to resolve secret '{}'", secret))?;
                Ok(Self {
                    project: project.to_string(),
                    secret: secret.to_string(),
                    version: LATEST_VERSION.to_string(),
                })
            }
            _ => Err(anyhow!("Invalid secret name: {}", name)),
        }
    }

    pub fn access_path(&self) -> String {
        format!(
            "/projects/{}/secrets/{}/versions/{}:access",
            self.project, self.secret, self.version
        )
    }
}

#[derive(Debug, Deserialize)]
struct AccessSecretVersionResponse {
    payload: SecretPayload,
}

#[derive(Debug, Deserialize)]
struct SecretPayload {
    data: String,
}

/// Secret Manager REST client
pub struct SecretManagerClient {
    http_client: HttpClient,
    auth: Arc<dyn TokenProvider>,
    project: Option<String>,
}

impl SecretManagerClient {
    pub fn new(auth: Arc<dyn TokenProvider>, project: Option<String>) -> Self {
        Self {
            http_client: HttpClient::new(SECRET_MANAGER_API_BASE),
            auth,
            project,
        }
    }

    fn decode_payload(data: &str) -> Result<String> {
        let bytes = STANDARD
            .decode(data.trim())
            .context("Secret payload is not valid base64")?;
        String::from_utf8(bytes).context("Secret payload is not valid UTF-8")
    }
}

#[async_trait]
impl SecretStore for SecretManagerClient {
    async fn get_secret(&self, secret_name: &str) -> Result<String> {
        let name = SecretName::parse(secret_name, self.project.as_deref())?;
        info!("Accessing secret {} (version {})", name.secret, name.version);

        let auth_header = self.auth.auth_header().await?;
        let response: AccessSecretVersionResponse = self
            .http_client
            .get(&name.access_path(), &[], &auth_header)
            .await
            .with_context(|| format!("Failed to access secret {}", name.secret))?;

        Self::decode_payload(&response.payload.data)
    }
}
