use anyhow::{Context, Result};
use async_trait::async_trait;
use log::info;
use std::path::{Path, PathBuf};

use crate::secret_store::SecretStore;

/// Serves the credential from a local key file instead of Secret Manager.
/// The secret name is ignored.
pub struct FileSecretStore {
    path: PathBuf,
}

impl FileSecretStore {
    pub fn new(path: &Path) -> Self {
        Self {
            path: path.to_path_buf(),
        }
    }
}

#[async_trait]
impl SecretStore for FileSecretStore {
    async fn get_secret(&self, _secret_name: &str) -> Result<String> {
        info!("Reading credentials from {}", self.path.display());
        tokio::fs::read_to_string(&self.path)
            .await
            .with_context(|| format!("Failed to read credential file: {}", self.path.display()))
    }
}
