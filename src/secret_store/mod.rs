//! Retrieval of the JSON credential blob used to authenticate both services

pub mod file_secret_store;
pub mod secret_manager_client;

pub use file_secret_store::FileSecretStore;
pub use secret_manager_client::{SecretManagerClient, SecretName};

use anyhow::Result;
use async_trait::async_trait;

/// Read-only access to a named secret
#[async_trait]
pub trait SecretStore: Send + Sync {
    async fn get_secret(&self, secret_name: &str) -> Result<String>;
}
