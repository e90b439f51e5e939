use std::sync::Arc;

use anyhow::{Context, Result};
use log::info;

use crate::{
    auth::{MetadataServerAuth, ServiceAccountAuth, ServiceAccountKey, StaticTokenAuth, TokenProvider},
    config::Settings,
    drive_service::{DriveClient, SourceTree},
    secret_store::{FileSecretStore, SecretManagerClient, SecretStore},
    storage_service::{GcsClient, ObjectStore},
    sync::{StagingArea, TreeSync},
};

pub struct AppState {
    pub settings: Arc<Settings>,
    pub tree_sync: TreeSync,
}

/// Resolve credentials and wire the clients into a `TreeSync`
pub async fn app_state_factory(settings: Settings) -> Result<AppState> {
    let secret_store = secret_store_factory(&settings).await?;
    let payload = secret_store
        .get_secret(&settings.secret_name)
        .await
        .context("Failed to retrieve service account credentials")?;
    let key = ServiceAccountKey::from_json(&payload)?;

    let auth = ServiceAccountAuth::new(key);
    info!("Authenticating as {}", auth.client_email());
    // Fail on bad credentials before touching either service
    auth.access_token()
        .await
        .context("Failed to authenticate service account")?;
    let auth: Arc<dyn TokenProvider> = Arc::new(auth);

    let source: Arc<dyn SourceTree> = Arc::new(DriveClient::new(auth.clone()));
    let store: Arc<dyn ObjectStore> = Arc::new(GcsClient::new(auth));
    let staging = StagingArea::new(&settings.staging_dir)
        .await
        .context("Failed to prepare staging directory")?;

    let tree_sync = TreeSync::new(source, store, &settings.bucket_name, staging);
    Ok(AppState {
        settings: Arc::new(settings),
        tree_sync,
    })
}

async fn secret_store_factory(settings: &Settings) -> Result<Box<dyn SecretStore>> {
    if let Some(path) = &settings.service_account_file {
        return Ok(Box::new(FileSecretStore::new(path)));
    }

    let needs_project =
        settings.project_id.is_none() && !settings.secret_name.starts_with("projects/");

    match &settings.bootstrap_token {
        Some(token) => {
            let auth: Arc<dyn TokenProvider> = Arc::new(StaticTokenAuth::new(token));
            Ok(Box::new(SecretManagerClient::new(auth, settings.project_id.clone())))
        }
        None => {
            let metadata = MetadataServerAuth::new();
            let project = if needs_project {
                Some(
                    metadata
                        .project_id()
                        .await
                        .context("Failed to determine project for secret lookup")?,
                )
            } else {
                settings.project_id.clone()
            };
            let auth: Arc<dyn TokenProvider> = Arc::new(metadata);
            Ok(Box::new(SecretManagerClient::new(auth, project)))
        }
    }
}
