//! Mirror Google Drive folders into a Cloud Storage bucket
//!
//! Configuration comes from the environment. Files already present in the
//! bucket are skipped, so the job can simply be re-run after a failure.

use anyhow::{Context, Result};
use clap::Command;
use log::{info, warn};

use drive_gcs_sync::app_state::app_state_factory;
use drive_gcs_sync::config::Settings;
use drive_gcs_sync::log_appender::setup_logging;

#[tokio::main]
async fn main() -> Result<()> {
    let _matches = Command::new("drive-gcs-sync")
        .version(env!("CARGO_PKG_VERSION"))
        .about("Copy Google Drive folder trees into a Cloud Storage bucket, skipping existing objects")
        .get_matches();

    let settings = Settings::from_env().context("Invalid configuration")?;

    setup_logging(settings.log_dir.as_deref(), settings.log_level)
        .context("Failed to setup logging")?;

    info!("Starting sync into bucket {}", settings.bucket_name);
    let app_state = app_state_factory(settings).await?;

    let report = app_state
        .tree_sync
        .run(&app_state.settings.targets)
        .await
        .context("Sync aborted")?;

    info!("Sync completed: {}", report);
    for target in &report.targets {
        for failed in &target.failed {
            warn!("Not transferred: {} ({})", failed.key, failed.reason);
        }
    }
    Ok(())
}
