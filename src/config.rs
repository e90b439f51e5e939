//! Process configuration, read once from the environment at startup.

use log::LevelFilter;
use std::path::PathBuf;
use std::str::FromStr;
use thiserror::Error;

use crate::sync::SyncTarget;

pub const BUCKET_NAME: &str = "BUCKET_NAME";
pub const DRIVE_FOLDER_ID_YELP: &str = "DRIVE_FOLDER_ID_YELP";
pub const DRIVE_FOLDER_ID_GOOGLE_METADATA: &str = "DRIVE_FOLDER_ID_GOOGLE_METADATA";
pub const DRIVE_FOLDER_ID_GOOGLE_REVIEWS: &str = "DRIVE_FOLDER_ID_GOOGLE_REVIEWS";
pub const SECRET_NAME: &str = "SECRET_NAME";
pub const GOOGLE_CLOUD_PROJECT: &str = "GOOGLE_CLOUD_PROJECT";
pub const SERVICE_ACCOUNT_FILE: &str = "SERVICE_ACCOUNT_FILE";
pub const GOOGLE_OAUTH_ACCESS_TOKEN: &str = "GOOGLE_OAUTH_ACCESS_TOKEN";
pub const STAGING_DIR: &str = "STAGING_DIR";
pub const LOG_DIR: &str = "LOG_DIR";
pub const LOG_LEVEL: &str = "LOG_LEVEL";

static DEFAULT_SECRET_NAME: &str = "service-account-key";

#[derive(Error, Debug, PartialEq)]
pub enum ConfigError {
    #[error("Required environment variable {0} is not set")]
    Missing(&'static str),

    #[error("Invalid value for {name}: {value}")]
    Invalid { name: &'static str, value: String },
}

#[derive(Debug, Clone)]
pub struct Settings {
    pub bucket_name: String,
    pub targets: Vec<SyncTarget>,
    pub secret_name: String,
    pub project_id: Option<String>,
    pub service_account_file: Option<PathBuf>,
    /// Bootstrap token for reading the secret, instead of the metadata server
    pub bootstrap_token: Option<String>,
    pub staging_dir: PathBuf,
    /// Rolling file logs are written here when set; otherwise console only
    pub log_dir: Option<PathBuf>,
    pub log_level: LevelFilter,
}

impl Settings {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Build settings from any variable source. Empty values count as unset.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let optional = |name: &str| lookup(name).filter(|v| !v.trim().is_empty());
        let required = |name: &'static str| optional(name).ok_or(ConfigError::Missing(name));

        let targets = vec![
            SyncTarget::new("yelp", &required(DRIVE_FOLDER_ID_YELP)?),
            SyncTarget::new("metadata", &required(DRIVE_FOLDER_ID_GOOGLE_METADATA)?),
            SyncTarget::new("reviews", &required(DRIVE_FOLDER_ID_GOOGLE_REVIEWS)?),
        ];

        let log_level = match optional(LOG_LEVEL) {
            Some(value) => LevelFilter::from_str(&value).map_err(|_| ConfigError::Invalid {
                name: LOG_LEVEL,
                value,
            })?,
            None => LevelFilter::Info,
        };

        Ok(Self {
            bucket_name: required(BUCKET_NAME)?,
            targets,
            secret_name: optional(SECRET_NAME).unwrap_or_else(|| DEFAULT_SECRET_NAME.to_string()),
            project_id: optional(GOOGLE_CLOUD_PROJECT),
            service_account_file: optional(SERVICE_ACCOUNT_FILE).map(PathBuf::from),
            bootstrap_token: optional(GOOGLE_OAUTH_ACCESS_TOKEN),
            staging_dir: optional(STAGING_DIR)
                .map(PathBuf::from)
                .unwrap_or_else(std::env::temp_dir),
            log_dir: optional(LOG_DIR).map(PathBuf::from),
            log_level,
        })
    }
}
