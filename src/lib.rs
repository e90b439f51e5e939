//! Drive to Cloud Storage mirror
//!
//! Walks folder trees in Google Drive and copies every file that is not yet
//! present into a Cloud Storage bucket, keyed by its folder path.

pub mod app_state;
pub mod auth;
pub mod config;
pub mod drive_service;
pub mod http_client;
pub mod log_appender;
pub mod secret_store;
pub mod storage_service;
pub mod sync;
