pub mod drive_client;
pub mod drive_models;

pub use drive_client::{DriveClient, ProgressFn, SourceTree};
pub use drive_models::{DownloadProgress, DriveFile, SourceNode};
