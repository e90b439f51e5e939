pub mod errors;
pub mod report;
pub mod staging;
pub mod target;
pub mod transfer;
pub mod tree_sync;

pub use errors::SyncError;
pub use report::{FailedTransfer, LeafOutcome, RunReport, TargetReport};
pub use staging::{StagedFile, StagingArea};
pub use target::{destination_key, SyncTarget};
pub use transfer::Transferer;
pub use tree_sync::TreeSync;
