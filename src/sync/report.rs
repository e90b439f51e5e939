use chrono::{DateTime, Utc};
use serde::Serialize;
use std::fmt;

use crate::sync::errors::SyncError;

/// Result of handling one leaf file
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LeafOutcome {
    /// An object already occupied the key
    Skipped { key: String },
    Transferred { key: String, bytes: u64 },
}

/// A leaf whose upload failed; its key is still absent at the destination
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FailedTransfer {
    pub key: String,
    pub reason: String,
}

/// Counts for one sync target
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct TargetReport {
    pub prefix: String,
    pub folders_visited: usize,
    pub skipped: usize,
    pub transferred: usize,
    pub bytes_transferred: u64,
    pub failed: Vec<FailedTransfer>,
}

impl TargetReport {
    pub fn new(prefix: &str) -> Self {
        Self {
            prefix: prefix.to_string(),
            ..Default::default()
        }
    }

    pub fn record(&mut self, outcome: LeafOutcome) {
        match outcome {
            LeafOutcome::Skipped { .. } => self.skipped += 1,
            LeafOutcome::Transferred { bytes, .. } => {
                self.transferred += 1;
                self.bytes_transferred += bytes;
            }
        }
    }

    pub fn record_failure(&mut self, key: &str, error: &SyncError) {
        self.failed.push(FailedTransfer {
            key: key.to_string(),
            reason: error.to_string(),
        });
    }

    pub fn files_seen(&self) -> usize {
        self.skipped + self.transferred + self.failed.len()
    }
}

impl fmt::Display for TargetReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}: {} folders, {} skipped, {} transferred ({} bytes), {} failed",
            self.prefix,
            self.folders_visited,
            self.skipped,
            self.transferred,
            self.bytes_transferred,
            self.failed.len()
        )
    }
}

/// Aggregate over all targets of a run
#[derive(Debug, Clone, Serialize)]
pub struct RunReport {
    pub started_at: DateTime<Utc>,
    pub finished_at: Option<DateTime<Utc>>,
    pub targets: Vec<TargetReport>,
}

impl RunReport {
    pub fn start() -> Self {
        Self {
            started_at: Utc::now(),
            finished_at: None,
            targets: Vec::new(),
        }
    }

    pub fn finish(&mut self) {
        self.finished_at = Some(Utc::now());
    }

    pub fn skipped(&self) -> usize {
        self.targets.iter().map(|t| t.skipped).sum()
    }

    pub fn transferred(&self) -> usize {
        self.targets.iter().map(|t| t.transferred).sum()
    }

    pub fn failed(&self) -> usize {
        self.targets.iter().map(|t| t.failed.len()).sum()
    }
}

impl fmt::Display for RunReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} skipped, {} transferred, {} failed",
            self.skipped(),
            self.transferred(),
            self.failed()
        )?;
        if let Some(finished_at) = self.finished_at {
            let elapsed = finished_at - self.started_at;
            write!(f, " in {}s", elapsed.num_seconds())?;
        }
        Ok(())
    }
}
