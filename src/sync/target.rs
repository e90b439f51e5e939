use serde::{Deserialize, Serialize};

/// One independent sync root: a source folder mirrored under a key prefix
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SyncTarget {
    pub prefix: String,
    pub folder_id: String,
}

impl SyncTarget {
    pub fn new(prefix: &str, folder_id: &str) -> Self {
        Self {
            prefix: prefix.to_string(),
            folder_id: folder_id.to_string(),
        }
    }
}

/// Key of a child named `name` under `prefix`. One `/` per level, no normalization.
pub fn destination_key(prefix: &str, name: &str) -> String {
    format!("{}/{}", prefix, name)
}
