use serde::{Deserialize, Serialize};

/// Mime type Drive assigns to folders. Everything else is a file.
pub const FOLDER_MIME_TYPE: &str = "application/vnd.google-apps.folder";

/// Content type used when Drive reports none
pub const DEFAULT_CONTENT_TYPE: &str = "application/octet-stream";

/// DriveFile: one entry of a `files.list` response.
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq, Eq)]
pub struct DriveFile {
    pub id: String,
    pub name: String,
    #[serde(rename = "mimeType", default)]
    pub mime_type: String,
}

impl DriveFile {
    pub fn is_folder(&self) -> bool {
        self.mime_type == FOLDER_MIME_TYPE
    }
}

/// DriveFileList: one page of a `files.list` response.
#[derive(Debug, Deserialize, Serialize, Default, Clone)]
pub struct DriveFileList {
    #[serde(default)]
    pub files: Vec<DriveFile>,
    #[serde(rename = "nextPageToken")]
    pub next_page_token: Option<String>,
}

/// A direct child of a source folder, classified by kind.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SourceNode {
    Folder { id: String, name: String },
    File {
        id: String,
        name: String,
        mime_type: String,
    },
}

impl SourceNode {
    pub fn folder(id: &str, name: &str) -> Self {
        SourceNode::Folder {
            id: id.to_string(),
            name: name.to_string(),
        }
    }

    pub fn file(id: &str, name: &str) -> Self {
        Self::typed_file(id, name, DEFAULT_CONTENT_TYPE)
    }

    pub fn typed_file(id: &str, name: &str, mime_type: &str) -> Self {
        SourceNode::File {
            id: id.to_string(),
            name: name.to_string(),
            mime_type: mime_type.to_string(),
        }
    }

    pub fn id(&self) -> &str {
        match self {
            SourceNode::Folder { id, .. } | SourceNode::File { id, .. } => id,
        }
    }

    pub fn name(&self) -> &str {
        match self {
            SourceNode::Folder { name, .. } | SourceNode::File { name, .. } => name,
        }
    }
}

impl From<DriveFile> for SourceNode {
    fn from(file: DriveFile) -> Self {
        if file.is_folder() {
            SourceNode::Folder {
                id: file.id,
                name: file.name,
            }
        } else {
            let mime_type = if file.mime_type.is_empty() {
                DEFAULT_CONTENT_TYPE.to_string()
            } else {
                file.mime_type
            };
            SourceNode::File {
                id: file.id,
                name: file.name,
                mime_type,
            }
        }
    }
}

/// Cumulative progress of a content download
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DownloadProgress {
    pub bytes_received: u64,
    pub total_bytes: Option<u64>,
}

impl DownloadProgress {
    /// Whole percent complete, when the total size is known
    pub fn percent(&self) -> Option<u8> {
        match self.total_bytes {
            Some(0) => Some(100),
            Some(total) => Some(((self.bytes_received.min(total) * 100) / total) as u8),
            None => None,
        }
    }
}
