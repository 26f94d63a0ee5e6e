//! File-manager models.

use serde::{Deserialize, Serialize};

use super::Timestamp;

/// Directory entry kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FileKind {
    File,
    Folder,
}

/// One entry in a remote directory listing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FileItem {
    pub name: String,
    pub path: String,
    #[serde(rename = "type")]
    pub kind: FileKind,
    /// Bytes; absent for folders.
    #[serde(default)]
    pub size: Option<u64>,
    pub modified: Timestamp,
    pub permissions: String,
    #[serde(default)]
    pub owner: Option<String>,
    #[serde(default)]
    pub is_encrypted: bool,
    #[serde(default)]
    pub checksum: Option<String>,
}

impl FileItem {
    pub fn is_dir(&self) -> bool {
        self.kind == FileKind::Folder
    }
}

/// Audit record of a file operation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FileOperation {
    #[serde(default)]
    pub id: String,
    pub user_id: String,
    /// upload, download, delete, move, copy
    pub operation_type: String,
    pub file_path: String,
    #[serde(default)]
    pub destination_path: Option<String>,
    #[serde(default)]
    pub file_size: Option<u64>,
    pub timestamp: Timestamp,
    #[serde(default = "default_true")]
    pub success: bool,
    #[serde(default)]
    pub error_message: Option<String>,
}

fn default_true() -> bool {
    true
}

/// `GET /files/search` body.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FileSearchResults {
    pub results: Vec<FileItem>,
    pub count: usize,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn folder_entry_decodes_type_field() {
        let item: FileItem = serde_json::from_str(
            r#"{"name":"docs","path":"/docs","type":"folder",
                "modified":"2024-01-01T00:00:00","permissions":"rwxr-xr-x"}"#,
        )
        .unwrap();
        assert!(item.is_dir());
        assert_eq!(item.size, None);
    }
}
