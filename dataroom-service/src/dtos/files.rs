use crate::models::StoredFile;
use serde::{Deserialize, Serialize};

/// Public view of an imported file.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FileResponse {
    pub id: i64,
    pub name: String,
    pub mime_type: Option<String>,
    pub size: Option<i64>,
    pub google_drive_id: String,
    pub created_at: String,
}

impl From<StoredFile> for FileResponse {
    fn from(file: StoredFile) -> Self {
        Self {
            id: file.id,
            name: file.name,
            mime_type: file.mime_type,
            size: file.size,
            google_drive_id: file.google_drive_id,
            created_at: file.created_at.to_rfc3339(),
        }
    }
}

#[derive(Debug, Serialize, Deserialize)]
pub struct FileListResponse {
    pub files: Vec<FileResponse>,
}

impl From<Vec<StoredFile>> for FileListResponse {
    fn from(files: Vec<StoredFile>) -> Self {
        Self {
            files: files.into_iter().map(FileResponse::from).collect(),
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct SearchParams {
    #[serde(default)]
    pub q: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct SuccessResponse {
    pub success: bool,
}

impl SuccessResponse {
    pub fn ok() -> Self {
        Self { success: true }
    }
}
