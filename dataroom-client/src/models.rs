//! Wire types shared with the backend.

use serde::{Deserialize, Serialize};

/// MIME type prefix of Google Workspace documents.
pub const GOOGLE_APPS_PREFIX: &str = "application/vnd.google-apps.";
pub const FOLDER_MIME_TYPE: &str = "application/vnd.google-apps.folder";

/// A file imported into the data room.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DataroomFile {
    pub id: i64,
    pub name: String,
    #[serde(default)]
    pub mime_type: Option<String>,
    #[serde(default)]
    pub size: Option<i64>,
    pub google_drive_id: String,
    pub created_at: String,
}

/// A file as listed by Google Drive.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DriveFile {
    pub id: String,
    pub name: String,
    pub mime_type: String,
    /// Decimal string; absent for Google-native documents.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub size: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub modified_time: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub icon_link: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub thumbnail_link: Option<String>,
}

impl DriveFile {
    pub fn is_folder(&self) -> bool {
        self.mime_type == FOLDER_MIME_TYPE
    }

    pub fn is_google_doc(&self) -> bool {
        self.mime_type.starts_with(GOOGLE_APPS_PREFIX)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DriveFileList {
    #[serde(default)]
    pub files: Vec<DriveFile>,
    #[serde(default)]
    pub next_page_token: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct AuthStatus {
    pub authenticated: bool,
}

#[derive(Debug, Clone, Deserialize)]
pub struct LoginResponse {
    pub auth_url: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SuccessResponse {
    #[serde(default)]
    pub success: bool,
}

#[derive(Debug, Clone, Deserialize)]
pub struct FileListResponse {
    #[serde(default)]
    pub files: Vec<DataroomFile>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ImportRequest {
    pub file_id: String,
    pub name: String,
    pub mime_type: Option<String>,
    pub size: Option<String>,
}

impl From<&DriveFile> for ImportRequest {
    fn from(file: &DriveFile) -> Self {
        Self {
            file_id: file.id.clone(),
            name: file.name.clone(),
            mime_type: Some(file.mime_type.clone()),
            size: file.size.clone(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct ImportResponse {
    pub success: bool,
    pub file: DataroomFile,
}
