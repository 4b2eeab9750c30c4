//! Imported file model.

use chrono::{DateTime, Utc};
use sqlx::FromRow;

/// A file imported from Google Drive into the data room.
///
/// `storage_key` locates the bytes in [`crate::services::Storage`] and is
/// never exposed to clients.
#[derive(Debug, Clone, FromRow)]
pub struct StoredFile {
    pub id: i64,
    pub name: String,
    pub mime_type: Option<String>,
    pub size: Option<i64>,
    pub google_drive_id: String,
    pub storage_key: String,
    pub created_at: DateTime<Utc>,
}

/// Insert payload for [`StoredFile`]; id and timestamp are assigned on insert.
#[derive(Debug, Clone)]
pub struct NewFile {
    pub name: String,
    pub mime_type: Option<String>,
    pub size: Option<i64>,
    pub google_drive_id: String,
    pub storage_key: String,
}
