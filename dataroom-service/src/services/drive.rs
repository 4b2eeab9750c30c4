//! Google Drive v3 REST client: listing, download and Workspace export.

use crate::dtos::DriveFileList;
use crate::services::google_api::{checked_bytes, json_or_error, GoogleApiError};
use reqwest::Client;

const PAGE_SIZE: &str = "50";
const LIST_FIELDS: &str =
    "nextPageToken, files(id, name, mimeType, size, modifiedTime, iconLink, thumbnailLink)";

pub const FOLDER_MIME_TYPE: &str = "application/vnd.google-apps.folder";
const PDF_MIME_TYPE: &str = "application/pdf";
const XLSX_MIME_TYPE: &str = "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet";

/// Target format for a Google Workspace document, which has no bytes of its own.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ExportFormat {
    pub mime_type: &'static str,
    pub extension: &'static str,
}

/// Export format for Workspace MIME types; `None` for regular files.
pub fn export_format(mime_type: &str) -> Option<ExportFormat> {
    let pdf = ExportFormat {
        mime_type: PDF_MIME_TYPE,
        extension: ".pdf",
    };
    match mime_type {
        "application/vnd.google-apps.document"
        | "application/vnd.google-apps.presentation"
        | "application/vnd.google-apps.drawing" => Some(pdf),
        "application/vnd.google-apps.spreadsheet" => Some(ExportFormat {
            mime_type: XLSX_MIME_TYPE,
            extension: ".xlsx",
        }),
        _ => None,
    }
}

/// Bytes fetched from Drive along with the name and type they should be stored under.
#[derive(Debug)]
pub struct DownloadedFile {
    pub bytes: Vec<u8>,
    pub name: String,
    pub mime_type: Option<String>,
}

#[derive(Clone)]
pub struct DriveClient {
    client: Client,
    base_url: String,
}

impl DriveClient {
    pub fn new(client: Client, base_url: impl Into<String>) -> Self {
        Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
        }
    }

    /// One page of non-trashed files, most recently modified first.
    pub async fn list_files(
        &self,
        access_token: &str,
        page_token: Option<&str>,
        query: Option<&str>,
    ) -> Result<DriveFileList, GoogleApiError> {
        let q = build_query(query);
        let mut params = vec![
            ("pageSize", PAGE_SIZE),
            ("fields", LIST_FIELDS),
            ("q", q.as_str()),
            ("orderBy", "modifiedTime desc"),
        ];
        if let Some(token) = page_token.filter(|t| !t.is_empty()) {
            params.push(("pageToken", token));
        }

        let response = self
            .client
            .get(format!("{}/files", self.base_url))
            .bearer_auth(access_token)
            .query(&params)
            .send()
            .await?;

        json_or_error(response).await
    }

    /// Download a file's content, exporting Workspace documents.
    ///
    /// Exported files get the export MIME type and, unless already present,
    /// the matching extension appended to `name`.
    pub async fn download(
        &self,
        access_token: &str,
        file_id: &str,
        name: &str,
        mime_type: Option<&str>,
    ) -> Result<DownloadedFile, GoogleApiError> {
        let url = format!("{}/files/{}", self.base_url, urlencoding::encode(file_id));

        match mime_type.and_then(export_format) {
            Some(format) => {
                tracing::debug!(file_id, export_mime = format.mime_type, "Exporting Workspace file");
                let response = self
                    .client
                    .get(format!("{}/export", url))
                    .bearer_auth(access_token)
                    .query(&[("mimeType", format.mime_type)])
                    .send()
                    .await?;
                let bytes = checked_bytes(response).await?;

                let name = if name.ends_with(format.extension) {
                    name.to_string()
                } else {
                    format!("{}{}", name, format.extension)
                };

                Ok(DownloadedFile {
                    bytes,
                    name,
                    mime_type: Some(format.mime_type.to_string()),
                })
            }
            None => {
                let response = self
                    .client
                    .get(url)
                    .bearer_auth(access_token)
                    .query(&[("alt", "media")])
                    .send()
                    .await?;
                let bytes = checked_bytes(response).await?;

                Ok(DownloadedFile {
                    bytes,
                    name: name.to_string(),
                    mime_type: mime_type.map(str::to_string),
                })
            }
        }
    }
}

/// Drive search expression: never trashed, optionally filtered by name.
fn build_query(name_filter: Option<&str>) -> String {
    let mut q = String::from("trashed=false");
    if let Some(filter) = name_filter.filter(|f| !f.is_empty()) {
        let escaped = filter.replace('\\', "\\\\").replace('\'', "\\'");
        q.push_str(&format!(" and name contains '{}'", escaped));
    }
    q
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn query_escapes_quotes() {
        assert_eq!(build_query(None), "trashed=false");
        assert_eq!(build_query(Some("")), "trashed=false");
        assert_eq!(
            build_query(Some("Bob's plan")),
            "trashed=false and name contains 'Bob\\'s plan'"
        );
    }

    #[test]
    fn workspace_types_export() {
        assert_eq!(
            export_format("application/vnd.google-apps.document").map(|f| f.extension),
            Some(".pdf")
        );
        assert_eq!(
            export_format("application/vnd.google-apps.spreadsheet").map(|f| f.mime_type),
            Some(XLSX_MIME_TYPE)
        );
        assert!(export_format("application/pdf").is_none());
        assert!(export_format(FOLDER_MIME_TYPE).is_none());
    }
}
