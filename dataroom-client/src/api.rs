//! Typed client for the data room REST API.
//!
//! Every call issues exactly one request. Non-2xx answers become
//! [`ClientError::Api`] carrying the body's `error` field, or a fixed
//! per-operation message when the body has none.

use crate::error::ClientError;
use crate::models::{
    AuthStatus, DriveFileList, FileListResponse, ImportRequest, ImportResponse, LoginResponse,
    SuccessResponse,
};
use reqwest::{Client, RequestBuilder};
use serde::de::DeserializeOwned;

#[derive(Clone)]
pub struct ApiClient {
    client: Client,
    base_url: String,
}

impl ApiClient {
    /// `base_url` is the API root, e.g. `http://localhost:5001/api`.
    pub fn new(base_url: impl Into<String>) -> Self {
        Self::with_client(Client::new(), base_url)
    }

    pub fn with_client(client: Client, base_url: impl Into<String>) -> Self {
        Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub async fn auth_status(&self) -> Result<AuthStatus, ClientError> {
        self.send(
            self.client.get(self.url("/auth/status")),
            "Failed to check auth status",
        )
        .await
    }

    pub async fn login_url(&self) -> Result<LoginResponse, ClientError> {
        self.send(
            self.client.get(self.url("/auth/login")),
            "Failed to start login",
        )
        .await
    }

    pub async fn logout(&self) -> Result<SuccessResponse, ClientError> {
        self.send(
            self.client.post(self.url("/auth/logout")),
            "Failed to logout",
        )
        .await
    }

    /// One page of Drive files. Empty or absent parameters are not sent.
    pub async fn drive_files(
        &self,
        page_token: Option<&str>,
        query: Option<&str>,
    ) -> Result<DriveFileList, ClientError> {
        let mut params = Vec::new();
        if let Some(token) = page_token.filter(|t| !t.is_empty()) {
            params.push(("pageToken", token));
        }
        if let Some(query) = query.filter(|q| !q.is_empty()) {
            params.push(("query", query));
        }

        self.send(
            self.client.get(self.url("/drive/files")).query(&params),
            "Failed to fetch Drive files",
        )
        .await
    }

    pub async fn import_file(&self, request: &ImportRequest) -> Result<ImportResponse, ClientError> {
        self.send(
            self.client.post(self.url("/drive/import")).json(request),
            "Failed to import file",
        )
        .await
    }

    pub async fn list_files(&self) -> Result<FileListResponse, ClientError> {
        self.send(self.client.get(self.url("/files")), "Failed to fetch files")
            .await
    }

    pub async fn search_files(&self, query: &str) -> Result<FileListResponse, ClientError> {
        self.send(
            self.client
                .get(self.url("/files/search"))
                .query(&[("q", query)]),
            "Failed to search files",
        )
        .await
    }

    pub async fn delete_file(&self, id: i64) -> Result<SuccessResponse, ClientError> {
        self.send(
            self.client.delete(self.url(&format!("/files/{}", id))),
            "Failed to delete file",
        )
        .await
    }

    /// Where the backend serves a file's bytes for viewing.
    pub fn view_url(&self, id: i64) -> String {
        self.url(&format!("/files/{}", id))
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    async fn send<T: DeserializeOwned>(
        &self,
        request: RequestBuilder,
        fallback: &str,
    ) -> Result<T, ClientError> {
        let response = request.send().await?;
        let status = response.status();
        let body = response.bytes().await?;

        if !status.is_success() {
            let message = error_message(&body).unwrap_or_else(|| fallback.to_string());
            tracing::debug!(status = status.as_u16(), %message, "API request failed");
            return Err(ClientError::Api {
                status: status.as_u16(),
                message,
            });
        }

        Ok(serde_json::from_slice(&body)?)
    }
}

fn error_message(body: &[u8]) -> Option<String> {
    let value: serde_json::Value = serde_json::from_slice(body).ok()?;
    value
        .get("error")
        .and_then(|e| e.as_str())
        .filter(|e| !e.is_empty())
        .map(str::to_string)
}
