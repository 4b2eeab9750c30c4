//! Error handling shared by the Google OAuth and Drive clients.

use serde::de::DeserializeOwned;
use service_core::error::AppError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum GoogleApiError {
    #[error("request to Google failed: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("Google returned {status}: {message}")]
    Api { status: u16, message: String },

    #[error("unexpected response from Google: {0}")]
    Decode(#[from] serde_json::Error),
}

impl From<GoogleApiError> for AppError {
    fn from(err: GoogleApiError) -> Self {
        AppError::BadGateway(err.to_string())
    }
}

/// Read a successful JSON body, or turn a non-2xx response into [`GoogleApiError::Api`].
pub(crate) async fn json_or_error<T: DeserializeOwned>(
    response: reqwest::Response,
) -> Result<T, GoogleApiError> {
    let body = checked_bytes(response).await?;
    Ok(serde_json::from_slice(&body)?)
}

/// Read the raw body of a successful response.
pub(crate) async fn checked_bytes(response: reqwest::Response) -> Result<Vec<u8>, GoogleApiError> {
    let status = response.status();
    let body = response.bytes().await?;

    if status.is_success() {
        return Ok(body.to_vec());
    }

    let message = extract_error_message(&body)
        .unwrap_or_else(|| String::from_utf8_lossy(&body).trim().to_string());
    Err(GoogleApiError::Api {
        status: status.as_u16(),
        message,
    })
}

/// Pull a human readable message out of Google's error envelopes.
///
/// OAuth endpoints answer `{"error": "invalid_grant", "error_description": ...}`,
/// Drive answers `{"error": {"code": 404, "message": ...}}`.
fn extract_error_message(body: &[u8]) -> Option<String> {
    let value: serde_json::Value = serde_json::from_slice(body).ok()?;
    let error = value.get("error")?;

    if let Some(message) = error.get("message").and_then(|m| m.as_str()) {
        return Some(message.to_string());
    }

    let code = error.as_str()?;
    match value.get("error_description").and_then(|d| d.as_str()) {
        Some(description) => Some(format!("{}: {}", code, description)),
        None => Some(code.to_string()),
    }
}
