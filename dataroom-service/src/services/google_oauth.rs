//! Google OAuth 2.0 client: consent URL, code exchange and token refresh.

use crate::config::{GoogleConfig, GOOGLE_SCOPES};
use crate::services::google_api::{json_or_error, GoogleApiError};
use chrono::{DateTime, Duration, Utc};
use reqwest::Client;
use secrecy::ExposeSecret;
use serde::Deserialize;

/// Tokens returned by the token endpoint.
#[derive(Debug, Clone, Deserialize)]
pub struct TokenGrant {
    pub access_token: String,
    /// Only present on the first consent (or with `prompt=consent`).
    #[serde(default)]
    pub refresh_token: Option<String>,
    /// Lifetime of the access token in seconds.
    #[serde(default)]
    pub expires_in: Option<i64>,
}

impl TokenGrant {
    pub fn expiry_from(&self, now: DateTime<Utc>) -> Option<DateTime<Utc>> {
        self.expires_in.map(|secs| now + Duration::seconds(secs))
    }
}

#[derive(Clone)]
pub struct GoogleOAuthClient {
    client: Client,
    config: GoogleConfig,
}

impl GoogleOAuthClient {
    pub fn new(client: Client, config: GoogleConfig) -> Self {
        Self { client, config }
    }

    /// Check if OAuth credentials are configured.
    pub fn is_configured(&self) -> bool {
        !self.config.client_id.is_empty() && !self.config.client_secret.expose_secret().is_empty()
    }

    /// Consent screen URL requesting offline, read-only Drive access.
    ///
    /// `prompt=consent` makes Google issue a refresh token on every login.
    pub fn authorization_url(&self, state: &str, code_challenge: &str) -> String {
        let scope = GOOGLE_SCOPES.join(" ");
        format!(
            "{}?client_id={}&redirect_uri={}&response_type=code&scope={}&access_type=offline&include_granted_scopes=true&prompt=consent&state={}&code_challenge={}&code_challenge_method=S256",
            self.config.auth_url,
            urlencoding::encode(&self.config.client_id),
            urlencoding::encode(&self.config.redirect_uri),
            urlencoding::encode(&scope),
            urlencoding::encode(state),
            urlencoding::encode(code_challenge),
        )
    }

    /// Exchange an authorization code for tokens.
    pub async fn exchange_code(
        &self,
        code: &str,
        code_verifier: &str,
    ) -> Result<TokenGrant, GoogleApiError> {
        let response = self
            .client
            .post(&self.config.token_url)
            .form(&[
                ("client_id", self.config.client_id.as_str()),
                ("client_secret", self.config.client_secret.expose_secret().as_str()),
                ("code", code),
                ("code_verifier", code_verifier),
                ("grant_type", "authorization_code"),
                ("redirect_uri", self.config.redirect_uri.as_str()),
            ])
            .send()
            .await
            .map_err(|e| {
                tracing::error!(error = %e, "Failed to exchange Google authorization code");
                GoogleApiError::from(e)
            })?;

        json_or_error(response).await
    }

    /// Obtain a new access token from a refresh token.
    pub async fn refresh(&self, refresh_token: &str) -> Result<TokenGrant, GoogleApiError> {
        let response = self
            .client
            .post(&self.config.token_url)
            .form(&[
                ("client_id", self.config.client_id.as_str()),
                ("client_secret", self.config.client_secret.expose_secret().as_str()),
                ("refresh_token", refresh_token),
                ("grant_type", "refresh_token"),
            ])
            .send()
            .await
            .map_err(|e| {
                tracing::error!(error = %e, "Failed to refresh Google access token");
                GoogleApiError::from(e)
            })?;

        json_or_error(response).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use secrecy::Secret;

    fn client() -> GoogleOAuthClient {
        GoogleOAuthClient::new(
            Client::new(),
            GoogleConfig {
                client_id: "client-123".to_string(),
                client_secret: Secret::new("shh".to_string()),
                redirect_uri: "http://localhost:5001/api/auth/callback".to_string(),
                auth_url: "https://accounts.example.com/o/oauth2/auth".to_string(),
                token_url: "https://oauth2.example.com/token".to_string(),
                drive_api_url: "https://drive.example.com/drive/v3".to_string(),
            },
        )
    }

    #[test]
    fn authorization_url_requests_offline_readonly_access() {
        let url = client().authorization_url("state-1", "challenge-1");

        assert!(url.starts_with("https://accounts.example.com/o/oauth2/auth?"));
        assert!(url.contains("client_id=client-123"));
        assert!(url.contains(
            "redirect_uri=http%3A%2F%2Flocalhost%3A5001%2Fapi%2Fauth%2Fcallback"
        ));
        assert!(url.contains("drive.readonly"));
        assert!(url.contains("access_type=offline"));
        assert!(url.contains("prompt=consent"));
        assert!(url.contains("state=state-1"));
        assert!(url.contains("code_challenge=challenge-1"));
    }

    #[test]
    fn expiry_is_relative_to_now() {
        let now = Utc::now();
        let grant = TokenGrant {
            access_token: "a".to_string(),
            refresh_token: None,
            expires_in: Some(3600),
        };
        assert_eq!(grant.expiry_from(now), Some(now + Duration::seconds(3600)));
    }
}
