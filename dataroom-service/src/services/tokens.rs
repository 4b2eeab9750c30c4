//! OAuth token lifecycle on top of the single stored token row.

use crate::models::OAuthToken;
use crate::services::database::Database;
use crate::services::google_oauth::{GoogleOAuthClient, TokenGrant};
use chrono::{Duration, Utc};
use service_core::error::AppError;

/// Access tokens expiring within this window are refreshed before use.
const REFRESH_SKEW_SECONDS: i64 = 60;

#[derive(Clone)]
pub struct TokenManager {
    db: Database,
    oauth: GoogleOAuthClient,
}

impl TokenManager {
    pub fn new(db: Database, oauth: GoogleOAuthClient) -> Self {
        Self { db, oauth }
    }

    /// Whether the stored credentials can (still) be used.
    ///
    /// An expired token is refreshed on the spot; a failed refresh counts as
    /// signed out rather than as an error.
    pub async fn is_authenticated(&self) -> Result<bool, AppError> {
        let Some(token) = self.db.latest_token().await? else {
            return Ok(false);
        };

        let now = Utc::now();
        if token.is_valid_at(now) {
            return Ok(true);
        }

        match (&token.refresh_token, token.token_expiry) {
            (None, _) => Ok(false),
            (Some(_), None) => Ok(true),
            (Some(refresh_token), Some(_)) => match self.refresh(&token, refresh_token).await {
                Ok(_) => Ok(true),
                Err(e) => {
                    tracing::warn!(error = %e, "Stored credentials could not be refreshed");
                    Ok(false)
                }
            },
        }
    }

    /// A usable access token, refreshing it first when it is about to expire.
    ///
    /// Fails with `Unauthorized` when there are no credentials or they can no
    /// longer be refreshed.
    pub async fn access_token(&self) -> Result<String, AppError> {
        let token = self
            .db
            .latest_token()
            .await?
            .ok_or_else(not_authenticated)?;

        if !token.needs_refresh(Utc::now(), Duration::seconds(REFRESH_SKEW_SECONDS)) {
            return Ok(token.access_token);
        }

        let refresh_token = token.refresh_token.clone().ok_or_else(|| {
            tracing::info!("Access token expired and no refresh token is stored");
            not_authenticated()
        })?;

        self.refresh(&token, &refresh_token).await.map_err(|e| {
            tracing::warn!(error = %e, "Failed to refresh access token");
            not_authenticated()
        })
    }

    /// Persist tokens obtained from the authorization code exchange.
    pub async fn store_grant(&self, grant: &TokenGrant) -> Result<OAuthToken, AppError> {
        self.db
            .save_token(
                &grant.access_token,
                grant.refresh_token.as_deref(),
                grant.expiry_from(Utc::now()),
            )
            .await
    }

    /// Forget all stored credentials.
    pub async fn clear(&self) -> Result<(), AppError> {
        let removed = self.db.delete_tokens().await?;
        tracing::info!(removed, "Cleared stored OAuth tokens");
        Ok(())
    }

    async fn refresh(&self, token: &OAuthToken, refresh_token: &str) -> Result<String, AppError> {
        let grant = self.oauth.refresh(refresh_token).await?;
        let saved = self.store_grant(&grant).await?;
        tracing::info!(token_id = token.id, "Refreshed Google access token");
        Ok(saved.access_token)
    }
}

fn not_authenticated() -> AppError {
    AppError::Unauthorized(anyhow::anyhow!("Not authenticated"))
}
