//! Stored Google OAuth credentials.

use chrono::{DateTime, Duration, Utc};
use sqlx::FromRow;

/// Google OAuth token row.
///
/// The access token lives about an hour; the refresh token is long-lived and
/// may be absent when Google did not grant one.
#[derive(Debug, Clone, FromRow)]
pub struct OAuthToken {
    pub id: i64,
    pub access_token: String,
    pub refresh_token: Option<String>,
    pub token_expiry: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl OAuthToken {
    /// Strictly unexpired at `now`. Tokens without a recorded expiry are not "valid"
    /// by this test; callers decide how to treat them.
    pub fn is_valid_at(&self, now: DateTime<Utc>) -> bool {
        matches!(self.token_expiry, Some(expiry) if expiry > now)
    }

    /// Expired, or expiring within `skew` of `now`. Unknown expiry never counts as expired.
    pub fn needs_refresh(&self, now: DateTime<Utc>, skew: Duration) -> bool {
        matches!(self.token_expiry, Some(expiry) if expiry <= now + skew)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn token(expiry: Option<DateTime<Utc>>) -> OAuthToken {
        let now = Utc::now();
        OAuthToken {
            id: 1,
            access_token: "access".to_string(),
            refresh_token: Some("refresh".to_string()),
            token_expiry: expiry,
            created_at: now,
            updated_at: now,
        }
    }

    #[test]
    fn future_expiry_is_valid() {
        let now = Utc::now();
        let t = token(Some(now + Duration::minutes(30)));
        assert!(t.is_valid_at(now));
        assert!(!t.needs_refresh(now, Duration::seconds(60)));
    }

    #[test]
    fn expiry_inside_skew_needs_refresh() {
        let now = Utc::now();
        let t = token(Some(now + Duration::seconds(30)));
        assert!(t.is_valid_at(now));
        assert!(t.needs_refresh(now, Duration::seconds(60)));
    }

    #[test]
    fn unknown_expiry_is_neither_valid_nor_expired() {
        let now = Utc::now();
        let t = token(None);
        assert!(!t.is_valid_at(now));
        assert!(!t.needs_refresh(now, Duration::seconds(60)));
    }
}
