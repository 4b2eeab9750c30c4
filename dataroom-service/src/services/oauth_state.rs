//! Pending OAuth authorizations keyed by the `state` parameter.
//!
//! Each login issues a random `state` and a PKCE verifier. The callback must
//! present a known, unexpired `state`; its verifier is consumed exactly once.

use base64::{engine::general_purpose::URL_SAFE_NO_PAD, Engine as _};
use dashmap::DashMap;
use rand::Rng;
use sha2::{Digest, Sha256};
use std::sync::Arc;
use std::time::{Duration, Instant};

const DEFAULT_TTL: Duration = Duration::from_secs(10 * 60);

struct PendingAuthorization {
    code_verifier: String,
    created_at: Instant,
}

/// Values to embed in the consent URL.
#[derive(Debug, Clone)]
pub struct AuthorizationRequest {
    pub state: String,
    pub code_challenge: String,
}

#[derive(Clone)]
pub struct OAuthStateStore {
    pending: Arc<DashMap<String, PendingAuthorization>>,
    ttl: Duration,
}

impl Default for OAuthStateStore {
    fn default() -> Self {
        Self::new(DEFAULT_TTL)
    }
}

impl OAuthStateStore {
    pub fn new(ttl: Duration) -> Self {
        Self {
            pending: Arc::new(DashMap::new()),
            ttl,
        }
    }

    /// Start an authorization: remember a fresh verifier under a fresh state.
    pub fn begin(&self) -> AuthorizationRequest {
        self.prune_expired();

        let state = random_token();
        let code_verifier = random_token();
        let code_challenge = {
            let mut hasher = Sha256::new();
            hasher.update(code_verifier.as_bytes());
            URL_SAFE_NO_PAD.encode(hasher.finalize())
        };

        self.pending.insert(
            state.clone(),
            PendingAuthorization {
                code_verifier,
                created_at: Instant::now(),
            },
        );

        AuthorizationRequest {
            state,
            code_challenge,
        }
    }

    /// Consume `state`, returning its PKCE verifier if it is known and fresh.
    pub fn complete(&self, state: &str) -> Option<String> {
        let (_, pending) = self.pending.remove(state)?;
        if pending.created_at.elapsed() > self.ttl {
            return None;
        }
        Some(pending.code_verifier)
    }

    pub fn len(&self) -> usize {
        self.pending.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pending.is_empty()
    }

    fn prune_expired(&self) {
        let ttl = self.ttl;
        self.pending
            .retain(|_, pending| pending.created_at.elapsed() <= ttl);
    }
}

fn random_token() -> String {
    let mut bytes = [0u8; 32];
    rand::thread_rng().fill(&mut bytes);
    URL_SAFE_NO_PAD.encode(bytes)
}
