//! OAuth access token cache.
//!
//! One process-wide slot, constructed at startup and injected into the
//! carrier client. Refresh is lazy: an expired slot is simply replaced by the
//! next successful exchange, and a failed exchange leaves the slot unchanged.
//! Concurrent refreshes may race and perform redundant exchanges; the
//! exchange is idempotent so no coordination is applied.

use chrono::{DateTime, Duration, Utc};
use tokio::sync::RwLock;

/// A bearer token with its computed expiry instant.
#[derive(Debug, Clone)]
pub struct AccessToken {
    pub token: String,
    pub expires_at: DateTime<Utc>,
}

/// Single-slot token cache shared by all requests.
#[derive(Debug, Default)]
pub struct TokenCache {
    slot: RwLock<Option<AccessToken>>,
}

impl TokenCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Return the cached token if it has not expired at `now`.
    pub async fn fresh(&self, now: DateTime<Utc>) -> Option<String> {
        let slot = self.slot.read().await;
        slot.as_ref()
            .filter(|cached| now < cached.expires_at)
            .map(|cached| cached.token.clone())
    }

    /// Replace the slot with a newly exchanged token.
    pub async fn store(&self, token: String, expires_in_seconds: i64, now: DateTime<Utc>) {
        let mut slot = self.slot.write().await;
        *slot = Some(AccessToken {
            token,
            expires_at: now + Duration::seconds(expires_in_seconds),
        });
    }
}
