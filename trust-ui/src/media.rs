//! Time-limited media access grants
//!
//! Demo tracks live in a private media folder; playback goes through an
//! opaque token minted after the access gate passes. Grants expire after
//! [`MEDIA_URL_TTL_SECS`] and are purged lazily.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use chrono::{DateTime, Duration, Utc};
use uuid::Uuid;

use trust_common::config::MEDIA_URL_TTL_SECS;

#[derive(Debug, Clone)]
struct Grant {
    storage_path: String,
    expires_at: DateTime<Utc>,
}

/// Registry of outstanding media grants
#[derive(Clone, Default)]
pub struct MediaTokens {
    inner: Arc<Mutex<HashMap<String, Grant>>>,
}

impl MediaTokens {
    pub fn new() -> Self {
        Self::default()
    }

    /// Mint a token for a storage path, valid for the configured window.
    pub fn mint(&self, storage_path: &str) -> String {
        self.mint_with_ttl(storage_path, Duration::seconds(MEDIA_URL_TTL_SECS))
    }

    fn mint_with_ttl(&self, storage_path: &str, ttl: Duration) -> String {
        let token = Uuid::new_v4().simple().to_string();
        let grant = Grant {
            storage_path: storage_path.to_string(),
            expires_at: Utc::now() + ttl,
        };
        self.inner
            .lock()
            .expect("media tokens poisoned")
            .insert(token.clone(), grant);
        token
    }

    /// Resolve a token to its storage path, if still valid.
    ///
    /// Expired grants are dropped on the way; a valid grant stays usable
    /// until expiry (the player may re-request the same URL).
    pub fn redeem(&self, token: &str) -> Option<String> {
        let mut map = self.inner.lock().expect("media tokens poisoned");
        let now = Utc::now();
        map.retain(|_, grant| grant.expires_at > now);
        map.get(token).map(|grant| grant.storage_path.clone())
    }

    #[cfg(test)]
    fn mint_expired(&self, storage_path: &str) -> String {
        self.mint_with_ttl(storage_path, Duration::seconds(-1))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mint_and_redeem() {
        let tokens = MediaTokens::new();
        let token = tokens.mint("demo/track1.mp3");

        assert_eq!(tokens.redeem(&token).as_deref(), Some("demo/track1.mp3"));
        // Reusable within the validity window
        assert_eq!(tokens.redeem(&token).as_deref(), Some("demo/track1.mp3"));
    }

    #[test]
    fn test_unknown_token_rejected() {
        let tokens = MediaTokens::new();
        assert!(tokens.redeem("not-a-token").is_none());
    }

    #[test]
    fn test_expired_grant_purged() {
        let tokens = MediaTokens::new();
        let expired = tokens.mint_expired("demo/old.mp3");
        let live = tokens.mint("demo/new.mp3");

        assert!(tokens.redeem(&expired).is_none());
        assert!(tokens.redeem(&live).is_some());
    }
}
