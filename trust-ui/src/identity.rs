//! Identity resolution
//!
//! The embedding shell forwards the messaging-platform identity as request
//! headers when it runs inside the host app, or a locally persisted guest id
//! when it runs in a bare browser. Resolution never fails: with no headers
//! at all a fresh guest identity is minted for the request.

use axum::{async_trait, extract::FromRequestParts, http::request::Parts};
use std::convert::Infallible;
use uuid::Uuid;

/// Platform user id header, set by the shell inside the host app
pub const HEADER_TELEGRAM_ID: &str = "x-telegram-id";
pub const HEADER_USERNAME: &str = "x-telegram-username";
pub const HEADER_FIRST_NAME: &str = "x-telegram-first-name";
pub const HEADER_LAST_NAME: &str = "x-telegram-last-name";

/// Guest id header, persisted by the shell in local storage
pub const HEADER_GUEST_ID: &str = "x-guest-id";

/// Cookie fallback for shells that cannot set headers
pub const GUEST_COOKIE: &str = "trust_guest_id";

/// Resolved viewer identity
#[derive(Debug, Clone)]
pub struct Identity {
    /// Stable external id (stringified platform id, or guest id)
    pub id: String,
    pub username: Option<String>,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    /// True when no platform identity was present
    pub is_fallback: bool,
}

impl Identity {
    fn from_parts(parts: &Parts) -> Identity {
        let header = |name: &str| {
            parts
                .headers
                .get(name)
                .and_then(|v| v.to_str().ok())
                .map(|s| s.trim().to_string())
                .filter(|s| !s.is_empty())
        };

        if let Some(id) = header(HEADER_TELEGRAM_ID) {
            return Identity {
                id,
                username: header(HEADER_USERNAME),
                first_name: header(HEADER_FIRST_NAME),
                last_name: header(HEADER_LAST_NAME),
                is_fallback: false,
            };
        }

        let guest_id = header(HEADER_GUEST_ID)
            .or_else(|| cookie_value(parts, GUEST_COOKIE))
            .unwrap_or_else(|| format!("web-{}", Uuid::new_v4()));

        Identity {
            id: guest_id,
            username: None,
            first_name: None,
            last_name: None,
            is_fallback: true,
        }
    }
}

fn cookie_value(parts: &Parts, name: &str) -> Option<String> {
    let cookies = parts.headers.get("cookie")?.to_str().ok()?;
    cookies.split(';').find_map(|pair| {
        let (key, value) = pair.split_once('=')?;
        if key.trim() == name {
            let value = value.trim();
            if value.is_empty() {
                None
            } else {
                Some(value.to_string())
            }
        } else {
            None
        }
    })
}

#[async_trait]
impl<S> FromRequestParts<S> for Identity
where
    S: Send + Sync,
{
    type Rejection = Infallible;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        Ok(Identity::from_parts(parts))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::Request;

    fn parts_for(headers: &[(&str, &str)]) -> Parts {
        let mut builder = Request::builder().uri("/");
        for (name, value) in headers {
            builder = builder.header(*name, *value);
        }
        let (parts, _) = builder.body(()).unwrap().into_parts();
        parts
    }

    #[test]
    fn test_platform_identity_preferred() {
        let parts = parts_for(&[
            (HEADER_TELEGRAM_ID, "12345"),
            (HEADER_USERNAME, "manta"),
            (HEADER_GUEST_ID, "web-should-be-ignored"),
        ]);
        let identity = Identity::from_parts(&parts);
        assert_eq!(identity.id, "12345");
        assert_eq!(identity.username.as_deref(), Some("manta"));
        assert!(!identity.is_fallback);
    }

    #[test]
    fn test_guest_header_reused() {
        let parts = parts_for(&[(HEADER_GUEST_ID, "web-abc")]);
        let identity = Identity::from_parts(&parts);
        assert_eq!(identity.id, "web-abc");
        assert!(identity.is_fallback);
    }

    #[test]
    fn test_guest_cookie_reused() {
        let parts = parts_for(&[("cookie", "other=1; trust_guest_id=web-xyz")]);
        let identity = Identity::from_parts(&parts);
        assert_eq!(identity.id, "web-xyz");
        assert!(identity.is_fallback);
    }

    #[test]
    fn test_bare_request_mints_guest_id() {
        let identity = Identity::from_parts(&parts_for(&[]));
        assert!(identity.id.starts_with("web-"));
        assert!(identity.is_fallback);
    }
}
