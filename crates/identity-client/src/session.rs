//! In-memory session data
//!
//! A session exists only between a successful sign-in and sign-out (or
//! process exit). Nothing here is written to disk.

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

/// Opaque session credential returned by the provider.
///
/// The app never inspects the tokens; they exist so `current_session` can
/// report whether a live session is present.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuthSession {
    /// Provider-issued ID token
    pub id_token: String,
    /// Provider-issued refresh token
    pub refresh_token: String,
    /// When the ID token stops being valid
    pub expires_at: DateTime<Utc>,
}

impl AuthSession {
    /// Build a session from the provider's token pair and lifetime.
    ///
    /// `expires_in` is the provider's decimal-string lifetime in seconds;
    /// an unparseable value is treated as already expired.
    pub fn new(
        id_token: impl Into<String>,
        refresh_token: impl Into<String>,
        expires_in: &str,
    ) -> Self {
        let seconds = expires_in.parse::<i64>().unwrap_or(0);
        Self {
            id_token: id_token.into(),
            refresh_token: refresh_token.into(),
            expires_at: Utc::now() + Duration::seconds(seconds),
        }
    }

    /// Whether the ID token has expired.
    pub fn is_expired(&self) -> bool {
        Utc::now() >= self.expires_at
    }
}

// Tokens stay out of logs.
impl std::fmt::Debug for AuthSession {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AuthSession")
            .field("id_token", &"<redacted>")
            .field("refresh_token", &"<redacted>")
            .field("expires_at", &self.expires_at)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fresh_session_not_expired() {
        let session = AuthSession::new("id", "refresh", "3600");
        assert!(!session.is_expired());
    }

    #[test]
    fn test_zero_lifetime_is_expired() {
        let session = AuthSession::new("id", "refresh", "0");
        assert!(session.is_expired());
    }

    #[test]
    fn test_unparseable_lifetime_is_expired() {
        let session = AuthSession::new("id", "refresh", "not-a-number");
        assert!(session.is_expired());
    }

    #[test]
    fn test_debug_redacts_tokens() {
        let session = AuthSession::new("secret-id-token", "secret-refresh", "3600");
        let rendered = format!("{:?}", session);
        assert!(!rendered.contains("secret-id-token"));
        assert!(!rendered.contains("secret-refresh"));
    }
}
