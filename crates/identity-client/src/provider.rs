//! The identity provider seam
//!
//! [`IdentityProvider`] is the trait the auth flow depends on; everything
//! network-shaped hides behind it. [`RestIdentityProvider`] is the real
//! implementation over the Identity Toolkit REST API, holding the current
//! session in memory.

use crate::rest::{AccountResponse, RestClient, RestClientConfig, RestError};
use crate::session::AuthSession;
use async_trait::async_trait;
use parking_lot::RwLock;
use thiserror::Error;
use tracing::{debug, info};

/// Errors surfaced by the identity provider.
///
/// Provider rejections carry the provider's own message and are shown to
/// the user verbatim; the app does not interpret error codes or retry.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ProviderError {
    /// The provider rejected the request (wrong password, email taken, ...)
    #[error("{message}")]
    Service {
        /// The provider's message, verbatim
        message: String,
    },

    /// The request never completed (DNS, TLS, timeout, malformed response)
    #[error("{message}")]
    Transport {
        /// Transport error description
        message: String,
    },
}

impl ProviderError {
    /// The human-readable message for this error.
    pub fn message(&self) -> &str {
        match self {
            ProviderError::Service { message } | ProviderError::Transport { message } => message,
        }
    }
}

impl From<RestError> for ProviderError {
    fn from(err: RestError) -> Self {
        if err.status() == 0 {
            ProviderError::Transport {
                message: err.message().to_string(),
            }
        } else {
            ProviderError::Service {
                message: err.message().to_string(),
            }
        }
    }
}

/// Profile collected by the signup form, forwarded wholesale on submit.
#[derive(Clone, PartialEq, Eq)]
pub struct SignupProfile {
    /// Display name
    pub display_name: String,
    /// Email address
    pub email: String,
    /// Phone number (11 digits)
    pub phone_number: String,
    /// Chosen password
    pub password: String,
}

// The password stays out of logs.
impl std::fmt::Debug for SignupProfile {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SignupProfile")
            .field("display_name", &self.display_name)
            .field("email", &self.email)
            .field("phone_number", &self.phone_number)
            .field("password", &"<redacted>")
            .finish()
    }
}

/// A third-party-issued token exchanged for a provider session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FederatedCredential {
    /// The IdP-issued ID token
    pub id_token: String,
    /// IdP identifier, e.g. "google.com"
    pub provider_id: String,
}

impl FederatedCredential {
    /// A Google-issued credential.
    pub fn google(id_token: impl Into<String>) -> Self {
        Self {
            id_token: id_token.into(),
            provider_id: "google.com".to_string(),
        }
    }
}

/// A signed-in user as reported by the provider.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthenticatedUser {
    /// The account's email, or the provider-issued display name when the
    /// provider did not report an email (federated accounts)
    pub identifier: String,
    /// Provider-local account id
    pub user_id: String,
    /// Opaque session credential; never inspected or persisted by the app
    pub session: AuthSession,
}

impl AuthenticatedUser {
    fn from_response(response: AccountResponse) -> Self {
        let session = AuthSession::new(
            response.id_token,
            response.refresh_token,
            &response.expires_in,
        );
        let identifier = response
            .email
            .or(response.display_name)
            .unwrap_or_else(|| response.local_id.clone());
        Self {
            identifier,
            user_id: response.local_id,
            session,
        }
    }
}

/// Capability surface of the external identity provider.
///
/// Sign-in and account creation are network round-trips with no app-imposed
/// deadline beyond the HTTP client's timeout; sign-out and session lookup
/// are local and synchronous.
#[async_trait]
pub trait IdentityProvider: Send + Sync {
    /// Verify email/password credentials and open a session.
    async fn sign_in_with_password(
        &self,
        identifier: &str,
        secret: &str,
    ) -> Result<AuthenticatedUser, ProviderError>;

    /// Create an account and open a session for it.
    async fn create_account(
        &self,
        profile: SignupProfile,
    ) -> Result<AuthenticatedUser, ProviderError>;

    /// Exchange a federated credential for a session.
    async fn sign_in_with_federated(
        &self,
        credential: FederatedCredential,
    ) -> Result<AuthenticatedUser, ProviderError>;

    /// Drop the current session. Always succeeds from the caller's side.
    fn sign_out(&self);

    /// The current live session, if any.
    fn current_session(&self) -> Option<AuthenticatedUser>;
}

/// [`IdentityProvider`] implementation over the Identity Toolkit REST API.
///
/// Holds the current session in memory only; there is no session file and
/// no token refresh. One instance is shared across the app.
///
/// # Example
///
/// ```rust,no_run
/// use identity_client::{IdentityProvider, RestClientConfig, RestIdentityProvider};
///
/// #[tokio::main]
/// async fn main() -> Result<(), Box<dyn std::error::Error>> {
///     let provider = RestIdentityProvider::new(RestClientConfig::new("api-key"));
///     let user = provider
///         .sign_in_with_password("alice@example.com", "hunter2AA!")
///         .await?;
///     println!("signed in as {}", user.identifier);
///     Ok(())
/// }
/// ```
pub struct RestIdentityProvider {
    rest: RestClient,
    current: RwLock<Option<AuthenticatedUser>>,
}

impl RestIdentityProvider {
    /// Create a provider over the given REST configuration.
    pub fn new(config: RestClientConfig) -> Self {
        Self {
            rest: RestClient::new(config),
            current: RwLock::new(None),
        }
    }

    fn install_session(&self, response: AccountResponse) -> AuthenticatedUser {
        let user = AuthenticatedUser::from_response(response);
        *self.current.write() = Some(user.clone());
        user
    }
}

#[async_trait]
impl IdentityProvider for RestIdentityProvider {
    async fn sign_in_with_password(
        &self,
        identifier: &str,
        secret: &str,
    ) -> Result<AuthenticatedUser, ProviderError> {
        debug!(identifier, "signing in with password");
        let response = self
            .rest
            .sign_in_with_password(identifier.trim(), secret)
            .await?;
        let user = self.install_session(response);
        info!(identifier = %user.identifier, "sign-in succeeded");
        Ok(user)
    }

    async fn create_account(
        &self,
        profile: SignupProfile,
    ) -> Result<AuthenticatedUser, ProviderError> {
        debug!(email = %profile.email, "creating account");
        let response = self
            .rest
            .sign_up(profile.email.trim(), &profile.password)
            .await?;
        let user = self.install_session(response);
        info!(identifier = %user.identifier, "account created");
        Ok(user)
    }

    async fn sign_in_with_federated(
        &self,
        credential: FederatedCredential,
    ) -> Result<AuthenticatedUser, ProviderError> {
        debug!(provider = %credential.provider_id, "federated sign-in");
        let response = self
            .rest
            .sign_in_with_idp(&credential.id_token, &credential.provider_id)
            .await?;
        let user = self.install_session(response);
        info!(identifier = %user.identifier, "federated sign-in succeeded");
        Ok(user)
    }

    fn sign_out(&self) {
        if self.current.write().take().is_some() {
            info!("signed out");
        }
    }

    fn current_session(&self) -> Option<AuthenticatedUser> {
        let guard = self.current.read();
        match guard.as_ref() {
            Some(user) if !user.session.is_expired() => Some(user.clone()),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rest::AccountResponse;

    fn response(email: Option<&str>, display_name: Option<&str>) -> AccountResponse {
        AccountResponse {
            id_token: "id-token".to_string(),
            refresh_token: "refresh-token".to_string(),
            expires_in: "3600".to_string(),
            local_id: "uid-1".to_string(),
            email: email.map(str::to_string),
            display_name: display_name.map(str::to_string),
        }
    }

    #[test]
    fn test_identifier_prefers_email() {
        let user = AuthenticatedUser::from_response(response(Some("a@b.co"), Some("Alice")));
        assert_eq!(user.identifier, "a@b.co");
    }

    #[test]
    fn test_identifier_falls_back_to_display_name() {
        let user = AuthenticatedUser::from_response(response(None, Some("Alice")));
        assert_eq!(user.identifier, "Alice");
    }

    #[test]
    fn test_identifier_falls_back_to_local_id() {
        let user = AuthenticatedUser::from_response(response(None, None));
        assert_eq!(user.identifier, "uid-1");
    }

    #[test]
    fn test_provider_error_message_is_verbatim() {
        let err = ProviderError::from(RestError::new(400, "INVALID_PASSWORD"));
        assert_eq!(err.message(), "INVALID_PASSWORD");
        assert_eq!(err.to_string(), "INVALID_PASSWORD");
        assert!(matches!(err, ProviderError::Service { .. }));
    }

    #[test]
    fn test_transport_error_mapping() {
        let err = ProviderError::from(RestError::new(0, "Request failed: timed out"));
        assert!(matches!(err, ProviderError::Transport { .. }));
    }

    #[test]
    fn test_signup_profile_debug_redacts_password() {
        let profile = SignupProfile {
            display_name: "Alice".to_string(),
            email: "a@b.co".to_string(),
            phone_number: "12345678901".to_string(),
            password: "Abcdef1!".to_string(),
        };
        let rendered = format!("{:?}", profile);
        assert!(!rendered.contains("Abcdef1!"));
    }

    #[test]
    fn test_federated_credential_google() {
        let cred = FederatedCredential::google("idp-token");
        assert_eq!(cred.provider_id, "google.com");
    }

    #[test]
    fn test_current_session_empty_by_default() {
        let provider = RestIdentityProvider::new(RestClientConfig::new("key"));
        assert!(provider.current_session().is_none());
    }

    #[test]
    fn test_sign_out_clears_session() {
        let provider = RestIdentityProvider::new(RestClientConfig::new("key"));
        provider.install_session(response(Some("a@b.co"), None));
        assert!(provider.current_session().is_some());

        provider.sign_out();
        assert!(provider.current_session().is_none());
    }

    #[test]
    fn test_expired_session_is_not_current() {
        let provider = RestIdentityProvider::new(RestClientConfig::new("key"));
        let mut expired = response(Some("a@b.co"), None);
        expired.expires_in = "0".to_string();
        provider.install_session(expired);
        assert!(provider.current_session().is_none());
    }
}
