//! REST client for the provider's Identity Toolkit API
//!
//! This module implements the HTTP layer: typed request/response DTOs for
//! the three account endpoints the app uses, a configurable client, and
//! parsing of the provider's error envelope. Provider errors are opaque to
//! the rest of the app; only the message string travels upward.

use serde::{Deserialize, Serialize};
use std::time::Duration;

// =============================================================================
// Error Types
// =============================================================================

/// Error returned by an Identity Toolkit endpoint.
///
/// This covers both transport failures (status 0) and application-level
/// rejections such as `EMAIL_EXISTS` or `INVALID_PASSWORD`. The message is
/// surfaced to the user verbatim; no classification or retry happens here.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RestError {
    /// HTTP status code (0 for transport failures)
    status: u16,
    /// Provider error message (e.g., "INVALID_PASSWORD")
    message: String,
}

impl RestError {
    /// Create a new REST error.
    pub fn new(status: u16, message: impl Into<String>) -> Self {
        Self {
            status,
            message: message.into(),
        }
    }

    /// Get the HTTP status code.
    pub fn status(&self) -> u16 {
        self.status
    }

    /// Get the provider's error message.
    pub fn message(&self) -> &str {
        &self.message
    }
}

impl std::fmt::Display for RestError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl std::error::Error for RestError {}

// =============================================================================
// Client Configuration
// =============================================================================

/// Configuration for the REST client.
#[derive(Debug, Clone)]
pub struct RestClientConfig {
    /// Base service URL
    pub base_url: String,
    /// Provider API key, appended to every request
    pub api_key: String,
    /// Request timeout
    pub timeout: Duration,
    /// User agent string
    pub user_agent: String,
}

impl Default for RestClientConfig {
    fn default() -> Self {
        Self {
            base_url: "https://identitytoolkit.googleapis.com".to_string(),
            api_key: String::new(),
            timeout: Duration::from_secs(30),
            user_agent: format!("Lumen/{}", env!("CARGO_PKG_VERSION")),
        }
    }
}

impl RestClientConfig {
    /// Create a new config with the given API key.
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            ..Default::default()
        }
    }

    /// Set the base service URL.
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    /// Set the request timeout.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Set the user agent.
    pub fn with_user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = user_agent.into();
        self
    }
}

// =============================================================================
// Request / Response Types
// =============================================================================

/// Request body for `accounts:signInWithPassword`.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PasswordSignInRequest {
    /// Account email
    pub email: String,
    /// Account password
    pub password: String,
    /// Ask the provider for ID and refresh tokens
    pub return_secure_token: bool,
}

/// Request body for `accounts:signUp`.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SignUpRequest {
    /// Account email
    pub email: String,
    /// Account password
    pub password: String,
    /// Ask the provider for ID and refresh tokens
    pub return_secure_token: bool,
}

/// Request body for `accounts:signInWithIdp` (federated sign-in).
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct IdpSignInRequest {
    /// URL-encoded credential, e.g. `id_token=...&providerId=google.com`
    pub post_body: String,
    /// The URI the IdP redirect came from
    pub request_uri: String,
    /// Ask the provider for ID and refresh tokens
    pub return_secure_token: bool,
    /// Return the raw IdP credential on error
    pub return_idp_credential: bool,
}

/// Response from the account endpoints.
///
/// All three endpoints return this shape; fields absent from a particular
/// endpoint deserialize as `None`.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AccountResponse {
    /// Session ID token (opaque to this app)
    pub id_token: String,
    /// Refresh token
    pub refresh_token: String,
    /// Token lifetime in seconds, as a decimal string
    pub expires_in: String,
    /// Provider-local account id
    pub local_id: String,
    /// Account email, when the provider knows it
    #[serde(default)]
    pub email: Option<String>,
    /// Display name, for federated accounts
    #[serde(default)]
    pub display_name: Option<String>,
}

/// Provider error envelope: `{ "error": { "code": ..., "message": ... } }`.
#[derive(Debug, Clone, Deserialize)]
struct ErrorEnvelope {
    error: ErrorBody,
}

#[derive(Debug, Clone, Deserialize)]
struct ErrorBody {
    message: String,
}

// =============================================================================
// Client
// =============================================================================

/// HTTP client for the Identity Toolkit account endpoints.
///
/// # Examples
/// ```rust,no_run
/// use identity_client::rest::{RestClient, RestClientConfig};
///
/// async fn example() -> Result<(), Box<dyn std::error::Error>> {
///     let config = RestClientConfig::new("api-key");
///     let client = RestClient::new(config);
///
///     let response = client
///         .sign_in_with_password("alice@example.com", "hunter2AA!")
///         .await?;
///     println!("signed in as {}", response.local_id);
///     Ok(())
/// }
/// ```
#[derive(Debug, Clone)]
pub struct RestClient {
    client: reqwest::Client,
    config: RestClientConfig,
}

impl RestClient {
    /// Create a new REST client.
    pub fn new(config: RestClientConfig) -> Self {
        let client = reqwest::Client::builder()
            .timeout(config.timeout)
            .user_agent(&config.user_agent)
            .build()
            .expect("Failed to build HTTP client");

        Self { client, config }
    }

    /// Sign in with email and password.
    pub async fn sign_in_with_password(
        &self,
        email: &str,
        password: &str,
    ) -> Result<AccountResponse, RestError> {
        let body = PasswordSignInRequest {
            email: email.to_string(),
            password: password.to_string(),
            return_secure_token: true,
        };
        self.post("accounts:signInWithPassword", &body).await
    }

    /// Create a new email/password account.
    pub async fn sign_up(&self, email: &str, password: &str) -> Result<AccountResponse, RestError> {
        let body = SignUpRequest {
            email: email.to_string(),
            password: password.to_string(),
            return_secure_token: true,
        };
        self.post("accounts:signUp", &body).await
    }

    /// Exchange a federated (IdP-issued) credential for a session.
    pub async fn sign_in_with_idp(
        &self,
        id_token: &str,
        provider_id: &str,
    ) -> Result<AccountResponse, RestError> {
        let body = IdpSignInRequest {
            post_body: format!("id_token={}&providerId={}", id_token, provider_id),
            request_uri: "http://localhost".to_string(),
            return_secure_token: true,
            return_idp_credential: true,
        };
        self.post("accounts:signInWithIdp", &body).await
    }

    /// POST a JSON body to an account endpoint and parse the response.
    async fn post<B: Serialize>(
        &self,
        endpoint: &str,
        body: &B,
    ) -> Result<AccountResponse, RestError> {
        let url = format!("{}/v1/{}", self.config.base_url, endpoint);

        let response = self
            .client
            .post(&url)
            .query(&[("key", self.config.api_key.as_str())])
            .json(body)
            .send()
            .await
            .map_err(|e| RestError::new(0, format!("Request failed: {}", e)))?;

        Self::parse_response(response).await
    }

    async fn parse_response(response: reqwest::Response) -> Result<AccountResponse, RestError> {
        let status = response.status().as_u16();

        if !response.status().is_success() {
            let error_body = response.text().await.unwrap_or_default();

            // Prefer the provider's message from the error envelope
            if let Ok(envelope) = serde_json::from_str::<ErrorEnvelope>(&error_body) {
                return Err(RestError::new(status, envelope.error.message));
            }
            return Err(RestError::new(
                status,
                format!("HTTP {}: {}", status, error_body),
            ));
        }

        let body = response
            .text()
            .await
            .map_err(|e| RestError::new(0, format!("Failed to read response: {}", e)))?;

        serde_json::from_str(&body)
            .map_err(|e| RestError::new(0, format!("Failed to parse response: {}", e)))
    }

    /// Get the client configuration.
    pub fn config(&self) -> &RestClientConfig {
        &self.config
    }
}

// =============================================================================
// Tests
// =============================================================================
