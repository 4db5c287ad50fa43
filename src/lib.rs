//! Lumen authentication core
//!
//! Re-exports the three member crates and provides process-level wiring:
//! [`init_tracing`] for log setup and [`bootstrap`] for building an
//! [`AuthFlow`] over the real REST identity provider.
//!
//! # Example
//!
//! ```rust,no_run
//! use lumen::{bootstrap, RestClientConfig};
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     lumen::init_tracing();
//!     let flow = bootstrap(RestClientConfig::new("api-key"))?;
//!     println!("starting on {:?}", flow.screen());
//!     Ok(())
//! }
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]

use std::sync::Arc;

pub use auth_flow::{AfterSignup, AuthFlow, FlowError, FlowState, FormKind, SubmitOutcome};
pub use form_validation::{Field, ValidationPolicy};
pub use identity_client::{IdentityProvider, RestClientConfig, RestIdentityProvider};

/// Install a `tracing` subscriber driven by `RUST_LOG`.
///
/// Falls back to `info` when `RUST_LOG` is unset; does nothing if a
/// subscriber is already installed.
pub fn init_tracing() {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info"));
    let _ = tracing_subscriber::fmt().with_env_filter(filter).try_init();
}

/// Build an [`AuthFlow`] over the REST identity provider.
///
/// # Errors
///
/// Fails when the configuration carries no API key; every provider
/// endpoint requires one.
pub fn bootstrap(config: RestClientConfig) -> anyhow::Result<AuthFlow> {
    anyhow::ensure!(!config.api_key.is_empty(), "API key must not be empty");
    let provider = Arc::new(RestIdentityProvider::new(config));
    Ok(AuthFlow::new(provider))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bootstrap_requires_api_key() {
        let err = bootstrap(RestClientConfig::default()).unwrap_err();
        assert!(err.to_string().contains("API key"));
    }

    #[test]
    fn test_bootstrap_starts_on_login() {
        let flow = bootstrap(RestClientConfig::new("key")).unwrap();
        assert_eq!(flow.screen(), FlowState::ShowingLogin);
    }
}
