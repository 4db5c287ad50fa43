//! Identity provider client for Lumen
//!
//! This crate is the app's only door to the external identity provider. It
//! contains the REST client for the provider's Identity Toolkit API, the
//! [`IdentityProvider`] trait the rest of the app depends on, and the
//! in-memory session that lives between sign-in and sign-out.
//!
//! Credential verification, password hashing, and token issuance all happen
//! on the provider's side; nothing here persists credentials or sessions.

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod provider;
pub mod rest;
pub mod session;

pub use provider::{
    AuthenticatedUser, FederatedCredential, IdentityProvider, ProviderError, RestIdentityProvider,
    SignupProfile,
};
pub use rest::{RestClient, RestClientConfig, RestError};
pub use session::AuthSession;

/// Result type for provider operations.
pub type Result<T> = std::result::Result<T, ProviderError>;
