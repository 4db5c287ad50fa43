//! Field validation for Lumen
//!
//! This crate implements the validation rule engine used by the login and
//! signup forms. Every rule is a pure function from a raw string value to a
//! [`ValidationResult`]; rules perform no I/O and touch no shared state, so
//! they can run on every keystroke as well as on submit.
//!
//! The two places where the product has not settled on a single rule (the
//! password symbol set and the display-name rule) are exposed as named
//! policy variants in [`policy`] rather than silently merged.
//!
//! # Example
//!
//! ```rust
//! use form_validation::{validate_email, EmailContext};
//!
//! let ok = validate_email("user@test.com", EmailContext::Signup);
//! assert!(ok.is_valid);
//!
//! let bad = validate_email("a@b", EmailContext::Signup);
//! assert_eq!(bad.message, "Invalid email address");
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod form;
pub mod policy;
pub mod rules;

pub use form::{validate_login, validate_signup, FormReport};
pub use policy::{EmailContext, NamePolicy, PasswordSymbolPolicy, ValidationPolicy};
pub use rules::{
    validate_email, validate_name, validate_password, validate_phone, Field, ValidationResult,
};
