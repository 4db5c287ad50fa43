//! Auth navigation state machine for Lumen
//!
//! Decides which of {login, signup, home} the app shows, based on
//! validation results and the identity provider's outcome. The machine
//! itself ([`machine::transition`]) is a pure function over named events;
//! [`coordinator::AuthFlow`] wires it to the form fields and the provider.

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod coordinator;
pub mod fields;
pub mod machine;

pub use coordinator::{AuthFlow, SubmitOutcome};
pub use fields::{FormFields, LoginFields, SignupFields};
pub use machine::{
    transition, AfterSignup, Effect, FlowError, FlowEvent, FlowState, FormKind, Transition,
};

/// Result type for flow operations.
pub type Result<T> = std::result::Result<T, FlowError>;
