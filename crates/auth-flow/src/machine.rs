//! Pure state machine for the auth flow
//!
//! Screen selection is a function of one [`FlowState`] value; no two
//! screens can show at once. All side effects are named [`Effect`] values
//! the caller executes: one provider call per entry into `Authenticating`,
//! one sign-out per logout, plus field clearing. Illegal event/state pairs
//! are rejected with [`FlowError::UnexpectedState`] instead of being
//! silently absorbed, so a submit that lands while a request is in flight
//! can never produce a duplicate sign-in or account creation.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Which form a submit or failure belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FormKind {
    /// The login form
    Login,
    /// The signup form
    Signup,
}

impl FormKind {
    /// Label for logging.
    pub fn as_str(&self) -> &'static str {
        match self {
            FormKind::Login => "login",
            FormKind::Signup => "signup",
        }
    }
}

/// Where the flow goes after a successful signup.
///
/// Both conventions (return to login, go straight to home) are in use;
/// the choice is configuration, not a separate state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "kebab-case")]
pub enum AfterSignup {
    /// Go straight to the authenticated home screen.
    #[default]
    GoHome,
    /// Return to the login screen (signup password cleared, email kept).
    ReturnToLogin,
}

/// The flow's single state value.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "state", rename_all = "kebab-case")]
pub enum FlowState {
    /// The login form is showing.
    ShowingLogin,
    /// The signup form is showing.
    ShowingSignup,
    /// A provider round-trip is in flight.
    Authenticating {
        /// Which form the submit came from
        origin: FormKind,
    },
    /// The provider reported success; the home screen is showing.
    Authenticated {
        /// The verified account's email or provider-issued name
        identifier: String,
    },
    /// The provider reported failure; the message is showing.
    AuthFailed {
        /// The provider's message, verbatim
        reason: String,
        /// The screen the submit came from
        origin: FormKind,
    },
}

impl Default for FlowState {
    fn default() -> Self {
        FlowState::ShowingLogin
    }
}

impl FlowState {
    /// State name for logging.
    pub fn name(&self) -> &'static str {
        match self {
            FlowState::ShowingLogin => "showing-login",
            FlowState::ShowingSignup => "showing-signup",
            FlowState::Authenticating { .. } => "authenticating",
            FlowState::Authenticated { .. } => "authenticated",
            FlowState::AuthFailed { .. } => "auth-failed",
        }
    }

    /// Whether a live session is showing the home screen.
    pub fn is_authenticated(&self) -> bool {
        matches!(self, FlowState::Authenticated { .. })
    }
}

/// Named intents dispatched to the machine.
///
/// `Submit` is only dispatched once the form's validation report is clean;
/// a submit with invalid fields never reaches the machine.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FlowEvent {
    /// User tapped "Sign up" on the login screen.
    GoToSignup,
    /// User tapped "Log in" on the signup screen.
    GoToLogin,
    /// User submitted a fully valid form.
    Submit {
        /// Which form was submitted
        form: FormKind,
    },
    /// User chose federated (Google) sign-in.
    SubmitFederated,
    /// A live provider session was found at startup.
    SessionResumed {
        /// The session's account identifier
        identifier: String,
    },
    /// The provider reported success.
    ProviderSucceeded {
        /// The verified account's identifier
        identifier: String,
    },
    /// The provider reported failure.
    ProviderFailed {
        /// The provider's message, verbatim
        reason: String,
    },
    /// User acknowledged a failure message.
    AcknowledgeFailure,
    /// User tapped "Logout" on the home screen.
    Logout,
}

impl FlowEvent {
    /// Event name for logging.
    pub fn name(&self) -> &'static str {
        match self {
            FlowEvent::GoToSignup => "go-to-signup",
            FlowEvent::GoToLogin => "go-to-login",
            FlowEvent::Submit { .. } => "submit",
            FlowEvent::SubmitFederated => "submit-federated",
            FlowEvent::SessionResumed { .. } => "session-resumed",
            FlowEvent::ProviderSucceeded { .. } => "provider-succeeded",
            FlowEvent::ProviderFailed { .. } => "provider-failed",
            FlowEvent::AcknowledgeFailure => "acknowledge-failure",
            FlowEvent::Logout => "logout",
        }
    }
}

/// Side effects the caller must execute after a transition.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Effect {
    /// Call the provider's password sign-in with the login form's values.
    StartPasswordSignIn,
    /// Call the provider's account creation with the signup profile.
    StartAccountCreation,
    /// Exchange the pending federated credential with the provider.
    StartFederatedSignIn,
    /// Invoke the provider's sign-out.
    SignOut,
    /// Clear the given form's secret, keeping the other fields.
    ClearSecret(FormKind),
    /// Clear every field of both forms.
    ClearAllFields,
}

/// The outcome of a legal transition.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Transition {
    /// The state after the event.
    pub next: FlowState,
    /// Effects for the caller, in order.
    pub effects: Vec<Effect>,
}

impl Transition {
    fn to(next: FlowState) -> Self {
        Self {
            next,
            effects: Vec::new(),
        }
    }

    fn with(next: FlowState, effects: Vec<Effect>) -> Self {
        Self { next, effects }
    }
}

/// Errors from the flow layer.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum FlowError {
    /// The event is not legal in the current state. In particular a submit
    /// while a request is in flight is rejected rather than queued.
    #[error("unexpected event '{event}' in state '{state}'")]
    UnexpectedState {
        /// Name of the state the event arrived in
        state: &'static str,
        /// Name of the rejected event
        event: &'static str,
    },
}

/// Apply `event` to `state`.
///
/// Pure: no I/O, no clock, no shared state. Returns the next state plus
/// the effects the caller must run, or `UnexpectedState` when the pair is
/// illegal.
pub fn transition(
    state: &FlowState,
    event: FlowEvent,
    after_signup: AfterSignup,
) -> Result<Transition, FlowError> {
    let state_name = state.name();
    let event_name = event.name();

    match (state, event) {
        (FlowState::ShowingLogin, FlowEvent::GoToSignup) => {
            Ok(Transition::to(FlowState::ShowingSignup))
        }
        (FlowState::ShowingSignup, FlowEvent::GoToLogin) => {
            Ok(Transition::to(FlowState::ShowingLogin))
        }

        (FlowState::ShowingLogin, FlowEvent::Submit { form: FormKind::Login }) => {
            Ok(Transition::with(
                FlowState::Authenticating { origin: FormKind::Login },
                vec![Effect::StartPasswordSignIn],
            ))
        }
        (FlowState::ShowingSignup, FlowEvent::Submit { form: FormKind::Signup }) => {
            Ok(Transition::with(
                FlowState::Authenticating { origin: FormKind::Signup },
                vec![Effect::StartAccountCreation],
            ))
        }

        (FlowState::ShowingLogin, FlowEvent::SubmitFederated) => Ok(Transition::with(
            FlowState::Authenticating { origin: FormKind::Login },
            vec![Effect::StartFederatedSignIn],
        )),
        (FlowState::ShowingSignup, FlowEvent::SubmitFederated) => Ok(Transition::with(
            FlowState::Authenticating { origin: FormKind::Signup },
            vec![Effect::StartFederatedSignIn],
        )),

        (FlowState::ShowingLogin, FlowEvent::SessionResumed { identifier }) => {
            Ok(Transition::to(FlowState::Authenticated { identifier }))
        }

        (
            FlowState::Authenticating { origin: FormKind::Signup },
            FlowEvent::ProviderSucceeded { identifier },
        ) => match after_signup {
            AfterSignup::GoHome => Ok(Transition::to(FlowState::Authenticated { identifier })),
            AfterSignup::ReturnToLogin => Ok(Transition::with(
                FlowState::ShowingLogin,
                vec![Effect::ClearSecret(FormKind::Signup)],
            )),
        },
        (FlowState::Authenticating { .. }, FlowEvent::ProviderSucceeded { identifier }) => {
            Ok(Transition::to(FlowState::Authenticated { identifier }))
        }
        (FlowState::Authenticating { origin }, FlowEvent::ProviderFailed { reason }) => {
            Ok(Transition::to(FlowState::AuthFailed {
                reason,
                origin: *origin,
            }))
        }

        (FlowState::AuthFailed { origin, .. }, FlowEvent::AcknowledgeFailure) => {
            let screen = match origin {
                FormKind::Login => FlowState::ShowingLogin,
                FormKind::Signup => FlowState::ShowingSignup,
            };
            Ok(Transition::with(screen, vec![Effect::ClearSecret(*origin)]))
        }

        (FlowState::Authenticated { .. }, FlowEvent::Logout) => Ok(Transition::with(
            FlowState::ShowingLogin,
            vec![Effect::SignOut, Effect::ClearAllFields],
        )),

        _ => Err(FlowError::UnexpectedState {
            state: state_name,
            event: event_name,
        }),
    }
}
