//! Async coordinator over the pure machine
//!
//! [`AuthFlow`] owns the flow state and form fields, validates on submit,
//! and drives the identity provider. All state lives behind `parking_lot`
//! locks that are never held across an await; the provider round-trip is
//! the only suspension point, and its completion feeds back into the
//! machine on the same logical thread of control.

use crate::fields::FormFields;
use crate::machine::{
    transition, AfterSignup, Effect, FlowError, FlowEvent, FlowState, FormKind,
};
use form_validation::{validate_login, validate_signup, Field, FormReport, ValidationPolicy};
use identity_client::{AuthenticatedUser, FederatedCredential, IdentityProvider, ProviderError};
use parking_lot::RwLock;
use std::sync::Arc;
use tracing::{debug, info, warn};

/// What became of a submit.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SubmitOutcome {
    /// The provider round-trip completed; the state carries the result.
    Completed(FlowState),
    /// Validation failed; no provider call was made.
    Invalid(FormReport),
}

/// Coordinator for the login/signup/home flow.
///
/// # Example
///
/// ```rust,no_run
/// use std::sync::Arc;
/// use auth_flow::AuthFlow;
/// use identity_client::{RestClientConfig, RestIdentityProvider};
///
/// #[tokio::main]
/// async fn main() -> Result<(), Box<dyn std::error::Error>> {
///     let provider = Arc::new(RestIdentityProvider::new(RestClientConfig::new("api-key")));
///     let flow = AuthFlow::new(provider);
///
///     use auth_flow::FormKind;
///     use form_validation::Field;
///     flow.edit_field(FormKind::Login, Field::Email, "alice@example.com".into());
///     flow.edit_field(FormKind::Login, Field::Password, "hunter2AA!".into());
///     let outcome = flow.submit_login().await?;
///     println!("{outcome:?}");
///     Ok(())
/// }
/// ```
pub struct AuthFlow {
    state: RwLock<FlowState>,
    fields: RwLock<FormFields>,
    provider: Arc<dyn IdentityProvider>,
    policy: ValidationPolicy,
    after_signup: AfterSignup,
}

impl std::fmt::Debug for AuthFlow {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AuthFlow")
            .field("state", &*self.state.read())
            .field("fields", &*self.fields.read())
            .field("policy", &self.policy)
            .field("after_signup", &self.after_signup)
            .finish_non_exhaustive()
    }
}

impl AuthFlow {
    /// Create a flow over `provider` with default policies.
    pub fn new(provider: Arc<dyn IdentityProvider>) -> Self {
        Self {
            state: RwLock::new(FlowState::default()),
            fields: RwLock::new(FormFields::default()),
            provider,
            policy: ValidationPolicy::default(),
            after_signup: AfterSignup::default(),
        }
    }

    /// Set the validation policy.
    pub fn with_policy(mut self, policy: ValidationPolicy) -> Self {
        self.policy = policy;
        self
    }

    /// Set the post-signup navigation policy.
    pub fn with_after_signup(mut self, after_signup: AfterSignup) -> Self {
        self.after_signup = after_signup;
        self
    }

    /// The current screen state.
    pub fn screen(&self) -> FlowState {
        self.state.read().clone()
    }

    /// A snapshot of both forms' fields and errors.
    pub fn fields(&self) -> FormFields {
        self.fields.read().clone()
    }

    /// Record an edit; signup fields revalidate live.
    pub fn edit_field(&self, form: FormKind, field: Field, value: String) {
        self.fields.write().edit(form, field, value, &self.policy);
    }

    /// Navigate from the login form to the signup form.
    pub fn go_to_signup(&self) -> Result<(), FlowError> {
        self.apply(FlowEvent::GoToSignup).map(|_| ())
    }

    /// Navigate from the signup form back to the login form.
    pub fn go_to_login(&self) -> Result<(), FlowError> {
        self.apply(FlowEvent::GoToLogin).map(|_| ())
    }

    /// Pick up a live provider session at startup, if one exists.
    ///
    /// Returns `true` when a session was resumed and the flow is now
    /// authenticated.
    pub fn resume(&self) -> bool {
        if let Some(user) = self.provider.current_session() {
            return self
                .apply(FlowEvent::SessionResumed { identifier: user.identifier })
                .is_ok();
        }
        false
    }

    /// Submit the login form.
    ///
    /// Invalid fields surface their messages and make no provider call.
    /// A submit while a round-trip is already in flight is rejected with
    /// [`FlowError::UnexpectedState`].
    pub async fn submit_login(&self) -> Result<SubmitOutcome, FlowError> {
        let (email, password) = {
            let fields = self.fields.read();
            (fields.login.email.clone(), fields.login.password.clone())
        };

        let report = validate_login(&email, &password);
        if !report.all_valid() {
            debug!("login submit rejected by validation");
            self.fields.write().apply_report(FormKind::Login, &report);
            return Ok(SubmitOutcome::Invalid(report));
        }

        self.apply(FlowEvent::Submit { form: FormKind::Login })?;
        let result = self
            .provider
            .sign_in_with_password(email.trim(), &password)
            .await;
        self.complete(result)
    }

    /// Submit the signup form.
    pub async fn submit_signup(&self) -> Result<SubmitOutcome, FlowError> {
        let profile = self.fields.read().signup_profile();

        let report = validate_signup(
            &profile.display_name,
            &profile.email,
            &profile.phone_number,
            &profile.password,
            &self.policy,
        );
        if !report.all_valid() {
            debug!("signup submit rejected by validation");
            self.fields.write().apply_report(FormKind::Signup, &report);
            return Ok(SubmitOutcome::Invalid(report));
        }

        self.apply(FlowEvent::Submit { form: FormKind::Signup })?;
        let result = self.provider.create_account(profile).await;
        self.complete(result)
    }

    /// Exchange a Google-issued credential for a session.
    ///
    /// No field validation applies; the credential came from the IdP.
    pub async fn sign_in_with_google(
        &self,
        credential: FederatedCredential,
    ) -> Result<SubmitOutcome, FlowError> {
        self.apply(FlowEvent::SubmitFederated)?;
        let result = self.provider.sign_in_with_federated(credential).await;
        self.complete(result)
    }

    /// Acknowledge a failure message; returns to the originating screen
    /// with the secret cleared and the other fields kept.
    pub fn acknowledge_failure(&self) -> Result<(), FlowError> {
        self.apply(FlowEvent::AcknowledgeFailure).map(|_| ())
    }

    /// Log out: provider sign-out, then back to login with empty fields.
    pub fn logout(&self) -> Result<(), FlowError> {
        self.apply(FlowEvent::Logout).map(|_| ())
    }

    /// Feed a provider outcome back into the machine.
    fn complete(
        &self,
        result: Result<AuthenticatedUser, ProviderError>,
    ) -> Result<SubmitOutcome, FlowError> {
        match result {
            Ok(user) => {
                self.apply(FlowEvent::ProviderSucceeded { identifier: user.identifier })?;
            }
            Err(err) => {
                warn!(error = %err, "provider reported failure");
                self.apply(FlowEvent::ProviderFailed { reason: err.message().to_string() })?;
            }
        }
        Ok(SubmitOutcome::Completed(self.screen()))
    }

    /// Run one event through the pure machine and execute its effects.
    fn apply(&self, event: FlowEvent) -> Result<Vec<Effect>, FlowError> {
        let effects = {
            let mut state = self.state.write();
            let from = state.name();
            let t = transition(&state, event, self.after_signup)?;
            info!(from, to = t.next.name(), "auth flow transition");
            *state = t.next;
            t.effects
        };

        for effect in &effects {
            match effect {
                Effect::SignOut => self.provider.sign_out(),
                Effect::ClearSecret(form) => self.fields.write().clear_secret(*form),
                Effect::ClearAllFields => self.fields.write().clear_all(),
                // Start* effects are executed by the awaiting submit call.
                Effect::StartPasswordSignIn
                | Effect::StartAccountCreation
                | Effect::StartFederatedSignIn => {}
            }
        }
        Ok(effects)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use identity_client::{AuthSession, SignupProfile};
    use mockall::predicate::eq;

    mockall::mock! {
        pub Provider {}

        #[async_trait]
        impl IdentityProvider for Provider {
            async fn sign_in_with_password(
                &self,
                identifier: &str,
                secret: &str,
            ) -> Result<AuthenticatedUser, ProviderError>;

            async fn create_account(
                &self,
                profile: SignupProfile,
            ) -> Result<AuthenticatedUser, ProviderError>;

            async fn sign_in_with_federated(
                &self,
                credential: FederatedCredential,
            ) -> Result<AuthenticatedUser, ProviderError>;

            fn sign_out(&self);

            fn current_session(&self) -> Option<AuthenticatedUser>;
        }
    }

    fn user(identifier: &str) -> AuthenticatedUser {
        AuthenticatedUser {
            identifier: identifier.to_string(),
            user_id: "uid-1".to_string(),
            session: AuthSession::new("id", "refresh", "3600"),
        }
    }

    fn flow_with(provider: MockProvider) -> AuthFlow {
        AuthFlow::new(Arc::new(provider))
    }

    #[tokio::test]
    async fn test_login_success_reaches_home() {
        let mut provider = MockProvider::new();
        provider
            .expect_sign_in_with_password()
            .with(eq("user@test.com"), eq("Abcdef1!"))
            .times(1)
            .returning(|_, _| Ok(user("user@test.com")));

        let flow = flow_with(provider);
        flow.edit_field(FormKind::Login, Field::Email, "user@test.com".to_string());
        flow.edit_field(FormKind::Login, Field::Password, "Abcdef1!".to_string());

        let outcome = flow.submit_login().await.unwrap();
        assert_eq!(
            outcome,
            SubmitOutcome::Completed(FlowState::Authenticated {
                identifier: "user@test.com".to_string()
            })
        );
    }

    #[tokio::test]
    async fn test_invalid_login_never_calls_provider() {
        // No expectations set: any provider call would panic the mock.
        let flow = flow_with(MockProvider::new());

        let outcome = flow.submit_login().await.unwrap();
        let SubmitOutcome::Invalid(report) = outcome else {
            panic!("expected validation rejection");
        };
        assert!(!report.all_valid());
        assert_eq!(flow.fields().login.email_error, "Email must be entered");
        assert_eq!(flow.screen(), FlowState::ShowingLogin);
    }

    #[tokio::test]
    async fn test_provider_failure_then_acknowledge() {
        let mut provider = MockProvider::new();
        provider
            .expect_sign_in_with_password()
            .times(1)
            .returning(|_, _| {
                Err(ProviderError::Service { message: "INVALID_PASSWORD".to_string() })
            });

        let flow = flow_with(provider);
        flow.edit_field(FormKind::Login, Field::Email, "user@test.com".to_string());
        flow.edit_field(FormKind::Login, Field::Password, "wrong".to_string());

        let outcome = flow.submit_login().await.unwrap();
        assert_eq!(
            outcome,
            SubmitOutcome::Completed(FlowState::AuthFailed {
                reason: "INVALID_PASSWORD".to_string(),
                origin: FormKind::Login,
            })
        );

        flow.acknowledge_failure().unwrap();
        assert_eq!(flow.screen(), FlowState::ShowingLogin);

        // Secret cleared, identifier retained
        let fields = flow.fields();
        assert_eq!(fields.login.email, "user@test.com");
        assert_eq!(fields.login.password, "");
    }

    #[tokio::test]
    async fn test_signup_invalid_field_blocks_submit() {
        let flow = flow_with(MockProvider::new());
        flow.go_to_signup().unwrap();

        flow.edit_field(FormKind::Signup, Field::Name, "Alice".to_string());
        flow.edit_field(FormKind::Signup, Field::Email, "user@test.com".to_string());
        flow.edit_field(FormKind::Signup, Field::Phone, "123".to_string());
        flow.edit_field(FormKind::Signup, Field::Password, "Abcdef1!".to_string());

        let outcome = flow.submit_signup().await.unwrap();
        assert!(matches!(outcome, SubmitOutcome::Invalid(_)));
        assert_eq!(
            flow.fields().signup.phone_error,
            "Phone number must be exactly 11 digits"
        );
        assert_eq!(flow.screen(), FlowState::ShowingSignup);
    }

    #[tokio::test]
    async fn test_signup_success_goes_home_by_default() {
        let mut provider = MockProvider::new();
        provider
            .expect_create_account()
            .withf(|profile| profile.email == "new@test.com")
            .times(1)
            .returning(|_| Ok(user("new@test.com")));

        let flow = flow_with(provider);
        flow.go_to_signup().unwrap();
        flow.edit_field(FormKind::Signup, Field::Name, "Alice".to_string());
        flow.edit_field(FormKind::Signup, Field::Email, "new@test.com".to_string());
        flow.edit_field(FormKind::Signup, Field::Phone, "12345678901".to_string());
        flow.edit_field(FormKind::Signup, Field::Password, "Abcdef1!".to_string());

        let outcome = flow.submit_signup().await.unwrap();
        assert_eq!(
            outcome,
            SubmitOutcome::Completed(FlowState::Authenticated {
                identifier: "new@test.com".to_string()
            })
        );
    }

    #[tokio::test]
    async fn test_signup_return_to_login_policy() {
        let mut provider = MockProvider::new();
        provider
            .expect_create_account()
            .times(1)
            .returning(|_| Ok(user("new@test.com")));

        let flow = flow_with(provider).with_after_signup(AfterSignup::ReturnToLogin);
        flow.go_to_signup().unwrap();
        flow.edit_field(FormKind::Signup, Field::Name, "Alice".to_string());
        flow.edit_field(FormKind::Signup, Field::Email, "new@test.com".to_string());
        flow.edit_field(FormKind::Signup, Field::Phone, "12345678901".to_string());
        flow.edit_field(FormKind::Signup, Field::Password, "Abcdef1!".to_string());

        let outcome = flow.submit_signup().await.unwrap();
        assert_eq!(outcome, SubmitOutcome::Completed(FlowState::ShowingLogin));

        // Signup password cleared, email kept for the follow-up login
        let fields = flow.fields();
        assert_eq!(fields.signup.password, "");
        assert_eq!(fields.signup.email, "new@test.com");
    }

    #[tokio::test]
    async fn test_google_sign_in() {
        let mut provider = MockProvider::new();
        provider
            .expect_sign_in_with_federated()
            .withf(|cred| cred.provider_id == "google.com")
            .times(1)
            .returning(|_| Ok(user("Alice")));

        let flow = flow_with(provider);
        flow.go_to_signup().unwrap();

        let outcome = flow
            .sign_in_with_google(FederatedCredential::google("idp-token"))
            .await
            .unwrap();
        assert_eq!(
            outcome,
            SubmitOutcome::Completed(FlowState::Authenticated {
                identifier: "Alice".to_string()
            })
        );
    }

    #[tokio::test]
    async fn test_logout_clears_everything() {
        let mut provider = MockProvider::new();
        provider
            .expect_sign_in_with_password()
            .returning(|_, _| Ok(user("user@test.com")));
        provider.expect_sign_out().times(1).return_const(());

        let flow = flow_with(provider);
        flow.edit_field(FormKind::Login, Field::Email, "user@test.com".to_string());
        flow.edit_field(FormKind::Login, Field::Password, "Abcdef1!".to_string());
        flow.submit_login().await.unwrap();

        flow.logout().unwrap();
        assert_eq!(flow.screen(), FlowState::ShowingLogin);
        assert_eq!(flow.fields(), FormFields::default());
    }

    #[tokio::test]
    async fn test_logout_from_login_is_unexpected() {
        let flow = flow_with(MockProvider::new());
        let err = flow.logout().unwrap_err();
        assert!(matches!(err, FlowError::UnexpectedState { .. }));
    }

    #[tokio::test]
    async fn test_resume_with_live_session() {
        let mut provider = MockProvider::new();
        provider
            .expect_current_session()
            .returning(|| Some(user("user@test.com")));

        let flow = flow_with(provider);
        assert!(flow.resume());
        assert_eq!(
            flow.screen(),
            FlowState::Authenticated { identifier: "user@test.com".to_string() }
        );
    }

    #[tokio::test]
    async fn test_resume_without_session() {
        let mut provider = MockProvider::new();
        provider.expect_current_session().returning(|| None);

        let flow = flow_with(provider);
        assert!(!flow.resume());
        assert_eq!(flow.screen(), FlowState::ShowingLogin);
    }
}
