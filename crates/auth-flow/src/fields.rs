//! Form field store
//!
//! Holds the transient values of both forms plus their live error
//! messages. Values never leave process memory; secrets are cleared per
//! the machine's effects and are excluded from `Debug` output.

use crate::machine::FormKind;
use form_validation::{
    validate_email, validate_name, validate_password, validate_phone, EmailContext, Field,
    FormReport, ValidationPolicy,
};
use identity_client::SignupProfile;

/// Login form values and errors.
#[derive(Clone, Default, PartialEq, Eq)]
pub struct LoginFields {
    /// Email input
    pub email: String,
    /// Password input
    pub password: String,
    /// Email error shown under the field; empty when none
    pub email_error: String,
    /// Password error shown under the field; empty when none
    pub password_error: String,
}

/// Signup form values and errors.
#[derive(Clone, Default, PartialEq, Eq)]
pub struct SignupFields {
    /// Display name input
    pub name: String,
    /// Email input
    pub email: String,
    /// Phone input
    pub phone: String,
    /// Password input
    pub password: String,
    /// Name error; empty when none
    pub name_error: String,
    /// Email error; empty when none
    pub email_error: String,
    /// Phone error; empty when none
    pub phone_error: String,
    /// Password error; empty when none
    pub password_error: String,
}

/// Both forms' fields.
#[derive(Clone, Default, PartialEq, Eq)]
pub struct FormFields {
    /// Login form
    pub login: LoginFields,
    /// Signup form
    pub signup: SignupFields,
}

impl FormFields {
    /// Record an edit.
    ///
    /// Signup fields revalidate live on every edit; login fields only
    /// get errors at submit time. Edits to fields a form does not have
    /// (name/phone on login) are ignored.
    pub fn edit(&mut self, form: FormKind, field: Field, value: String, policy: &ValidationPolicy) {
        match (form, field) {
            (FormKind::Login, Field::Email) => {
                self.login.email = value;
                self.login.email_error.clear();
            }
            (FormKind::Login, Field::Password) => {
                self.login.password = value;
                self.login.password_error.clear();
            }
            (FormKind::Signup, Field::Name) => {
                self.signup.name_error = validate_name(&value, policy.name).message;
                self.signup.name = value;
            }
            (FormKind::Signup, Field::Email) => {
                self.signup.email_error = validate_email(&value, EmailContext::Signup).message;
                self.signup.email = value;
            }
            (FormKind::Signup, Field::Phone) => {
                self.signup.phone_error = validate_phone(&value).message;
                self.signup.phone = value;
            }
            (FormKind::Signup, Field::Password) => {
                self.signup.password_error = validate_password(&value, policy.symbols).message;
                self.signup.password = value;
            }
            _ => {}
        }
    }

    /// Copy a submit-time report's messages onto a form's error slots.
    pub fn apply_report(&mut self, form: FormKind, report: &FormReport) {
        match form {
            FormKind::Login => {
                self.login.email_error = report.message_for(Field::Email).to_string();
                self.login.password_error = report.message_for(Field::Password).to_string();
            }
            FormKind::Signup => {
                self.signup.name_error = report.message_for(Field::Name).to_string();
                self.signup.email_error = report.message_for(Field::Email).to_string();
                self.signup.phone_error = report.message_for(Field::Phone).to_string();
                self.signup.password_error = report.message_for(Field::Password).to_string();
            }
        }
    }

    /// Clear a form's secret, keeping everything else.
    pub fn clear_secret(&mut self, form: FormKind) {
        match form {
            FormKind::Login => self.login.password.clear(),
            FormKind::Signup => self.signup.password.clear(),
        }
    }

    /// Clear every field and error of both forms.
    pub fn clear_all(&mut self) {
        *self = Self::default();
    }

    /// The signup form's values as a profile for the provider.
    pub fn signup_profile(&self) -> SignupProfile {
        SignupProfile {
            display_name: self.signup.name.clone(),
            email: self.signup.email.trim().to_string(),
            phone_number: self.signup.phone.clone(),
            password: self.signup.password.clone(),
        }
    }
}

// Passwords stay out of logs.
impl std::fmt::Debug for FormFields {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FormFields")
            .field("login.email", &self.login.email)
            .field("signup.name", &self.signup.name)
            .field("signup.email", &self.signup.email)
            .field("signup.phone", &self.signup.phone)
            .finish_non_exhaustive()
    }
}
