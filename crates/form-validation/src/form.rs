//! Form-level validation
//!
//! Aggregates the per-field rules into whole-form reports for submit
//! handling. The login form only checks presence; the signup form applies
//! the full rule set under a [`ValidationPolicy`].

use crate::policy::{EmailContext, ValidationPolicy};
use crate::rules::{
    validate_email, validate_name, validate_password, validate_phone, Field, ValidationResult,
};
use serde::{Deserialize, Serialize};

/// Aggregated validation results for one form submission.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FormReport {
    /// Per-field results, in field order.
    pub results: Vec<ValidationResult>,
}

impl FormReport {
    /// Whether every field passed.
    pub fn all_valid(&self) -> bool {
        self.results.iter().all(|r| r.is_valid)
    }

    /// The result for a specific field, if that field was part of the form.
    pub fn result_for(&self, field: Field) -> Option<&ValidationResult> {
        self.results.iter().find(|r| r.field == field)
    }

    /// The error message for a field; empty when valid or absent.
    pub fn message_for(&self, field: Field) -> &str {
        self.result_for(field).map_or("", |r| r.message.as_str())
    }
}

/// Validate the login form.
///
/// The login screen only requires both fields to be present; format and
/// strength are the provider's problem at sign-in time.
pub fn validate_login(email: &str, password: &str) -> FormReport {
    let email_result = if email.trim().is_empty() {
        ValidationResult::invalid(Field::Email, EmailContext::Login.required_message())
    } else {
        ValidationResult::valid(Field::Email)
    };
    let password_result = if password.is_empty() {
        ValidationResult::invalid(Field::Password, "Password must be entered")
    } else {
        ValidationResult::valid(Field::Password)
    };

    FormReport {
        results: vec![email_result, password_result],
    }
}

/// Validate the signup form under `policy`.
pub fn validate_signup(
    name: &str,
    email: &str,
    phone: &str,
    password: &str,
    policy: &ValidationPolicy,
) -> FormReport {
    FormReport {
        results: vec![
            validate_name(name, policy.name),
            validate_email(email, EmailContext::Signup),
            validate_phone(phone),
            validate_password(password, policy.symbols),
        ],
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::policy::{NamePolicy, PasswordSymbolPolicy};

    #[test]
    fn test_login_all_valid() {
        let report = validate_login("user@test.com", "whatever");
        assert!(report.all_valid());
        assert_eq!(report.message_for(Field::Email), "");
    }

    #[test]
    fn test_login_presence_only() {
        // Login does not check format, only presence.
        let report = validate_login("not-an-email", "x");
        assert!(report.all_valid());
    }

    #[test]
    fn test_login_missing_fields() {
        let report = validate_login("", "");
        assert!(!report.all_valid());
        assert_eq!(report.message_for(Field::Email), "Email must be entered");
        assert_eq!(report.message_for(Field::Password), "Password must be entered");
    }

    #[test]
    fn test_signup_all_valid() {
        let policy = ValidationPolicy::new();
        let report = validate_signup("Alice", "user@test.com", "12345678901", "Abcdef1!", &policy);
        assert!(report.all_valid());
    }

    #[test]
    fn test_signup_collects_every_failure() {
        let policy = ValidationPolicy::new();
        let report = validate_signup("", "a@b", "123", "short", &policy);
        assert!(!report.all_valid());
        assert_eq!(report.message_for(Field::Name), "Name is required");
        assert_eq!(report.message_for(Field::Email), "Invalid email address");
        assert_eq!(
            report.message_for(Field::Phone),
            "Phone number must be exactly 11 digits"
        );
        assert!(!report.message_for(Field::Password).is_empty());
    }

    #[test]
    fn test_signup_policy_is_respected() {
        let policy = ValidationPolicy::new()
            .with_symbols(PasswordSymbolPolicy::AnyNonAlphanumeric)
            .with_name(NamePolicy::ExactLength(6));
        let report = validate_signup("Ab12!x", "user@test.com", "12345678901", "Abcdef1#", &policy);
        assert!(report.all_valid());
    }

    #[test]
    fn test_result_for_absent_field() {
        let report = validate_login("user@test.com", "pw");
        assert!(report.result_for(Field::Phone).is_none());
        assert_eq!(report.message_for(Field::Phone), "");
    }
}
