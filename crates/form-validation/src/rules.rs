//! Per-field validation rules
//!
//! Each rule maps a raw string value to a [`ValidationResult`]. Rules are
//! pure: no I/O, no shared state, stable messages. They are called both on
//! every edit (live error display) and on submit.

use crate::policy::{EmailContext, NamePolicy, PasswordSymbolPolicy};
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::sync::OnceLock;

/// Minimum password length.
pub const MIN_PASSWORD_LEN: usize = 8;

/// Required number of phone digits.
pub const PHONE_DIGITS: usize = 11;

/// The form fields the engine knows about.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Field {
    /// Display name (signup only).
    Name,
    /// Email address.
    Email,
    /// Phone number (signup only).
    Phone,
    /// Password.
    Password,
}

impl Field {
    /// Human-readable field label.
    pub fn as_str(&self) -> &'static str {
        match self {
            Field::Name => "name",
            Field::Email => "email",
            Field::Phone => "phone",
            Field::Password => "password",
        }
    }
}

impl std::fmt::Display for Field {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Outcome of validating one field.
///
/// Invariant: `is_valid` implies `message` is empty.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidationResult {
    /// Which field was validated.
    pub field: Field,
    /// Whether the value is acceptable.
    pub is_valid: bool,
    /// Error message; empty when valid.
    pub message: String,
}

impl ValidationResult {
    /// A passing result for `field`.
    pub fn valid(field: Field) -> Self {
        Self {
            field,
            is_valid: true,
            message: String::new(),
        }
    }

    /// A failing result for `field` with a stable message.
    pub fn invalid(field: Field, message: impl Into<String>) -> Self {
        Self {
            field,
            is_valid: false,
            message: message.into(),
        }
    }
}

fn email_regex() -> &'static Regex {
    static EMAIL_REGEX: OnceLock<Regex> = OnceLock::new();
    EMAIL_REGEX.get_or_init(|| {
        // local-part@domain, with at least one dot in the domain
        Regex::new(r"^[A-Za-z0-9._%+\-]+@[A-Za-z0-9\-]+(\.[A-Za-z0-9\-]+)+$").unwrap()
    })
}

/// Validate an email address.
///
/// The value is trimmed before matching. An empty value produces the
/// context's required-message; a non-matching value produces the context's
/// invalid-message.
pub fn validate_email(value: &str, context: EmailContext) -> ValidationResult {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return ValidationResult::invalid(Field::Email, context.required_message());
    }
    if !email_regex().is_match(trimmed) {
        return ValidationResult::invalid(Field::Email, context.invalid_message());
    }
    ValidationResult::valid(Field::Email)
}

/// Message for a non-empty password that fails the strength rule.
pub const PASSWORD_RULE_MESSAGE: &str =
    "Password must be at least 8 characters and include uppercase, lowercase, number, and special character";

/// Validate a password against the strength rule.
///
/// Requires length >= 8 plus at least one lowercase letter, one uppercase
/// letter, one digit, and one symbol from the selected policy's set.
pub fn validate_password(value: &str, policy: PasswordSymbolPolicy) -> ValidationResult {
    if value.is_empty() {
        return ValidationResult::invalid(Field::Password, "Password is required");
    }
    if password_matches(value, policy) {
        ValidationResult::valid(Field::Password)
    } else {
        ValidationResult::invalid(Field::Password, PASSWORD_RULE_MESSAGE)
    }
}

fn password_matches(value: &str, policy: PasswordSymbolPolicy) -> bool {
    if value.chars().count() < MIN_PASSWORD_LEN {
        return false;
    }

    let has_lower = value.chars().any(|c| c.is_ascii_lowercase());
    let has_upper = value.chars().any(|c| c.is_ascii_uppercase());
    let has_digit = value.chars().any(|c| c.is_ascii_digit());

    let (has_symbol, all_allowed) = match policy {
        PasswordSymbolPolicy::ExplicitSet => {
            let symbols = PasswordSymbolPolicy::EXPLICIT_SYMBOLS;
            (
                value.chars().any(|c| symbols.contains(c)),
                value
                    .chars()
                    .all(|c| c.is_ascii_alphanumeric() || symbols.contains(c)),
            )
        }
        PasswordSymbolPolicy::AnyNonAlphanumeric => (
            value
                .chars()
                .any(|c| !c.is_alphanumeric() && !c.is_whitespace()),
            true,
        ),
    };

    has_lower && has_upper && has_digit && has_symbol && all_allowed
}

/// Validate a phone number: exactly 11 ASCII digits.
pub fn validate_phone(value: &str) -> ValidationResult {
    if value.is_empty() {
        return ValidationResult::invalid(Field::Phone, "Phone number is required");
    }
    let all_digits = value.chars().all(|c| c.is_ascii_digit());
    if all_digits && value.chars().count() == PHONE_DIGITS {
        ValidationResult::valid(Field::Phone)
    } else {
        ValidationResult::invalid(Field::Phone, "Phone number must be exactly 11 digits")
    }
}

/// Validate a display name under the selected policy.
pub fn validate_name(value: &str, policy: NamePolicy) -> ValidationResult {
    if value.is_empty() {
        return ValidationResult::invalid(Field::Name, "Name is required");
    }
    match policy {
        NamePolicy::LettersOnly => {
            if value.chars().all(char::is_alphabetic) {
                ValidationResult::valid(Field::Name)
            } else {
                ValidationResult::invalid(Field::Name, "Only characters allowed")
            }
        }
        NamePolicy::ExactLength(len) => {
            if value.chars().count() == len {
                ValidationResult::valid(Field::Name)
            } else {
                ValidationResult::invalid(
                    Field::Name,
                    format!("Name must be exactly {} characters", len),
                )
            }
        }
    }
}
