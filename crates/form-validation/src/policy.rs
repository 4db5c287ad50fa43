//! Named validation policies
//!
//! Two of the rules have two reasonable definitions in the wild. Both are
//! kept as selectable policies; callers pick one per form instead of the
//! engine guessing which is canonical.

use serde::{Deserialize, Serialize};

/// Which symbol characters satisfy the password "special character" class.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "kebab-case")]
pub enum PasswordSymbolPolicy {
    /// Symbols drawn from the explicit set `@$!%*?&`.
    ///
    /// Under this policy the whole password is also restricted to
    /// `[A-Za-z0-9@$!%*?&]`; any character outside that class fails the
    /// rule.
    #[default]
    ExplicitSet,

    /// Any character that is neither ASCII alphanumeric nor whitespace
    /// counts as a symbol; no restriction on the remaining characters.
    AnyNonAlphanumeric,
}

impl PasswordSymbolPolicy {
    /// The explicit symbol set used by [`PasswordSymbolPolicy::ExplicitSet`].
    pub const EXPLICIT_SYMBOLS: &'static str = "@$!%*?&";
}

/// Which rule the display name is validated against.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "kebab-case")]
pub enum NamePolicy {
    /// Non-empty and every character alphabetic.
    #[default]
    LettersOnly,
    /// Exactly this many characters, no character-class constraint.
    ExactLength(usize),
}

/// Which form the email field belongs to.
///
/// The login and signup forms word their email messages differently; the
/// wording is configuration, not a behavioral difference.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum EmailContext {
    /// "Email is required" / "Invalid email address"
    #[default]
    Signup,
    /// "Email must be entered" / "Invalid email format"
    Login,
}

impl EmailContext {
    /// Message for an empty email field.
    pub fn required_message(&self) -> &'static str {
        match self {
            EmailContext::Signup => "Email is required",
            EmailContext::Login => "Email must be entered",
        }
    }

    /// Message for a non-empty email that does not match the address grammar.
    pub fn invalid_message(&self) -> &'static str {
        match self {
            EmailContext::Signup => "Invalid email address",
            EmailContext::Login => "Invalid email format",
        }
    }
}

/// The full set of policy choices a form validates under.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct ValidationPolicy {
    /// Password symbol policy.
    pub symbols: PasswordSymbolPolicy,
    /// Display-name policy.
    pub name: NamePolicy,
}

impl ValidationPolicy {
    /// Policy matching the richer of the two observed signup forms:
    /// explicit symbol set, letters-only names.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the password symbol policy.
    pub fn with_symbols(mut self, symbols: PasswordSymbolPolicy) -> Self {
        self.symbols = symbols;
        self
    }

    /// Set the display-name policy.
    pub fn with_name(mut self, name: NamePolicy) -> Self {
        self.name = name;
        self
    }
}
