// ABOUTME: Field validation helpers for user records
// ABOUTME: Email format check and the per-field error map returned to API clients

use regex::Regex;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::sync::LazyLock;

/// Message attached to a field that fails its format check
pub const MSG_INVALID: &str = "is not valid";

/// Message attached to a field whose value must be unique but already exists
pub const MSG_TAKEN: &str = "has already been taken";

static EMAIL_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)^([^@\s]+)@((?:[-a-z0-9]+\.)+[a-z]{2,})$")
        .unwrap_or_else(|e| panic!("email pattern must compile: {}", e))
});

/// Check an email address against the accepted format.
///
/// The local part may hold anything but `@` and whitespace; the domain must be
/// one or more dot-terminated labels followed by an alphabetic TLD of at least
/// two characters.
pub fn is_valid_email(email: &str) -> bool {
    EMAIL_PATTERN.is_match(email)
}

/// Validation failures keyed by field name, serialized as `{"field": ["msg", ...]}`
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FieldErrors(BTreeMap<String, Vec<String>>);

impl FieldErrors {
    pub fn new() -> Self {
        Self::default()
    }

    /// Shorthand for a single failing field
    pub fn single(field: &str, message: &str) -> Self {
        let mut errors = Self::new();
        errors.add(field, message);
        errors
    }

    pub fn add(&mut self, field: &str, message: &str) {
        self.0
            .entry(field.to_string())
            .or_default()
            .push(message.to_string());
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn get(&self, field: &str) -> Option<&[String]> {
        self.0.get(field).map(Vec::as_slice)
    }

    pub fn len(&self) -> usize {
        self.0.values().map(Vec::len).sum()
    }
}

impl fmt::Display for FieldErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let parts: Vec<String> = self
            .0
            .iter()
            .flat_map(|(field, messages)| messages.iter().map(move |m| format!("{} {}", field, m)))
            .collect();
        write!(f, "{}", parts.join(", "))
    }
}
