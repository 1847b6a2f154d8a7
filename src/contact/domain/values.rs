//! Validated scalar values shared by contacts and research candidates.

use super::ContactDomainError;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Non-empty display name of a contact.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ContactName(String);

impl ContactName {
    /// Creates a validated contact name.
    ///
    /// # Errors
    ///
    /// Returns [`ContactDomainError::EmptyName`] when the value is empty.
    pub fn new(value: impl Into<String>) -> Result<Self, ContactDomainError> {
        let name = value.into();
        if name.is_empty() {
            return Err(ContactDomainError::EmptyName);
        }
        Ok(Self(name))
    }

    /// Returns the name as `str`.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl AsRef<str> for ContactName {
    fn as_ref(&self) -> &str {
        self.as_str()
    }
}

impl fmt::Display for ContactName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Email address with the minimal shape required for outreach.
///
/// The check is purely syntactic: the value must be non-empty and contain
/// both an `@` and a `.`. The address is stored exactly as given, so
/// uniqueness comparisons are case-sensitive.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EmailAddress(String);

impl EmailAddress {
    /// Creates a validated email address.
    ///
    /// # Errors
    ///
    /// Returns [`ContactDomainError::EmptyEmail`] for an empty value and
    /// [`ContactDomainError::InvalidEmail`] when `@` or `.` is missing.
    pub fn new(value: impl Into<String>) -> Result<Self, ContactDomainError> {
        let email = value.into();
        if email.is_empty() {
            return Err(ContactDomainError::EmptyEmail);
        }
        if !email.contains('@') || !email.contains('.') {
            return Err(ContactDomainError::InvalidEmail(email));
        }
        Ok(Self(email))
    }

    /// Returns the address as `str`.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl AsRef<str> for EmailAddress {
    fn as_ref(&self) -> &str {
        self.as_str()
    }
}

impl fmt::Display for EmailAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
