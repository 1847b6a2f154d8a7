//! Error types for contact domain validation and parsing.

use thiserror::Error;

/// Errors returned while constructing contact domain values.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ContactDomainError {
    /// The contact name is empty.
    #[error("contact name must not be empty")]
    EmptyName,

    /// The email address is empty.
    #[error("contact email must not be empty")]
    EmptyEmail,

    /// The email address lacks an `@` or a `.`.
    #[error("invalid email address '{0}', expected an '@' and a '.'")]
    InvalidEmail(String),

    /// The conversation body is empty.
    #[error("conversation body must not be empty")]
    EmptyConversationBody,

    /// The research source URL is empty.
    #[error("research source url must not be empty")]
    EmptySourceUrl,
}

/// Error returned while parsing conversation statuses.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("unknown conversation status: {0}")]
pub struct ParseConversationStatusError(pub String);
