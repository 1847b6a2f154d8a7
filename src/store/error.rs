//! Errors shared by every repository port.

use crate::contact::domain::ContactId;
use crate::research::domain::ResearchTaskId;
use std::sync::Arc;
use thiserror::Error;

/// Result type for store operations.
pub type StoreResult<T> = Result<T, StoreError>;

/// Errors returned by store implementations.
#[derive(Debug, Clone, Error)]
pub enum StoreError {
    /// A contact with the same email address already exists.
    #[error("a contact with email {0} already exists")]
    DuplicateEmail(String),

    /// A referenced contact does not exist.
    #[error("contact not found: {0}")]
    ContactNotFound(ContactId),

    /// A research task being updated does not exist.
    #[error("research task not found: {0}")]
    TaskNotFound(ResearchTaskId),

    /// The store could not be reached.
    #[error("store unavailable: {0}")]
    Unavailable(Arc<dyn std::error::Error + Send + Sync>),

    /// Persistence-layer failure.
    #[error("persistence error: {0}")]
    Persistence(Arc<dyn std::error::Error + Send + Sync>),
}

impl StoreError {
    /// Wraps a persistence error.
    pub fn persistence(err: impl std::error::Error + Send + Sync + 'static) -> Self {
        Self::Persistence(Arc::new(err))
    }

    /// Wraps a connectivity error.
    pub fn unavailable(err: impl std::error::Error + Send + Sync + 'static) -> Self {
        Self::Unavailable(Arc::new(err))
    }

    /// Returns whether the error is a uniqueness violation on email.
    #[must_use]
    pub const fn is_duplicate_email(&self) -> bool {
        matches!(self, Self::DuplicateEmail(_))
    }
}
