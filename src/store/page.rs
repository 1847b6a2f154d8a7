//! Offset pagination for list queries.

use thiserror::Error;

/// Offset and limit for a list query.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Page {
    skip: usize,
    limit: usize,
}

impl Page {
    /// Largest page size accepted by [`Page::new`].
    pub const MAX_LIMIT: usize = 200;

    /// Creates a validated page.
    ///
    /// # Errors
    ///
    /// Returns [`PageError::LimitOutOfRange`] when `limit` is zero or larger
    /// than [`Page::MAX_LIMIT`].
    pub const fn new(skip: usize, limit: usize) -> Result<Self, PageError> {
        Self::bounded(skip, limit, Self::MAX_LIMIT)
    }

    /// Creates a page validated against a caller-chosen cap.
    ///
    /// # Errors
    ///
    /// Returns [`PageError::LimitOutOfRange`] when `limit` is zero or larger
    /// than `max`.
    pub const fn bounded(skip: usize, limit: usize, max: usize) -> Result<Self, PageError> {
        if limit == 0 || limit > max {
            return Err(PageError::LimitOutOfRange { limit, max });
        }
        Ok(Self { skip, limit })
    }

    /// Number of records to skip.
    #[must_use]
    pub const fn skip(self) -> usize {
        self.skip
    }

    /// Maximum number of records to return.
    #[must_use]
    pub const fn limit(self) -> usize {
        self.limit
    }

    /// Applies the page to an ordered iterator.
    pub fn apply<I: IntoIterator>(self, items: I) -> impl Iterator<Item = I::Item> {
        items.into_iter().skip(self.skip).take(self.limit)
    }
}

/// Errors returned while constructing a [`Page`].
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum PageError {
    /// The limit is outside the accepted range.
    #[error("page limit must be between 1 and {max}, got {limit}")]
    LimitOutOfRange {
        /// Requested limit.
        limit: usize,
        /// Largest accepted limit.
        max: usize,
    },
}
