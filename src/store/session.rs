//! Store and session ports.

use super::StoreResult;
use crate::contact::ports::{ContactRepository, ConversationRepository, ResearchSourceRepository};
use crate::research::ports::ResearchTaskRepository;
use async_trait::async_trait;

/// Scoped handle implementing every repository port.
///
/// Implementations release any connection they hold when dropped, so a
/// session cannot leak regardless of how the caller exits.
pub trait StoreSession:
    ContactRepository + ConversationRepository + ResearchSourceRepository + ResearchTaskRepository
{
}

impl<T> StoreSession for T where
    T: ContactRepository + ConversationRepository + ResearchSourceRepository + ResearchTaskRepository
{
}

/// Factory for store sessions.
#[async_trait]
pub trait CrmStore: Send + Sync {
    /// Session type handed out by this store.
    type Session: StoreSession;

    /// Opens a session for one unit of work.
    ///
    /// # Errors
    ///
    /// Returns [`crate::store::StoreError::Unavailable`] when no connection
    /// can be acquired.
    async fn open_session(&self) -> StoreResult<Self::Session>;
}
