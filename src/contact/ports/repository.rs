//! Repository ports for contacts, conversations and research sources.

use crate::contact::domain::{
    Contact, ContactId, Conversation, ConversationId, EmailAddress, ResearchSource,
};
use crate::store::{Page, StoreResult};
use async_trait::async_trait;

/// Contact persistence contract.
#[async_trait]
pub trait ContactRepository: Send + Sync {
    /// Stores a new contact.
    ///
    /// # Errors
    ///
    /// Returns [`crate::store::StoreError::DuplicateEmail`] when the email
    /// address is already present.
    async fn insert(&self, contact: &Contact) -> StoreResult<()>;

    /// Stores a batch of contacts, skipping those whose email is taken.
    ///
    /// Items are processed in input order. An email that already exists, or
    /// that appeared earlier in the same batch, is skipped. A store failure
    /// on one item is recorded and does not abort the rest. All accepted
    /// rows are committed together.
    ///
    /// # Errors
    ///
    /// Returns an error when the email lookup or the final commit fails; in
    /// that case nothing from the batch is persisted.
    async fn bulk_create(&self, contacts: Vec<Contact>) -> StoreResult<BulkCreateOutcome>;

    /// Persists changes to an existing contact.
    ///
    /// Returns `false` when the contact does not exist.
    ///
    /// # Errors
    ///
    /// Returns [`crate::store::StoreError::DuplicateEmail`] when the new
    /// email address belongs to another contact.
    async fn update(&self, contact: &Contact) -> StoreResult<bool>;

    /// Deletes a contact with its conversations and research sources.
    ///
    /// Returns `false` when the contact does not exist.
    async fn delete(&self, id: ContactId) -> StoreResult<bool>;

    /// Finds a contact by identifier.
    async fn find_by_id(&self, id: ContactId) -> StoreResult<Option<Contact>>;

    /// Finds a contact by exact, case-sensitive email address.
    async fn find_by_email(&self, email: &EmailAddress) -> StoreResult<Option<Contact>>;

    /// Lists contacts in creation order.
    async fn list(&self, page: Page) -> StoreResult<Vec<Contact>>;

    /// Returns contacts whose name, email, affiliation or field contains
    /// `text`, ignoring case, in creation order.
    async fn search(&self, text: &str) -> StoreResult<Vec<Contact>>;
}

/// Conversation persistence contract.
#[async_trait]
pub trait ConversationRepository: Send + Sync {
    /// Stores a new conversation.
    ///
    /// # Errors
    ///
    /// Returns [`crate::store::StoreError::ContactNotFound`] when the owning
    /// contact does not exist.
    async fn insert_conversation(&self, conversation: &Conversation) -> StoreResult<()>;

    /// Persists changes to an existing conversation.
    ///
    /// Returns `false` when the conversation does not exist.
    async fn update_conversation(&self, conversation: &Conversation) -> StoreResult<bool>;

    /// Finds a conversation by identifier.
    async fn find_conversation(&self, id: ConversationId) -> StoreResult<Option<Conversation>>;

    /// Lists conversations for a contact, newest first.
    async fn conversations_for(&self, contact_id: ContactId) -> StoreResult<Vec<Conversation>>;
}

/// Research source persistence contract.
#[async_trait]
pub trait ResearchSourceRepository: Send + Sync {
    /// Stores a new research source.
    ///
    /// # Errors
    ///
    /// Returns [`crate::store::StoreError::ContactNotFound`] when the owning
    /// contact does not exist.
    async fn insert_source(&self, source: &ResearchSource) -> StoreResult<()>;

    /// Lists research sources for a contact in the order they were recorded.
    async fn sources_for(&self, contact_id: ContactId) -> StoreResult<Vec<ResearchSource>>;
}

/// Result of a bulk contact insert.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct BulkCreateOutcome {
    /// Contacts actually created, in input order.
    pub created: Vec<Contact>,
    /// Emails skipped because a contact with that address already exists.
    pub skipped: Vec<EmailAddress>,
    /// Items the store failed to insert.
    pub failed: Vec<FailedContact>,
}

impl BulkCreateOutcome {
    /// Records a skipped email.
    pub fn skip(&mut self, email: EmailAddress) {
        self.skipped.push(email);
    }

    /// Records an item the store rejected.
    pub fn fail(&mut self, email: EmailAddress, reason: impl Into<String>) {
        self.failed.push(FailedContact {
            email,
            reason: reason.into(),
        });
    }
}

/// Contact that could not be inserted during a bulk create.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FailedContact {
    /// Email address of the rejected contact.
    pub email: EmailAddress,
    /// Store error text.
    pub reason: String,
}
