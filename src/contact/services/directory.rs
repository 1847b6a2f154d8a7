//! CRM directory operations over contacts, conversations and sources.

use super::ingest_contacts;
use crate::contact::{
    domain::{
        Contact, ContactDetail, ContactDomainError, ContactId, ContactUpdate, Conversation,
        ConversationId, ConversationStatus, EmailAddress, ExtractionMethod, NewContact,
        NewConversation, ResearchSource,
    },
    ports::{
        BulkCreateOutcome, ContactRepository, ConversationRepository, ResearchSourceRepository,
    },
};
use crate::store::{CrmStore, Page, PageError, StoreError};
use mockable::Clock;
use std::sync::Arc;
use thiserror::Error;
use tracing::info;

/// Page size used when listing contacts without an explicit limit.
pub const DEFAULT_CONTACT_PAGE_SIZE: usize = 100;

/// Largest page accepted when listing contacts.
pub const MAX_CONTACT_PAGE_SIZE: usize = 500;

/// Builds a contact listing page, defaulting to
/// [`DEFAULT_CONTACT_PAGE_SIZE`] when no limit is given.
///
/// # Errors
///
/// Returns [`PageError::LimitOutOfRange`] when the limit is zero or above
/// [`MAX_CONTACT_PAGE_SIZE`].
pub fn contact_page(skip: usize, limit: Option<usize>) -> Result<Page, PageError> {
    Page::bounded(
        skip,
        limit.unwrap_or(DEFAULT_CONTACT_PAGE_SIZE),
        MAX_CONTACT_PAGE_SIZE,
    )
}

/// Service-level errors for directory operations.
#[derive(Debug, Error)]
pub enum DirectoryError {
    /// Domain validation failed.
    #[error(transparent)]
    Domain(#[from] ContactDomainError),
    /// Store operation failed.
    #[error(transparent)]
    Store(#[from] StoreError),
}

impl DirectoryError {
    /// Returns whether the error is a user-facing conflict on email.
    #[must_use]
    pub const fn is_conflict(&self) -> bool {
        matches!(self, Self::Store(StoreError::DuplicateEmail(_)))
    }
}

/// Result type for directory operations.
pub type DirectoryResult<T> = Result<T, DirectoryError>;

/// Contact directory service.
///
/// Every operation opens its own store session.
#[derive(Clone)]
pub struct ContactDirectoryService<S, C>
where
    S: CrmStore,
    C: Clock + Send + Sync,
{
    store: Arc<S>,
    clock: Arc<C>,
}

impl<S, C> ContactDirectoryService<S, C>
where
    S: CrmStore,
    C: Clock + Send + Sync,
{
    /// Creates a new directory service.
    #[must_use]
    pub const fn new(store: Arc<S>, clock: Arc<C>) -> Self {
        Self { store, clock }
    }

    /// Creates a single contact.
    ///
    /// # Errors
    ///
    /// Returns a conflict ([`DirectoryError::is_conflict`]) when the email is
    /// already taken, or the underlying store error.
    pub async fn create_contact(&self, request: NewContact) -> DirectoryResult<Contact> {
        let session = self.store.open_session().await?;
        let contact = Contact::create(request, &*self.clock);
        session.insert(&contact).await?;
        info!(contact_id = %contact.id(), email = %contact.email(), "created contact");
        Ok(contact)
    }

    /// Creates many contacts, skipping emails that already exist.
    ///
    /// # Errors
    ///
    /// Returns the store error when the batch cannot be committed.
    pub async fn bulk_create_contacts(
        &self,
        requests: Vec<NewContact>,
    ) -> DirectoryResult<BulkCreateOutcome> {
        let session = self.store.open_session().await?;
        Ok(ingest_contacts(&session, requests, &*self.clock).await?)
    }

    /// Retrieves a contact by identifier.
    ///
    /// # Errors
    ///
    /// Returns [`DirectoryError::Store`] when the lookup fails.
    pub async fn get_contact(&self, id: ContactId) -> DirectoryResult<Option<Contact>> {
        let session = self.store.open_session().await?;
        Ok(session.find_by_id(id).await?)
    }

    /// Retrieves a contact with its conversations and research sources.
    ///
    /// # Errors
    ///
    /// Returns [`DirectoryError::Store`] when a lookup fails.
    pub async fn get_contact_detail(&self, id: ContactId) -> DirectoryResult<Option<ContactDetail>> {
        let session = self.store.open_session().await?;
        let Some(contact) = session.find_by_id(id).await? else {
            return Ok(None);
        };
        let conversations = session.conversations_for(id).await?;
        let research_sources = session.sources_for(id).await?;
        Ok(Some(ContactDetail {
            contact,
            conversations,
            research_sources,
        }))
    }

    /// Finds a contact by exact email address.
    ///
    /// # Errors
    ///
    /// Returns [`DirectoryError::Store`] when the lookup fails.
    pub async fn find_by_email(&self, email: &EmailAddress) -> DirectoryResult<Option<Contact>> {
        let session = self.store.open_session().await?;
        Ok(session.find_by_email(email).await?)
    }

    /// Lists contacts in creation order.
    ///
    /// # Errors
    ///
    /// Returns [`DirectoryError::Store`] when the query fails.
    pub async fn list_contacts(&self, page: Page) -> DirectoryResult<Vec<Contact>> {
        let session = self.store.open_session().await?;
        Ok(session.list(page).await?)
    }

    /// Applies a partial update to a contact.
    ///
    /// Returns `Ok(None)` when the contact does not exist.
    ///
    /// # Errors
    ///
    /// Returns [`DirectoryError::Domain`] for invalid replacement values and
    /// a conflict when the new email belongs to another contact.
    pub async fn update_contact(
        &self,
        id: ContactId,
        update: ContactUpdate,
    ) -> DirectoryResult<Option<Contact>> {
        let session = self.store.open_session().await?;
        let Some(mut contact) = session.find_by_id(id).await? else {
            return Ok(None);
        };
        contact.apply(update, &*self.clock)?;
        if !session.update(&contact).await? {
            return Ok(None);
        }
        info!(contact_id = %id, "updated contact");
        Ok(Some(contact))
    }

    /// Deletes a contact and everything attached to it.
    ///
    /// Returns `false` when the contact does not exist.
    ///
    /// # Errors
    ///
    /// Returns [`DirectoryError::Store`] when the delete fails.
    pub async fn delete_contact(&self, id: ContactId) -> DirectoryResult<bool> {
        let session = self.store.open_session().await?;
        let deleted = session.delete(id).await?;
        if deleted {
            info!(contact_id = %id, "deleted contact");
        }
        Ok(deleted)
    }

    /// Searches contacts by name, email, affiliation or field.
    ///
    /// # Errors
    ///
    /// Returns [`DirectoryError::Store`] when the query fails.
    pub async fn search_contacts(&self, text: &str) -> DirectoryResult<Vec<Contact>> {
        let session = self.store.open_session().await?;
        Ok(session.search(text).await?)
    }

    /// Records a conversation with a contact.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::ContactNotFound`] when the contact is missing.
    pub async fn create_conversation(
        &self,
        request: NewConversation,
    ) -> DirectoryResult<Conversation> {
        let session = self.store.open_session().await?;
        let conversation = Conversation::create(request, &*self.clock);
        session.insert_conversation(&conversation).await?;
        info!(
            contact_id = %conversation.contact_id(),
            conversation_id = %conversation.id(),
            "created conversation"
        );
        Ok(conversation)
    }

    /// Lists conversations for a contact, newest first.
    ///
    /// # Errors
    ///
    /// Returns [`DirectoryError::Store`] when the query fails.
    pub async fn list_conversations(
        &self,
        contact_id: ContactId,
    ) -> DirectoryResult<Vec<Conversation>> {
        let session = self.store.open_session().await?;
        Ok(session.conversations_for(contact_id).await?)
    }

    /// Sets the outreach status of a conversation.
    ///
    /// Returns `Ok(None)` when the conversation does not exist.
    ///
    /// # Errors
    ///
    /// Returns [`DirectoryError::Store`] when the update fails.
    pub async fn update_conversation_status(
        &self,
        id: ConversationId,
        status: ConversationStatus,
    ) -> DirectoryResult<Option<Conversation>> {
        let session = self.store.open_session().await?;
        let Some(mut conversation) = session.find_conversation(id).await? else {
            return Ok(None);
        };
        conversation.set_status(status, &*self.clock);
        if !session.update_conversation(&conversation).await? {
            return Ok(None);
        }
        Ok(Some(conversation))
    }

    /// Attaches a research source to a contact.
    ///
    /// # Errors
    ///
    /// Returns [`DirectoryError::Domain`] for an empty URL and
    /// [`StoreError::ContactNotFound`] when the contact is missing.
    pub async fn add_research_source(
        &self,
        contact_id: ContactId,
        url: &str,
        method: ExtractionMethod,
    ) -> DirectoryResult<ResearchSource> {
        let session = self.store.open_session().await?;
        let source = ResearchSource::record(contact_id, url, method, &*self.clock)?;
        session.insert_source(&source).await?;
        Ok(source)
    }

    /// Lists research sources for a contact.
    ///
    /// # Errors
    ///
    /// Returns [`DirectoryError::Store`] when the query fails.
    pub async fn list_research_sources(
        &self,
        contact_id: ContactId,
    ) -> DirectoryResult<Vec<ResearchSource>> {
        let session = self.store.open_session().await?;
        Ok(session.sources_for(contact_id).await?)
    }
}
