//! In-memory store used by tests and local dry runs.
//!
//! Sessions share the store state, so writes made through one session are
//! visible to every other session immediately. A batch insert holds the
//! write lock for the whole batch, which gives it the same all-or-nothing
//! visibility as a database transaction.

use crate::contact::{
    domain::{Contact, ContactId, Conversation, ConversationId, EmailAddress, ResearchSource},
    ports::{BulkCreateOutcome, ContactRepository, ConversationRepository, ResearchSourceRepository},
};
use crate::research::{
    domain::{ResearchTask, ResearchTaskId},
    ports::ResearchTaskRepository,
};
use crate::store::{CrmStore, Page, StoreError, StoreResult};
use async_trait::async_trait;
use std::cmp::Reverse;
use std::collections::{HashMap, HashSet};
use std::sync::{Arc, RwLock, RwLockReadGuard, RwLockWriteGuard};

/// Thread-safe in-memory CRM store.
///
/// Cloning yields another handle onto the same state.
#[derive(Debug, Clone, Default)]
pub struct InMemoryCrmStore {
    state: Arc<RwLock<InMemoryState>>,
}

#[derive(Debug, Default)]
struct InMemoryState {
    contacts: HashMap<ContactId, Contact>,
    contact_order: Vec<ContactId>,
    email_index: HashMap<EmailAddress, ContactId>,
    conversations: Vec<Conversation>,
    sources: Vec<ResearchSource>,
    tasks: HashMap<ResearchTaskId, ResearchTask>,
    task_order: Vec<ResearchTaskId>,
    unavailable: bool,
    rejected_emails: HashSet<EmailAddress>,
}

impl InMemoryState {
    fn store_contact(&mut self, contact: Contact) {
        self.email_index.insert(contact.email().clone(), contact.id());
        self.contact_order.push(contact.id());
        self.contacts.insert(contact.id(), contact);
    }

    fn contacts_in_order(&self) -> impl Iterator<Item = &Contact> {
        self.contact_order
            .iter()
            .filter_map(|id| self.contacts.get(id))
    }

    fn require_contact(&self, id: ContactId) -> StoreResult<()> {
        if self.contacts.contains_key(&id) {
            Ok(())
        } else {
            Err(StoreError::ContactNotFound(id))
        }
    }
}

impl InMemoryCrmStore {
    /// Creates an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Makes subsequent `open_session` calls fail as if the database were
    /// down.
    ///
    /// Fault injection for tests only; application code never calls this.
    pub fn set_unavailable(&self, unavailable: bool) {
        if let Ok(mut state) = self.state.write() {
            state.unavailable = unavailable;
        }
    }

    /// Makes batch inserts record a per-item failure for this email.
    ///
    /// Fault injection for tests only; application code never calls this.
    pub fn reject_email(&self, email: EmailAddress) {
        if let Ok(mut state) = self.state.write() {
            state.rejected_emails.insert(email);
        }
    }

    fn read(&self) -> StoreResult<RwLockReadGuard<'_, InMemoryState>> {
        self.state
            .read()
            .map_err(|err| StoreError::persistence(std::io::Error::other(err.to_string())))
    }

    fn write(&self) -> StoreResult<RwLockWriteGuard<'_, InMemoryState>> {
        self.state
            .write()
            .map_err(|err| StoreError::persistence(std::io::Error::other(err.to_string())))
    }
}

#[async_trait]
impl CrmStore for InMemoryCrmStore {
    type Session = Self;

    async fn open_session(&self) -> StoreResult<Self::Session> {
        if self.read()?.unavailable {
            return Err(StoreError::unavailable(std::io::Error::other(
                "in-memory store is marked unavailable",
            )));
        }
        Ok(self.clone())
    }
}

#[async_trait]
impl ContactRepository for InMemoryCrmStore {
    async fn insert(&self, contact: &Contact) -> StoreResult<()> {
        let mut state = self.write()?;
        if state.email_index.contains_key(contact.email()) {
            return Err(StoreError::DuplicateEmail(contact.email().to_string()));
        }
        state.store_contact(contact.clone());
        Ok(())
    }

    async fn bulk_create(&self, contacts: Vec<Contact>) -> StoreResult<BulkCreateOutcome> {
        let mut state = self.write()?;
        let mut outcome = BulkCreateOutcome::default();
        for contact in contacts {
            if state.email_index.contains_key(contact.email()) {
                outcome.skip(contact.email().clone());
                continue;
            }
            if state.rejected_emails.contains(contact.email()) {
                outcome.fail(contact.email().clone(), "insert rejected by store");
                continue;
            }
            state.store_contact(contact.clone());
            outcome.created.push(contact);
        }
        Ok(outcome)
    }

    async fn update(&self, contact: &Contact) -> StoreResult<bool> {
        let mut state = self.write()?;
        let Some(previous_email) = state
            .contacts
            .get(&contact.id())
            .map(|stored| stored.email().clone())
        else {
            return Ok(false);
        };
        if previous_email != *contact.email() {
            if state.email_index.contains_key(contact.email()) {
                return Err(StoreError::DuplicateEmail(contact.email().to_string()));
            }
            state.email_index.remove(&previous_email);
            state
                .email_index
                .insert(contact.email().clone(), contact.id());
        }
        state.contacts.insert(contact.id(), contact.clone());
        Ok(true)
    }

    async fn delete(&self, id: ContactId) -> StoreResult<bool> {
        let mut state = self.write()?;
        let Some(removed) = state.contacts.remove(&id) else {
            return Ok(false);
        };
        state.email_index.remove(removed.email());
        state.contact_order.retain(|stored| *stored != id);
        state
            .conversations
            .retain(|conversation| conversation.contact_id() != id);
        state.sources.retain(|source| source.contact_id() != id);
        Ok(true)
    }

    async fn find_by_id(&self, id: ContactId) -> StoreResult<Option<Contact>> {
        Ok(self.read()?.contacts.get(&id).cloned())
    }

    async fn find_by_email(&self, email: &EmailAddress) -> StoreResult<Option<Contact>> {
        let state = self.read()?;
        Ok(state
            .email_index
            .get(email)
            .and_then(|id| state.contacts.get(id))
            .cloned())
    }

    async fn list(&self, page: Page) -> StoreResult<Vec<Contact>> {
        let state = self.read()?;
        Ok(page.apply(state.contacts_in_order()).cloned().collect())
    }

    async fn search(&self, text: &str) -> StoreResult<Vec<Contact>> {
        let needle = text.to_lowercase();
        let state = self.read()?;
        Ok(state
            .contacts_in_order()
            .filter(|contact| contact.matches_lowercase(&needle))
            .cloned()
            .collect())
    }
}

#[async_trait]
impl ConversationRepository for InMemoryCrmStore {
    async fn insert_conversation(&self, conversation: &Conversation) -> StoreResult<()> {
        let mut state = self.write()?;
        state.require_contact(conversation.contact_id())?;
        state.conversations.push(conversation.clone());
        Ok(())
    }

    async fn update_conversation(&self, conversation: &Conversation) -> StoreResult<bool> {
        let mut state = self.write()?;
        let Some(stored) = state
            .conversations
            .iter_mut()
            .find(|stored| stored.id() == conversation.id())
        else {
            return Ok(false);
        };
        *stored = conversation.clone();
        Ok(true)
    }

    async fn find_conversation(&self, id: ConversationId) -> StoreResult<Option<Conversation>> {
        let state = self.read()?;
        Ok(state
            .conversations
            .iter()
            .find(|conversation| conversation.id() == id)
            .cloned())
    }

    async fn conversations_for(&self, contact_id: ContactId) -> StoreResult<Vec<Conversation>> {
        let state = self.read()?;
        let mut conversations: Vec<Conversation> = state
            .conversations
            .iter()
            .rev()
            .filter(|conversation| conversation.contact_id() == contact_id)
            .cloned()
            .collect();
        conversations.sort_by_key(|conversation| Reverse(conversation.created_at()));
        Ok(conversations)
    }
}

#[async_trait]
impl ResearchSourceRepository for InMemoryCrmStore {
    async fn insert_source(&self, source: &ResearchSource) -> StoreResult<()> {
        let mut state = self.write()?;
        state.require_contact(source.contact_id())?;
        state.sources.push(source.clone());
        Ok(())
    }

    async fn sources_for(&self, contact_id: ContactId) -> StoreResult<Vec<ResearchSource>> {
        let state = self.read()?;
        Ok(state
            .sources
            .iter()
            .filter(|source| source.contact_id() == contact_id)
            .cloned()
            .collect())
    }
}

#[async_trait]
impl ResearchTaskRepository for InMemoryCrmStore {
    async fn insert_task(&self, task: &ResearchTask) -> StoreResult<()> {
        let mut state = self.write()?;
        state.task_order.push(task.id());
        state.tasks.insert(task.id(), task.clone());
        Ok(())
    }

    async fn update_task(&self, task: &ResearchTask) -> StoreResult<()> {
        let mut state = self.write()?;
        let stored = state
            .tasks
            .get_mut(&task.id())
            .ok_or(StoreError::TaskNotFound(task.id()))?;
        *stored = task.clone();
        Ok(())
    }

    async fn find_task(&self, id: ResearchTaskId) -> StoreResult<Option<ResearchTask>> {
        Ok(self.read()?.tasks.get(&id).cloned())
    }

    async fn list_tasks(&self, page: Page) -> StoreResult<Vec<ResearchTask>> {
        let state = self.read()?;
        let mut tasks: Vec<&ResearchTask> = state
            .task_order
            .iter()
            .rev()
            .filter_map(|id| state.tasks.get(id))
            .collect();
        tasks.sort_by_key(|task| Reverse(task.created_at()));
        Ok(page.apply(tasks).cloned().collect())
    }
}
