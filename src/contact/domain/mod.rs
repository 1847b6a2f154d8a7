//! Domain model for contacts, conversations and research sources.
//!
//! Email uniqueness is a store concern; the domain only guarantees that every
//! persisted contact carries a syntactically plausible address.

mod contact;
mod conversation;
mod error;
mod ids;
mod source;
mod values;

pub use contact::{Contact, ContactDetail, ContactUpdate, NewContact, PersistedContactData};
pub use conversation::{
    Conversation, ConversationStatus, NewConversation, PersistedConversationData,
};
pub use error::{ContactDomainError, ParseConversationStatusError};
pub(crate) use ids::uuid_identifier;
pub use ids::{ContactId, ConversationId, ResearchSourceId};
pub use source::{ExtractionMethod, PersistedResearchSourceData, ResearchSource};
pub use values::{ContactName, EmailAddress};
