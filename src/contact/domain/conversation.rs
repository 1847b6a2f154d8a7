//! Outreach conversations held with a contact.

use super::{ContactDomainError, ContactId, ConversationId, ParseConversationStatusError};
use chrono::{DateTime, Utc};
use mockable::Clock;
use serde::{Deserialize, Serialize};

/// Outreach status of a conversation.
///
/// Statuses are set by the user; nothing in the system advances them
/// automatically.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ConversationStatus {
    /// Message drafted but not yet sent.
    #[default]
    Draft,
    /// Message sent to the contact.
    Sent,
    /// Contact has replied.
    Replied,
    /// A follow-up is due.
    FollowUp,
}

impl ConversationStatus {
    /// Returns the canonical storage representation.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Draft => "draft",
            Self::Sent => "sent",
            Self::Replied => "replied",
            Self::FollowUp => "follow_up",
        }
    }
}

impl TryFrom<&str> for ConversationStatus {
    type Error = ParseConversationStatusError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        match value.trim().to_ascii_lowercase().as_str() {
            "draft" => Ok(Self::Draft),
            "sent" => Ok(Self::Sent),
            "replied" => Ok(Self::Replied),
            "follow_up" => Ok(Self::FollowUp),
            _ => Err(ParseConversationStatusError(value.to_owned())),
        }
    }
}

/// Request payload for a new conversation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewConversation {
    contact_id: ContactId,
    subject: Option<String>,
    body: String,
    status: ConversationStatus,
}

impl NewConversation {
    /// Creates a draft conversation request.
    ///
    /// # Errors
    ///
    /// Returns [`ContactDomainError::EmptyConversationBody`] when the body is
    /// empty.
    pub fn new(contact_id: ContactId, body: impl Into<String>) -> Result<Self, ContactDomainError> {
        let text = body.into();
        if text.trim().is_empty() {
            return Err(ContactDomainError::EmptyConversationBody);
        }
        Ok(Self {
            contact_id,
            subject: None,
            body: text,
            status: ConversationStatus::Draft,
        })
    }

    /// Sets the subject line.
    #[must_use]
    pub fn with_subject(mut self, subject: impl Into<String>) -> Self {
        self.subject = Some(subject.into());
        self
    }

    /// Sets the initial status.
    #[must_use]
    pub const fn with_status(mut self, status: ConversationStatus) -> Self {
        self.status = status;
        self
    }

    /// Returns the owning contact.
    #[must_use]
    pub const fn contact_id(&self) -> ContactId {
        self.contact_id
    }
}

/// Conversation record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Conversation {
    id: ConversationId,
    contact_id: ContactId,
    subject: Option<String>,
    body: String,
    status: ConversationStatus,
    sent_at: Option<DateTime<Utc>>,
    created_at: DateTime<Utc>,
}

/// Parameter object for reconstructing a persisted conversation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PersistedConversationData {
    /// Persisted identifier.
    pub id: ConversationId,
    /// Owning contact.
    pub contact_id: ContactId,
    /// Persisted subject.
    pub subject: Option<String>,
    /// Persisted body.
    pub body: String,
    /// Persisted status.
    pub status: ConversationStatus,
    /// Persisted send timestamp.
    pub sent_at: Option<DateTime<Utc>>,
    /// Persisted creation timestamp.
    pub created_at: DateTime<Utc>,
}

impl Conversation {
    /// Creates a conversation from a validated request.
    #[must_use]
    pub fn create(request: NewConversation, clock: &impl Clock) -> Self {
        let timestamp = clock.utc();
        let sent_at = (request.status == ConversationStatus::Sent).then_some(timestamp);
        Self {
            id: ConversationId::new(),
            contact_id: request.contact_id,
            subject: request.subject,
            body: request.body,
            status: request.status,
            sent_at,
            created_at: timestamp,
        }
    }

    /// Reconstructs a conversation from persisted storage.
    #[must_use]
    pub fn from_persisted(data: PersistedConversationData) -> Self {
        Self {
            id: data.id,
            contact_id: data.contact_id,
            subject: data.subject,
            body: data.body,
            status: data.status,
            sent_at: data.sent_at,
            created_at: data.created_at,
        }
    }

    /// Returns the conversation identifier.
    #[must_use]
    pub const fn id(&self) -> ConversationId {
        self.id
    }

    /// Returns the owning contact.
    #[must_use]
    pub const fn contact_id(&self) -> ContactId {
        self.contact_id
    }

    /// Returns the subject, if any.
    #[must_use]
    pub fn subject(&self) -> Option<&str> {
        self.subject.as_deref()
    }

    /// Returns the message body.
    #[must_use]
    pub fn body(&self) -> &str {
        &self.body
    }

    /// Returns the outreach status.
    #[must_use]
    pub const fn status(&self) -> ConversationStatus {
        self.status
    }

    /// Returns when the message was sent, if it has been.
    #[must_use]
    pub const fn sent_at(&self) -> Option<DateTime<Utc>> {
        self.sent_at
    }

    /// Returns the creation timestamp.
    #[must_use]
    pub const fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    /// Sets the outreach status.
    ///
    /// Moving to [`ConversationStatus::Sent`] records the send time the
    /// first time it happens.
    pub fn set_status(&mut self, status: ConversationStatus, clock: &impl Clock) {
        if status == ConversationStatus::Sent && self.sent_at.is_none() {
            self.sent_at = Some(clock.utc());
        }
        self.status = status;
    }
}
