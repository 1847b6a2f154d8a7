//! Diesel row models and conversions to domain types.

use super::schema::{contacts, conversations, research_sources, research_tasks};
use crate::contact::domain::{
    Contact, ContactId, ContactName, Conversation, ConversationId, ConversationStatus,
    EmailAddress, ExtractionMethod, PersistedContactData, PersistedConversationData,
    PersistedResearchSourceData, ResearchSource, ResearchSourceId,
};
use crate::research::domain::{
    PersistedResearchTaskData, ResearchQuery, ResearchTask, ResearchTaskId, ResearchTaskState,
};
use crate::store::{StoreError, StoreResult};
use chrono::{DateTime, Utc};
use diesel::prelude::*;

/// Contact row, used for reads and inserts.
#[derive(Debug, Clone, Queryable, QueryableByName, Selectable, Insertable)]
#[diesel(table_name = contacts)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct ContactRow {
    /// Contact identifier.
    pub id: uuid::Uuid,
    /// Display name.
    pub name: String,
    /// Email address.
    pub email: String,
    /// Institution or company.
    pub affiliation: Option<String>,
    /// Field of work.
    pub field: Option<String>,
    /// Website.
    pub website: Option<String>,
    /// Discovery page.
    pub source_url: Option<String>,
    /// Confidence score.
    pub confidence: f64,
    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
    /// Last update timestamp.
    pub updated_at: DateTime<Utc>,
}

impl From<&Contact> for ContactRow {
    fn from(contact: &Contact) -> Self {
        Self {
            id: contact.id().into_inner(),
            name: contact.name().as_str().to_owned(),
            email: contact.email().as_str().to_owned(),
            affiliation: contact.affiliation().map(str::to_owned),
            field: contact.field().map(str::to_owned),
            website: contact.website().map(str::to_owned),
            source_url: contact.source_url().map(str::to_owned),
            confidence: contact.confidence(),
            created_at: contact.created_at(),
            updated_at: contact.updated_at(),
        }
    }
}

impl TryFrom<ContactRow> for Contact {
    type Error = StoreError;

    fn try_from(row: ContactRow) -> StoreResult<Self> {
        Ok(Self::from_persisted(PersistedContactData {
            id: ContactId::from_uuid(row.id),
            name: ContactName::new(row.name).map_err(StoreError::persistence)?,
            email: EmailAddress::new(row.email).map_err(StoreError::persistence)?,
            affiliation: row.affiliation,
            field: row.field,
            website: row.website,
            source_url: row.source_url,
            confidence: row.confidence,
            created_at: row.created_at,
            updated_at: row.updated_at,
        }))
    }
}

/// Conversation row, used for reads and inserts.
#[derive(Debug, Clone, Queryable, Selectable, Insertable)]
#[diesel(table_name = conversations)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct ConversationRow {
    /// Conversation identifier.
    pub id: uuid::Uuid,
    /// Owning contact.
    pub contact_id: uuid::Uuid,
    /// Subject line.
    pub subject: Option<String>,
    /// Message body.
    pub body: String,
    /// Lifecycle status.
    pub status: String,
    /// Send timestamp.
    pub sent_at: Option<DateTime<Utc>>,
    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
}

impl From<&Conversation> for ConversationRow {
    fn from(conversation: &Conversation) -> Self {
        Self {
            id: conversation.id().into_inner(),
            contact_id: conversation.contact_id().into_inner(),
            subject: conversation.subject().map(str::to_owned),
            body: conversation.body().to_owned(),
            status: conversation.status().as_str().to_owned(),
            sent_at: conversation.sent_at(),
            created_at: conversation.created_at(),
        }
    }
}

impl TryFrom<ConversationRow> for Conversation {
    type Error = StoreError;

    fn try_from(row: ConversationRow) -> StoreResult<Self> {
        let status =
            ConversationStatus::try_from(row.status.as_str()).map_err(StoreError::persistence)?;
        Ok(Self::from_persisted(PersistedConversationData {
            id: ConversationId::from_uuid(row.id),
            contact_id: ContactId::from_uuid(row.contact_id),
            subject: row.subject,
            body: row.body,
            status,
            sent_at: row.sent_at,
            created_at: row.created_at,
        }))
    }
}

/// Research source row, used for reads and inserts.
#[derive(Debug, Clone, Queryable, Selectable, Insertable)]
#[diesel(table_name = research_sources)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct ResearchSourceRow {
    /// Source identifier.
    pub id: uuid::Uuid,
    /// Owning contact.
    pub contact_id: uuid::Uuid,
    /// Source URL.
    pub url: String,
    /// Extraction method tag.
    pub extraction_method: Option<String>,
    /// Extraction timestamp.
    pub extracted_at: DateTime<Utc>,
}

impl From<&ResearchSource> for ResearchSourceRow {
    fn from(source: &ResearchSource) -> Self {
        Self {
            id: source.id().into_inner(),
            contact_id: source.contact_id().into_inner(),
            url: source.url().to_owned(),
            extraction_method: source
                .extraction_method()
                .map(|method| method.as_str().to_owned()),
            extracted_at: source.extracted_at(),
        }
    }
}

impl From<ResearchSourceRow> for ResearchSource {
    fn from(row: ResearchSourceRow) -> Self {
        Self::from_persisted(PersistedResearchSourceData {
            id: ResearchSourceId::from_uuid(row.id),
            contact_id: ContactId::from_uuid(row.contact_id),
            url: row.url,
            extraction_method: row.extraction_method.map(ExtractionMethod::new),
            extracted_at: row.extracted_at,
        })
    }
}

/// Research task row, used for reads and inserts.
#[derive(Debug, Clone, Queryable, Selectable, Insertable)]
#[diesel(table_name = research_tasks)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct ResearchTaskRow {
    /// Task identifier.
    pub id: uuid::Uuid,
    /// Research query.
    pub query: String,
    /// Lifecycle state.
    pub status: String,
    /// New contacts created by the run.
    pub results_count: i32,
    /// Failure text.
    pub error_message: Option<String>,
    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
    /// Terminal state timestamp.
    pub completed_at: Option<DateTime<Utc>>,
}

impl TryFrom<&ResearchTask> for ResearchTaskRow {
    type Error = StoreError;

    fn try_from(task: &ResearchTask) -> StoreResult<Self> {
        Ok(Self {
            id: task.id().into_inner(),
            query: task.query().as_str().to_owned(),
            status: task.state().as_str().to_owned(),
            results_count: i32::try_from(task.results_count()).map_err(StoreError::persistence)?,
            error_message: task.error_message().map(str::to_owned),
            created_at: task.created_at(),
            completed_at: task.completed_at(),
        })
    }
}

impl TryFrom<ResearchTaskRow> for ResearchTask {
    type Error = StoreError;

    fn try_from(row: ResearchTaskRow) -> StoreResult<Self> {
        Ok(Self::from_persisted(PersistedResearchTaskData {
            id: ResearchTaskId::from_uuid(row.id),
            query: ResearchQuery::new(row.query).map_err(StoreError::persistence)?,
            state: ResearchTaskState::try_from(row.status.as_str())
                .map_err(StoreError::persistence)?,
            results_count: u32::try_from(row.results_count).map_err(StoreError::persistence)?,
            error_message: row.error_message,
            created_at: row.created_at,
            completed_at: row.completed_at,
        }))
    }
}
