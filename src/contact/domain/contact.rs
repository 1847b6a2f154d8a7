//! Contact aggregate root and the request types that create or change it.

use super::{
    ContactDomainError, ContactId, ContactName, Conversation, EmailAddress, ResearchSource,
};
use chrono::{DateTime, Utc};
use mockable::Clock;
use serde::{Deserialize, Serialize};

/// Confidence assigned to contacts when none is supplied.
const DEFAULT_CONFIDENCE: f64 = 1.0;

/// Validated input for a new contact.
#[derive(Debug, Clone, PartialEq)]
pub struct NewContact {
    name: ContactName,
    email: EmailAddress,
    affiliation: Option<String>,
    field: Option<String>,
    website: Option<String>,
    source_url: Option<String>,
    confidence: f64,
}

impl NewContact {
    /// Creates a contact request with the required fields.
    #[must_use]
    pub const fn new(name: ContactName, email: EmailAddress) -> Self {
        Self {
            name,
            email,
            affiliation: None,
            field: None,
            website: None,
            source_url: None,
            confidence: DEFAULT_CONFIDENCE,
        }
    }

    /// Creates a contact request from raw strings.
    ///
    /// # Errors
    ///
    /// Returns [`ContactDomainError`] when the name is empty or the email
    /// address is malformed.
    pub fn try_new(
        name: impl Into<String>,
        email: impl Into<String>,
    ) -> Result<Self, ContactDomainError> {
        Ok(Self::new(ContactName::new(name)?, EmailAddress::new(email)?))
    }

    /// Sets the institution or company.
    #[must_use]
    pub fn with_affiliation(mut self, affiliation: impl Into<String>) -> Self {
        self.affiliation = Some(affiliation.into());
        self
    }

    /// Sets the research area or job role.
    #[must_use]
    pub fn with_field(mut self, field: impl Into<String>) -> Self {
        self.field = Some(field.into());
        self
    }

    /// Sets the personal or institutional website.
    #[must_use]
    pub fn with_website(mut self, website: impl Into<String>) -> Self {
        self.website = Some(website.into());
        self
    }

    /// Sets the URL where the contact details were found.
    #[must_use]
    pub fn with_source_url(mut self, source_url: impl Into<String>) -> Self {
        self.source_url = Some(source_url.into());
        self
    }

    /// Sets the confidence score.
    #[must_use]
    pub const fn with_confidence(mut self, confidence: f64) -> Self {
        self.confidence = confidence;
        self
    }

    /// Returns the requested email address.
    #[must_use]
    pub const fn email(&self) -> &EmailAddress {
        &self.email
    }
}

/// Partial update applied to an existing contact.
///
/// Fields left as `None` keep their current value.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ContactUpdate {
    /// Replacement name.
    pub name: Option<String>,
    /// Replacement email address.
    pub email: Option<String>,
    /// Replacement affiliation.
    pub affiliation: Option<String>,
    /// Replacement field of work.
    pub field: Option<String>,
    /// Replacement website.
    pub website: Option<String>,
    /// Replacement source URL.
    pub source_url: Option<String>,
    /// Replacement confidence score.
    pub confidence: Option<f64>,
}

/// Contact aggregate root.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Contact {
    id: ContactId,
    name: ContactName,
    email: EmailAddress,
    affiliation: Option<String>,
    field: Option<String>,
    website: Option<String>,
    source_url: Option<String>,
    confidence: f64,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

/// Parameter object for reconstructing a persisted contact.
#[derive(Debug, Clone, PartialEq)]
pub struct PersistedContactData {
    /// Persisted identifier.
    pub id: ContactId,
    /// Persisted name.
    pub name: ContactName,
    /// Persisted email address.
    pub email: EmailAddress,
    /// Persisted affiliation.
    pub affiliation: Option<String>,
    /// Persisted field of work.
    pub field: Option<String>,
    /// Persisted website.
    pub website: Option<String>,
    /// Persisted source URL.
    pub source_url: Option<String>,
    /// Persisted confidence score.
    pub confidence: f64,
    /// Persisted creation timestamp.
    pub created_at: DateTime<Utc>,
    /// Persisted last update timestamp.
    pub updated_at: DateTime<Utc>,
}

impl Contact {
    /// Creates a new contact, stamping both timestamps from the clock.
    #[must_use]
    pub fn create(request: NewContact, clock: &impl Clock) -> Self {
        let timestamp = clock.utc();
        let NewContact {
            name,
            email,
            affiliation,
            field,
            website,
            source_url,
            confidence,
        } = request;

        Self {
            id: ContactId::new(),
            name,
            email,
            affiliation,
            field,
            website,
            source_url,
            confidence,
            created_at: timestamp,
            updated_at: timestamp,
        }
    }

    /// Reconstructs a contact from persisted storage.
    #[must_use]
    pub fn from_persisted(data: PersistedContactData) -> Self {
        Self {
            id: data.id,
            name: data.name,
            email: data.email,
            affiliation: data.affiliation,
            field: data.field,
            website: data.website,
            source_url: data.source_url,
            confidence: data.confidence,
            created_at: data.created_at,
            updated_at: data.updated_at,
        }
    }

    /// Returns the contact identifier.
    #[must_use]
    pub const fn id(&self) -> ContactId {
        self.id
    }

    /// Returns the contact name.
    #[must_use]
    pub const fn name(&self) -> &ContactName {
        &self.name
    }

    /// Returns the contact email address.
    #[must_use]
    pub const fn email(&self) -> &EmailAddress {
        &self.email
    }

    /// Returns the affiliation, if any.
    #[must_use]
    pub fn affiliation(&self) -> Option<&str> {
        self.affiliation.as_deref()
    }

    /// Returns the field of work, if any.
    #[must_use]
    pub fn field(&self) -> Option<&str> {
        self.field.as_deref()
    }

    /// Returns the website, if any.
    #[must_use]
    pub fn website(&self) -> Option<&str> {
        self.website.as_deref()
    }

    /// Returns the source URL, if any.
    #[must_use]
    pub fn source_url(&self) -> Option<&str> {
        self.source_url.as_deref()
    }

    /// Returns the confidence score.
    #[must_use]
    pub const fn confidence(&self) -> f64 {
        self.confidence
    }

    /// Returns the creation timestamp.
    #[must_use]
    pub const fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    /// Returns the latest update timestamp.
    #[must_use]
    pub const fn updated_at(&self) -> DateTime<Utc> {
        self.updated_at
    }

    /// Applies a partial update.
    ///
    /// Nothing changes when validation fails.
    ///
    /// # Errors
    ///
    /// Returns [`ContactDomainError`] when a replacement name or email is
    /// invalid.
    pub fn apply(
        &mut self,
        update: ContactUpdate,
        clock: &impl Clock,
    ) -> Result<(), ContactDomainError> {
        let ContactUpdate {
            name,
            email,
            affiliation,
            field,
            website,
            source_url,
            confidence,
        } = update;

        let new_name = name.map(ContactName::new).transpose()?;
        let new_email = email.map(EmailAddress::new).transpose()?;

        if let Some(value) = new_name {
            self.name = value;
        }
        if let Some(value) = new_email {
            self.email = value;
        }
        replace_if_set(&mut self.affiliation, affiliation);
        replace_if_set(&mut self.field, field);
        replace_if_set(&mut self.website, website);
        replace_if_set(&mut self.source_url, source_url);
        if let Some(value) = confidence {
            self.confidence = value;
        }
        self.updated_at = clock.utc();
        Ok(())
    }

    /// Returns whether any searchable attribute contains `needle`,
    /// ignoring case.
    ///
    /// `needle` must already be lowercase.
    #[must_use]
    pub fn matches_lowercase(&self, needle: &str) -> bool {
        let contains = |value: &str| value.to_lowercase().contains(needle);
        contains(self.name.as_str())
            || contains(self.email.as_str())
            || self.affiliation().is_some_and(contains)
            || self.field().is_some_and(contains)
    }
}

fn replace_if_set(field: &mut Option<String>, value: Option<String>) {
    if value.is_some() {
        *field = value;
    }
}

/// Contact together with its conversations and research sources.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ContactDetail {
    /// The contact itself.
    pub contact: Contact,
    /// Conversations, newest first.
    pub conversations: Vec<Conversation>,
    /// Research sources in the order they were recorded.
    pub research_sources: Vec<ResearchSource>,
}
