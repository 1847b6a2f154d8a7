//! Research source records explaining where contact details came from.

use super::{ContactDomainError, ContactId, ResearchSourceId};
use chrono::{DateTime, Utc};
use mockable::Clock;
use serde::{Deserialize, Serialize};

/// Free-text tag naming how a source was obtained.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ExtractionMethod(String);

impl ExtractionMethod {
    /// Tag for sources discovered by the research agent.
    pub const LUX_AGENT: &'static str = "lux_agent";

    /// Tag for sources entered by hand.
    pub const MANUAL: &'static str = "manual";

    /// Creates an extraction method tag.
    #[must_use]
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    /// Returns the research agent tag.
    #[must_use]
    pub fn lux_agent() -> Self {
        Self::new(Self::LUX_AGENT)
    }

    /// Returns the manual entry tag.
    #[must_use]
    pub fn manual() -> Self {
        Self::new(Self::MANUAL)
    }

    /// Returns the tag as `str`.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// Research source record attached to a contact.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResearchSource {
    id: ResearchSourceId,
    contact_id: ContactId,
    url: String,
    extraction_method: Option<ExtractionMethod>,
    extracted_at: DateTime<Utc>,
}

/// Parameter object for reconstructing a persisted research source.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PersistedResearchSourceData {
    /// Persisted identifier.
    pub id: ResearchSourceId,
    /// Owning contact.
    pub contact_id: ContactId,
    /// Source URL.
    pub url: String,
    /// Extraction method tag.
    pub extraction_method: Option<ExtractionMethod>,
    /// Extraction timestamp.
    pub extracted_at: DateTime<Utc>,
}

impl ResearchSource {
    /// Records a new source for a contact.
    ///
    /// # Errors
    ///
    /// Returns [`ContactDomainError::EmptySourceUrl`] when the URL is empty.
    pub fn record(
        contact_id: ContactId,
        url: impl Into<String>,
        method: ExtractionMethod,
        clock: &impl Clock,
    ) -> Result<Self, ContactDomainError> {
        let source_url = url.into();
        if source_url.trim().is_empty() {
            return Err(ContactDomainError::EmptySourceUrl);
        }
        Ok(Self {
            id: ResearchSourceId::new(),
            contact_id,
            url: source_url,
            extraction_method: Some(method),
            extracted_at: clock.utc(),
        })
    }

    /// Reconstructs a source from persisted storage.
    #[must_use]
    pub fn from_persisted(data: PersistedResearchSourceData) -> Self {
        Self {
            id: data.id,
            contact_id: data.contact_id,
            url: data.url,
            extraction_method: data.extraction_method,
            extracted_at: data.extracted_at,
        }
    }

    /// Returns the source identifier.
    #[must_use]
    pub const fn id(&self) -> ResearchSourceId {
        self.id
    }

    /// Returns the owning contact.
    #[must_use]
    pub const fn contact_id(&self) -> ContactId {
        self.contact_id
    }

    /// Returns the source URL.
    #[must_use]
    pub fn url(&self) -> &str {
        &self.url
    }

    /// Returns the extraction method tag, if recorded.
    #[must_use]
    pub const fn extraction_method(&self) -> Option<&ExtractionMethod> {
        self.extraction_method.as_ref()
    }

    /// Returns the extraction timestamp.
    #[must_use]
    pub const fn extracted_at(&self) -> DateTime<Utc> {
        self.extracted_at
    }
}
