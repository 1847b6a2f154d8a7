//! Candidate contacts proposed by the research agent.

use crate::contact::domain::{ContactDomainError, ContactName, EmailAddress, NewContact};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;

/// Parsed, not yet validated contact proposed by the agent.
///
/// Every field is optional so that incomplete entries can be reported by the
/// validator instead of failing the whole reply.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CandidateContact {
    /// Full name.
    pub name: Option<String>,
    /// Publicly listed email address.
    pub email: Option<String>,
    /// Institution or company.
    pub affiliation: Option<String>,
    /// Research area or job role.
    pub field: Option<String>,
    /// Personal or institutional website.
    pub website: Option<String>,
    /// Page where the details were found.
    pub source_url: Option<String>,
    /// Agent confidence in the entry.
    pub confidence: Option<f64>,
}

/// Reason a candidate was dropped from a research batch.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ValidationRejected {
    /// The entry is not a JSON object.
    #[error("candidate is not a JSON object")]
    NotAnObject,

    /// The entry is an object whose fields have unexpected types.
    #[error("candidate has malformed fields: {0}")]
    MalformedFields(String),

    /// `name` is missing or empty.
    #[error("candidate is missing required field: name")]
    MissingName,

    /// `email` is missing or empty.
    #[error("candidate is missing required field: email")]
    MissingEmail,

    /// `email` lacks an `@` or a `.`.
    #[error("invalid email format: {0}")]
    MalformedEmail(String),
}

impl CandidateContact {
    /// Creates a candidate with a name and email.
    #[must_use]
    pub fn new(name: impl Into<String>, email: impl Into<String>) -> Self {
        Self {
            name: Some(name.into()),
            email: Some(email.into()),
            ..Self::default()
        }
    }

    /// Sets the source URL.
    #[must_use]
    pub fn with_source_url(mut self, source_url: impl Into<String>) -> Self {
        self.source_url = Some(source_url.into());
        self
    }

    /// Decodes a candidate from one element of the agent reply.
    ///
    /// # Errors
    ///
    /// Returns [`ValidationRejected::NotAnObject`] for non-object values and
    /// [`ValidationRejected::MalformedFields`] when a known field has the
    /// wrong type.
    pub fn from_value(value: Value) -> Result<Self, ValidationRejected> {
        if !value.is_object() {
            return Err(ValidationRejected::NotAnObject);
        }
        serde_json::from_value(value)
            .map_err(|err| ValidationRejected::MalformedFields(err.to_string()))
    }

    /// Checks the minimum fields required to store the candidate.
    ///
    /// The check is syntactic only: `name` and `email` must be present and
    /// non-empty and `email` must contain an `@` and a `.`.
    ///
    /// # Errors
    ///
    /// Returns the first [`ValidationRejected`] reason that applies.
    pub fn validate(self) -> Result<ValidatedCandidate, ValidationRejected> {
        let name = self
            .name
            .and_then(|value| ContactName::new(value).ok())
            .ok_or(ValidationRejected::MissingName)?;
        let raw_email = self
            .email
            .filter(|value| !value.is_empty())
            .ok_or(ValidationRejected::MissingEmail)?;
        let email = EmailAddress::new(raw_email).map_err(|err| match err {
            ContactDomainError::InvalidEmail(value) => ValidationRejected::MalformedEmail(value),
            _ => ValidationRejected::MissingEmail,
        })?;

        let mut contact = NewContact::new(name, email);
        if let Some(affiliation) = self.affiliation {
            contact = contact.with_affiliation(affiliation);
        }
        if let Some(field) = self.field {
            contact = contact.with_field(field);
        }
        if let Some(website) = self.website {
            contact = contact.with_website(website);
        }
        if let Some(source_url) = self.source_url.clone() {
            contact = contact.with_source_url(source_url);
        }
        if let Some(confidence) = self.confidence {
            contact = contact.with_confidence(confidence);
        }

        Ok(ValidatedCandidate {
            contact,
            source_url: self.source_url.filter(|url| !url.is_empty()),
        })
    }

    /// Returns whether the candidate passes validation.
    #[must_use]
    pub fn is_valid(&self) -> bool {
        self.clone().validate().is_ok()
    }
}

/// Candidate that passed validation and can be ingested.
#[derive(Debug, Clone, PartialEq)]
pub struct ValidatedCandidate {
    contact: NewContact,
    source_url: Option<String>,
}

impl ValidatedCandidate {
    /// Returns the candidate email address.
    #[must_use]
    pub const fn email(&self) -> &EmailAddress {
        self.contact.email()
    }

    /// Returns the source URL when one was reported and is non-empty.
    #[must_use]
    pub fn source_url(&self) -> Option<&str> {
        self.source_url.as_deref()
    }

    /// Returns the contact creation request.
    #[must_use]
    pub const fn contact(&self) -> &NewContact {
        &self.contact
    }
}
