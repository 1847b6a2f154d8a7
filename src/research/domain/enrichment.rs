//! Enrichment details gathered for an existing contact.

use serde::{Deserialize, Serialize};

/// Context gathered by the agent to personalise outreach.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ContactEnrichment {
    /// Recent projects or publications.
    pub recent_work: Option<String>,
    /// Current interests.
    pub interests: Vec<String>,
    /// Free-form context for outreach.
    pub context: Option<String>,
    /// When the information was found, as reported by the agent.
    pub last_updated: Option<String>,
}
