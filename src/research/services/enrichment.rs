//! On-demand enrichment of stored contacts.

use super::{InstructionError, MalformedResponse, enrichment_instructions, parse_agent_output};
use crate::contact::{domain::ContactId, ports::ContactRepository};
use crate::research::{
    domain::ContactEnrichment,
    ports::{AgentError, ResearchAgent},
};
use crate::store::{CrmStore, StoreError};
use std::sync::Arc;
use thiserror::Error;
use tracing::info;

/// Errors raised while enriching a contact.
#[derive(Debug, Error)]
pub enum EnrichmentError {
    /// Store operation failed.
    #[error(transparent)]
    Store(#[from] StoreError),
    /// Agent invocation failed.
    #[error(transparent)]
    Agent(#[from] AgentError),
    /// Agent reply was not JSON.
    #[error(transparent)]
    Malformed(#[from] MalformedResponse),
    /// Agent reply was JSON but not an enrichment object.
    #[error("agent returned an unexpected enrichment shape: {0}")]
    Shape(#[source] serde_json::Error),
    /// Instructions could not be rendered.
    #[error(transparent)]
    Instructions(#[from] InstructionError),
}

/// Asks the agent for fresh context about existing contacts.
///
/// Results are returned to the caller and never stored.
#[derive(Clone)]
pub struct ContactEnrichmentService<S, A>
where
    S: CrmStore,
    A: ResearchAgent,
{
    store: Arc<S>,
    agent: Arc<A>,
}

impl<S, A> ContactEnrichmentService<S, A>
where
    S: CrmStore,
    A: ResearchAgent,
{
    /// Creates an enrichment service.
    #[must_use]
    pub const fn new(store: Arc<S>, agent: Arc<A>) -> Self {
        Self { store, agent }
    }

    /// Enriches one contact.
    ///
    /// Returns `Ok(None)` when the contact does not exist.
    ///
    /// # Errors
    ///
    /// Returns [`EnrichmentError`] when the store, the agent or the reply
    /// fails.
    pub async fn enrich(
        &self,
        contact_id: ContactId,
    ) -> Result<Option<ContactEnrichment>, EnrichmentError> {
        let session = self.store.open_session().await?;
        let Some(contact) = session.find_by_id(contact_id).await? else {
            return Ok(None);
        };
        drop(session);

        let instructions = enrichment_instructions(&contact)?;
        let output = self.agent.execute(&instructions).await?;
        let value = parse_agent_output(output)?;
        let enrichment: ContactEnrichment =
            serde_json::from_value(value).map_err(EnrichmentError::Shape)?;
        info!(
            contact_id = %contact_id,
            interests = enrichment.interests.len(),
            "enriched contact"
        );
        Ok(Some(enrichment))
    }
}
