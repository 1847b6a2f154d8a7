//! Research orchestration: one agent run from query to stored contacts.

use super::{
    InstructionError, MalformedResponse, candidate_values, parse_agent_output,
    people_research_instructions, screen_candidates,
};
use crate::contact::{
    domain::{ContactDomainError, ExtractionMethod, NewContact, ResearchSource},
    ports::{ContactRepository, ResearchSourceRepository},
    services::ingest_contacts,
};
use crate::research::{
    domain::{
        ResearchDomainError, ResearchQuery, ResearchResult, ResearchSummary, ResearchTask,
        ResearchTaskId, ValidatedCandidate,
    },
    ports::{AgentError, ResearchAgent, ResearchTaskRepository},
};
use crate::store::{CrmStore, Page, StoreError, StoreResult};
use async_trait::async_trait;
use mockable::Clock;
use std::sync::Arc;
use thiserror::Error;
use tracing::{debug, error, info, warn};

/// Page size used when listing research tasks without an explicit limit.
pub const DEFAULT_TASK_PAGE_SIZE: usize = 50;

/// Errors that end a research run.
///
/// Every variant is displayed as its cause so the stored task error reads
/// the same as the underlying failure.
#[derive(Debug, Error)]
pub enum ResearchError {
    /// Task domain rule violated.
    #[error(transparent)]
    Domain(#[from] ResearchDomainError),
    /// Contact domain rule violated while linking sources.
    #[error(transparent)]
    Contact(#[from] ContactDomainError),
    /// Store operation failed.
    #[error(transparent)]
    Store(#[from] StoreError),
    /// Agent invocation failed.
    #[error(transparent)]
    Agent(#[from] AgentError),
    /// Agent reply was not usable JSON.
    #[error(transparent)]
    Malformed(#[from] MalformedResponse),
    /// Instructions could not be rendered.
    #[error(transparent)]
    Instructions(#[from] InstructionError),
}

/// Executes research runs on behalf of a dispatcher.
#[async_trait]
pub trait ResearchRunner: Send + Sync + 'static {
    /// Runs research for the query and reports the outcome.
    async fn run_research(&self, query: &str) -> ResearchResult;
}

/// Orchestrates research runs against a store and an agent.
#[derive(Clone)]
pub struct ResearchService<S, A, C>
where
    S: CrmStore,
    A: ResearchAgent,
    C: Clock + Send + Sync,
{
    store: Arc<S>,
    agent: Arc<A>,
    clock: Arc<C>,
}

impl<S, A, C> ResearchService<S, A, C>
where
    S: CrmStore,
    A: ResearchAgent,
    C: Clock + Send + Sync,
{
    /// Creates a research service.
    #[must_use]
    pub const fn new(store: Arc<S>, agent: Arc<A>, clock: Arc<C>) -> Self {
        Self {
            store,
            agent,
            clock,
        }
    }

    /// Runs one research invocation to completion.
    ///
    /// Never fails: every error is reported through
    /// [`ResearchResult::Failed`], carrying the task id whenever the task row
    /// was created.
    pub async fn run_research(&self, query: &str) -> ResearchResult {
        let session = match self.store.open_session().await {
            Ok(session) => session,
            Err(err) => {
                error!(query, error = %err, "could not open store session for research");
                return ResearchResult::failed(None, query, err.to_string());
            }
        };

        let research_query = match ResearchQuery::new(query) {
            Ok(research_query) => research_query,
            Err(err) => {
                warn!(query, error = %err, "rejected research query");
                return ResearchResult::failed(None, query, err.to_string());
            }
        };

        let mut task = ResearchTask::new(research_query, &*self.clock);
        if let Err(err) = session.insert_task(&task).await {
            error!(query, error = %err, "could not create research task");
            return ResearchResult::failed(None, query, err.to_string());
        }
        info!(task_id = %task.id(), query, "research task created");

        match self.execute(&session, &mut task).await {
            Ok(summary) => {
                info!(
                    task_id = %summary.task_id,
                    total_found = summary.total_found,
                    new_contacts = summary.new_contacts,
                    duplicates = summary.duplicates,
                    "research task completed"
                );
                ResearchResult::Completed(summary)
            }
            Err(err) => {
                let message = err.to_string();
                error!(task_id = %task.id(), query, error = %message, "research task failed");
                self.record_failure(&session, &mut task, &message).await;
                ResearchResult::failed(Some(task.id()), query, message)
            }
        }
    }

    /// Lists research tasks, newest first.
    ///
    /// # Errors
    ///
    /// Returns the store error when the session or query fails.
    pub async fn list_tasks(&self, page: Page) -> StoreResult<Vec<ResearchTask>> {
        let session = self.store.open_session().await?;
        session.list_tasks(page).await
    }

    /// Loads one research task.
    ///
    /// # Errors
    ///
    /// Returns the store error when the session or query fails.
    pub async fn find_task(&self, id: ResearchTaskId) -> StoreResult<Option<ResearchTask>> {
        let session = self.store.open_session().await?;
        session.find_task(id).await
    }

    async fn execute(
        &self,
        session: &S::Session,
        task: &mut ResearchTask,
    ) -> Result<ResearchSummary, ResearchError> {
        task.start()?;
        session.update_task(task).await?;

        let instructions = people_research_instructions(task.query())?;
        debug!(task_id = %task.id(), "invoking research agent");
        let output = self.agent.execute(&instructions).await?;
        let candidates = candidate_values(parse_agent_output(output)?)?;

        let screened = screen_candidates(candidates);
        let requests: Vec<NewContact> = screened
            .accepted
            .iter()
            .map(|candidate| candidate.contact().clone())
            .collect();
        let outcome = ingest_contacts(session, requests, &*self.clock).await?;
        let linked = self.link_sources(session, &screened.accepted).await?;
        debug!(task_id = %task.id(), linked, "linked research sources");

        let created = outcome.created.len();
        let valid = screened.accepted.len();
        let mut completed = task.clone();
        completed.complete(u32::try_from(created).unwrap_or(u32::MAX), &*self.clock)?;
        session.update_task(&completed).await?;
        *task = completed;

        Ok(ResearchSummary {
            task_id: task.id(),
            query: task.query().as_str().to_owned(),
            total_found: screened.total,
            valid_contacts: valid,
            new_contacts: created,
            duplicates: valid.saturating_sub(created),
        })
    }

    async fn link_sources<R>(
        &self,
        session: &R,
        accepted: &[ValidatedCandidate],
    ) -> Result<usize, ResearchError>
    where
        R: ContactRepository + ResearchSourceRepository + ?Sized,
    {
        let mut linked = 0;
        for candidate in accepted {
            let Some(url) = candidate.source_url() else {
                continue;
            };
            let Some(contact) = session.find_by_email(candidate.email()).await? else {
                debug!(email = %candidate.email(), "no stored contact for research source");
                continue;
            };
            let source =
                ResearchSource::record(contact.id(), url, ExtractionMethod::lux_agent(), &*self.clock)?;
            session.insert_source(&source).await?;
            linked += 1;
        }
        Ok(linked)
    }

    async fn record_failure(&self, session: &S::Session, task: &mut ResearchTask, message: &str) {
        if let Err(err) = task.fail(message, &*self.clock) {
            error!(task_id = %task.id(), error = %err, "could not mark research task failed");
            return;
        }
        if let Err(err) = session.update_task(task).await {
            error!(task_id = %task.id(), error = %err, "could not record research task failure");
        }
    }
}

#[async_trait]
impl<S, A, C> ResearchRunner for ResearchService<S, A, C>
where
    S: CrmStore + 'static,
    A: ResearchAgent + 'static,
    C: Clock + Send + Sync + 'static,
{
    async fn run_research(&self, query: &str) -> ResearchResult {
        Self::run_research(self, query).await
    }
}
