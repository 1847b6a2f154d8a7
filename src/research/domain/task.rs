//! Research task aggregate and its lifecycle state machine.

use super::{ParseResearchTaskStateError, ResearchDomainError};
use crate::contact::domain::uuid_identifier;
use chrono::{DateTime, Utc};
use mockable::Clock;
use serde::{Deserialize, Serialize};
use std::fmt;

uuid_identifier!(
    /// Unique identifier for a research task.
    ResearchTaskId
);

/// Message stored when a failure carries no text of its own.
const UNKNOWN_FAILURE: &str = "research failed without an error message";

/// Research task lifecycle state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ResearchTaskState {
    /// Task recorded, research not yet started.
    Pending,
    /// Agent research in progress.
    Running,
    /// Research finished and contacts were ingested.
    Completed,
    /// Research failed; see the error message.
    Failed,
}

impl ResearchTaskState {
    /// Returns the canonical storage representation.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Running => "running",
            Self::Completed => "completed",
            Self::Failed => "failed",
        }
    }

    /// Returns whether no further transitions are permitted.
    #[must_use]
    pub const fn is_terminal(self) -> bool {
        matches!(self, Self::Completed | Self::Failed)
    }

    /// Returns whether the state machine permits moving to `target`.
    #[must_use]
    pub const fn can_transition_to(self, target: Self) -> bool {
        matches!(
            (self, target),
            (Self::Pending, Self::Running | Self::Failed)
                | (Self::Running, Self::Completed | Self::Failed)
        )
    }
}

impl TryFrom<&str> for ResearchTaskState {
    type Error = ParseResearchTaskStateError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        match value.trim().to_ascii_lowercase().as_str() {
            "pending" => Ok(Self::Pending),
            "running" => Ok(Self::Running),
            "completed" => Ok(Self::Completed),
            "failed" => Ok(Self::Failed),
            _ => Err(ParseResearchTaskStateError(value.to_owned())),
        }
    }
}

/// Non-blank research query.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ResearchQuery(String);

impl ResearchQuery {
    /// Creates a validated query.
    ///
    /// # Errors
    ///
    /// Returns [`ResearchDomainError::EmptyQuery`] when the value is blank.
    pub fn new(value: impl Into<String>) -> Result<Self, ResearchDomainError> {
        let query = value.into();
        if query.trim().is_empty() {
            return Err(ResearchDomainError::EmptyQuery);
        }
        Ok(Self(query))
    }

    /// Returns the query as `str`.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ResearchQuery {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Research task aggregate root.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResearchTask {
    id: ResearchTaskId,
    query: ResearchQuery,
    state: ResearchTaskState,
    results_count: u32,
    error_message: Option<String>,
    created_at: DateTime<Utc>,
    completed_at: Option<DateTime<Utc>>,
}

/// Parameter object for reconstructing a persisted research task.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PersistedResearchTaskData {
    /// Persisted identifier.
    pub id: ResearchTaskId,
    /// Persisted query.
    pub query: ResearchQuery,
    /// Persisted lifecycle state.
    pub state: ResearchTaskState,
    /// Persisted count of newly created contacts.
    pub results_count: u32,
    /// Persisted failure message.
    pub error_message: Option<String>,
    /// Persisted creation timestamp.
    pub created_at: DateTime<Utc>,
    /// Persisted completion timestamp.
    pub completed_at: Option<DateTime<Utc>>,
}

impl ResearchTask {
    /// Creates a pending task for a query.
    #[must_use]
    pub fn new(query: ResearchQuery, clock: &impl Clock) -> Self {
        Self {
            id: ResearchTaskId::new(),
            query,
            state: ResearchTaskState::Pending,
            results_count: 0,
            error_message: None,
            created_at: clock.utc(),
            completed_at: None,
        }
    }

    /// Reconstructs a task from persisted storage.
    #[must_use]
    pub fn from_persisted(data: PersistedResearchTaskData) -> Self {
        Self {
            id: data.id,
            query: data.query,
            state: data.state,
            results_count: data.results_count,
            error_message: data.error_message,
            created_at: data.created_at,
            completed_at: data.completed_at,
        }
    }

    /// Returns the task identifier.
    #[must_use]
    pub const fn id(&self) -> ResearchTaskId {
        self.id
    }

    /// Returns the research query.
    #[must_use]
    pub const fn query(&self) -> &ResearchQuery {
        &self.query
    }

    /// Returns the lifecycle state.
    #[must_use]
    pub const fn state(&self) -> ResearchTaskState {
        self.state
    }

    /// Returns the number of contacts created by the run.
    #[must_use]
    pub const fn results_count(&self) -> u32 {
        self.results_count
    }

    /// Returns the failure message, if the task failed.
    #[must_use]
    pub fn error_message(&self) -> Option<&str> {
        self.error_message.as_deref()
    }

    /// Returns the creation timestamp.
    #[must_use]
    pub const fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    /// Returns the completion timestamp, set on entering a terminal state.
    #[must_use]
    pub const fn completed_at(&self) -> Option<DateTime<Utc>> {
        self.completed_at
    }

    /// Marks the task as running.
    ///
    /// # Errors
    ///
    /// Returns [`ResearchDomainError::InvalidStateTransition`] unless the
    /// task is pending.
    pub fn start(&mut self) -> Result<(), ResearchDomainError> {
        self.transition_to(ResearchTaskState::Running)
    }

    /// Marks the task as completed with the number of new contacts.
    ///
    /// # Errors
    ///
    /// Returns [`ResearchDomainError::InvalidStateTransition`] unless the
    /// task is running.
    pub fn complete(
        &mut self,
        results_count: u32,
        clock: &impl Clock,
    ) -> Result<(), ResearchDomainError> {
        self.transition_to(ResearchTaskState::Completed)?;
        self.results_count = results_count;
        self.completed_at = Some(clock.utc());
        Ok(())
    }

    /// Marks the task as failed with an error message.
    ///
    /// An empty message is replaced so failed tasks always explain
    /// themselves.
    ///
    /// # Errors
    ///
    /// Returns [`ResearchDomainError::InvalidStateTransition`] when the task
    /// is already terminal.
    pub fn fail(
        &mut self,
        message: impl Into<String>,
        clock: &impl Clock,
    ) -> Result<(), ResearchDomainError> {
        self.transition_to(ResearchTaskState::Failed)?;
        let text = message.into();
        self.error_message = Some(if text.trim().is_empty() {
            UNKNOWN_FAILURE.to_owned()
        } else {
            text
        });
        self.completed_at = Some(clock.utc());
        Ok(())
    }

    fn transition_to(&mut self, target: ResearchTaskState) -> Result<(), ResearchDomainError> {
        if !self.state.can_transition_to(target) {
            return Err(ResearchDomainError::InvalidStateTransition {
                task_id: self.id,
                from: self.state,
                to: target,
            });
        }
        self.state = target;
        Ok(())
    }
}
