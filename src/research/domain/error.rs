//! Error types for the research domain.

use super::{ResearchTaskId, ResearchTaskState};
use thiserror::Error;

/// Errors returned by research domain operations.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ResearchDomainError {
    /// The research query is blank.
    #[error("research query must not be empty")]
    EmptyQuery,

    /// The requested lifecycle transition is not permitted.
    #[error("research task {task_id} cannot move from {} to {}", from.as_str(), to.as_str())]
    InvalidStateTransition {
        /// Task being transitioned.
        task_id: ResearchTaskId,
        /// Current state.
        from: ResearchTaskState,
        /// Requested state.
        to: ResearchTaskState,
    },
}

/// Error returned while parsing research task states from persistence.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("unknown research task state: {0}")]
pub struct ParseResearchTaskStateError(pub String);
