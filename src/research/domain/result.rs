//! Structured outcomes reported to research callers.

use super::ResearchTaskId;
use serde::{Serialize, Serializer};

/// Counts reported by a successful research run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ResearchSummary {
    /// Task that tracked the run.
    pub task_id: ResearchTaskId,
    /// Research query.
    pub query: String,
    /// Candidates returned by the agent.
    pub total_found: usize,
    /// Candidates that passed validation.
    pub valid_contacts: usize,
    /// Contacts newly created.
    pub new_contacts: usize,
    /// Valid candidates that did not produce a new contact.
    pub duplicates: usize,
}

/// Details of a failed research run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ResearchFailure {
    /// Task that tracked the run, absent when none could be created.
    pub task_id: Option<ResearchTaskId>,
    /// Research query.
    pub query: String,
    /// Error text.
    pub error: String,
}

/// Outcome of one research invocation.
///
/// Serialises as the summary or failure fields plus a `success` flag.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ResearchResult {
    /// The run completed.
    Completed(ResearchSummary),
    /// The run failed.
    Failed(ResearchFailure),
}

impl ResearchResult {
    /// Creates a failure outcome.
    #[must_use]
    pub fn failed(
        task_id: Option<ResearchTaskId>,
        query: impl Into<String>,
        error: impl Into<String>,
    ) -> Self {
        Self::Failed(ResearchFailure {
            task_id,
            query: query.into(),
            error: error.into(),
        })
    }

    /// Returns whether the run completed.
    #[must_use]
    pub const fn is_success(&self) -> bool {
        matches!(self, Self::Completed(_))
    }

    /// Returns the tracking task, if one was created.
    #[must_use]
    pub const fn task_id(&self) -> Option<ResearchTaskId> {
        match self {
            Self::Completed(summary) => Some(summary.task_id),
            Self::Failed(failure) => failure.task_id,
        }
    }

    /// Returns the research query.
    #[must_use]
    pub fn query(&self) -> &str {
        match self {
            Self::Completed(summary) => &summary.query,
            Self::Failed(failure) => &failure.query,
        }
    }
}

impl Serialize for ResearchResult {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        #[derive(Serialize)]
        struct Flagged<'a, T> {
            success: bool,
            #[serde(flatten)]
            body: &'a T,
        }

        match self {
            Self::Completed(summary) => Flagged {
                success: true,
                body: summary,
            }
            .serialize(serializer),
            Self::Failed(failure) => Flagged {
                success: false,
                body: failure,
            }
            .serialize(serializer),
        }
    }
}

/// Acknowledgement returned when a run is queued for background execution.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ResearchAccepted {
    /// Always `started`.
    pub status: &'static str,
    /// Research query.
    pub query: String,
    /// Hint for finding the outcome.
    pub message: &'static str,
}

impl ResearchAccepted {
    /// Creates an acknowledgement for a queued query.
    #[must_use]
    pub fn started(query: impl Into<String>) -> Self {
        Self {
            status: "started",
            query: query.into(),
            message: "Research task started. Poll the research task list for progress.",
        }
    }
}
