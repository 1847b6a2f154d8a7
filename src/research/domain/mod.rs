//! Domain model for research runs.

mod candidate;
mod enrichment;
mod error;
mod result;
mod task;

pub use candidate::{CandidateContact, ValidatedCandidate, ValidationRejected};
pub use enrichment::ContactEnrichment;
pub use error::{ParseResearchTaskStateError, ResearchDomainError};
pub use result::{ResearchAccepted, ResearchFailure, ResearchResult, ResearchSummary};
pub use task::{
    PersistedResearchTaskData, ResearchQuery, ResearchTask, ResearchTaskId, ResearchTaskState,
};
