//! Research services: reply parsing, candidate screening, orchestration,
//! background dispatch and enrichment.

mod dispatcher;
mod enrichment;
mod instructions;
mod orchestrator;
mod parser;
mod screening;

pub use dispatcher::{DispatchError, DispatcherSettings, ResearchDispatcher};
pub use enrichment::{ContactEnrichmentService, EnrichmentError};
pub use instructions::{InstructionError, enrichment_instructions, people_research_instructions};
pub use orchestrator::{DEFAULT_TASK_PAGE_SIZE, ResearchError, ResearchRunner, ResearchService};
pub use parser::{MalformedResponse, candidate_values, parse_agent_output, strip_code_fences};
pub use screening::{ScreenedCandidates, screen_candidates};
