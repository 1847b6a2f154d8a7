//! Port contracts for research runs.
//!
//! Ports define infrastructure-agnostic interfaces used by research
//! services.

pub mod agent;
pub mod repository;

pub use agent::{AgentError, AgentOutput, AgentResult, ResearchAgent};
pub use repository::ResearchTaskRepository;
