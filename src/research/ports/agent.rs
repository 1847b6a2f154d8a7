//! Port for the external research agent.

use async_trait::async_trait;
use serde_json::Value;
use std::sync::Arc;
use thiserror::Error;

/// Result type for agent calls.
pub type AgentResult<T> = Result<T, AgentError>;

/// Raw reply produced by the agent.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AgentOutput {
    /// Unstructured text, expected to contain JSON.
    Text(String),
    /// Already structured output; passed through without parsing.
    Structured(Value),
}

impl From<String> for AgentOutput {
    fn from(text: String) -> Self {
        Self::Text(text)
    }
}

impl From<&str> for AgentOutput {
    fn from(text: &str) -> Self {
        Self::Text(text.to_owned())
    }
}

impl From<Value> for AgentOutput {
    fn from(value: Value) -> Self {
        Self::Structured(value)
    }
}

/// Research agent contract.
///
/// The agent receives free-form instructions and replies with output that
/// should encode JSON. No timeout is imposed by callers; adapters that need
/// bounded latency must enforce it themselves.
#[async_trait]
pub trait ResearchAgent: Send + Sync {
    /// Executes the instructions and returns the agent reply.
    ///
    /// # Errors
    ///
    /// Returns [`AgentError`] when the agent cannot be reached or fails.
    async fn execute(&self, instructions: &str) -> AgentResult<AgentOutput>;
}

/// Errors returned by agent adapters.
#[derive(Debug, Clone, Error)]
pub enum AgentError {
    /// The agent could not be started or reached.
    #[error("research agent unavailable: {0}")]
    Unavailable(Arc<dyn std::error::Error + Send + Sync>),

    /// The agent ran but reported a failure.
    #[error("research agent failed: {0}")]
    Failed(String),

    /// No scripted reply is left.
    #[error("research agent has no scripted reply left")]
    Exhausted,
}

impl AgentError {
    /// Wraps a connectivity or process launch error.
    pub fn unavailable(err: impl std::error::Error + Send + Sync + 'static) -> Self {
        Self::Unavailable(Arc::new(err))
    }
}
