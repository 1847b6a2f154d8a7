//! Research agent that replays canned replies.

use crate::research::ports::{AgentError, AgentOutput, AgentResult, ResearchAgent};
use async_trait::async_trait;
use std::collections::VecDeque;
use std::sync::{Mutex, MutexGuard, PoisonError};

/// Replays queued replies in order and records the instructions it was
/// given.
///
/// Used by tests and local dry runs. Once the queue is empty every call
/// fails with [`AgentError::Exhausted`].
#[derive(Debug, Default)]
pub struct ScriptedResearchAgent {
    replies: Mutex<VecDeque<AgentResult<AgentOutput>>>,
    received: Mutex<Vec<String>>,
}

impl ScriptedResearchAgent {
    /// Creates an agent with no replies queued.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Queues a successful reply.
    #[must_use]
    pub fn with_reply(self, reply: impl Into<AgentOutput>) -> Self {
        self.push(Ok(reply.into()));
        self
    }

    /// Queues a failing reply.
    #[must_use]
    pub fn with_error(self, err: AgentError) -> Self {
        self.push(Err(err));
        self
    }

    /// Queues a reply on a shared agent.
    pub fn push(&self, reply: AgentResult<AgentOutput>) {
        lock(&self.replies).push_back(reply);
    }

    /// Returns the instructions received so far, oldest first.
    #[must_use]
    pub fn received(&self) -> Vec<String> {
        lock(&self.received).clone()
    }
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

#[async_trait]
impl ResearchAgent for ScriptedResearchAgent {
    async fn execute(&self, instructions: &str) -> AgentResult<AgentOutput> {
        lock(&self.received).push(instructions.to_owned());
        lock(&self.replies)
            .pop_front()
            .unwrap_or(Err(AgentError::Exhausted))
    }
}
