//! Shared fixtures for in-memory integration tests.

use std::sync::Arc;

use crate::test_helpers::SteppingClock;
use personable_crm::contact::services::ContactDirectoryService;
use personable_crm::research::{adapters::ScriptedResearchAgent, services::ResearchService};
use personable_crm::store::memory::InMemoryCrmStore;
use rstest::fixture;

/// Research service wired to in-memory collaborators.
pub type MemoryResearchService =
    ResearchService<InMemoryCrmStore, ScriptedResearchAgent, SteppingClock>;

/// Directory service sharing the research store.
pub type MemoryDirectoryService = ContactDirectoryService<InMemoryCrmStore, SteppingClock>;

/// Services sharing one store and one scripted agent.
pub struct Crm {
    pub store: InMemoryCrmStore,
    pub agent: Arc<ScriptedResearchAgent>,
    pub research: Arc<MemoryResearchService>,
    pub directory: MemoryDirectoryService,
}

impl Crm {
    /// Queues a text reply for the next agent call.
    pub fn reply(&self, text: &str) {
        self.agent.push(Ok(text.into()));
    }
}

/// Provides fresh services over an empty store.
#[fixture]
pub fn crm() -> Crm {
    let store = InMemoryCrmStore::new();
    let agent = Arc::new(ScriptedResearchAgent::new());
    let clock = Arc::new(SteppingClock::new());
    let research = Arc::new(ResearchService::new(
        Arc::new(store.clone()),
        Arc::clone(&agent),
        Arc::clone(&clock),
    ));
    let directory = ContactDirectoryService::new(Arc::new(store.clone()), clock);
    Crm {
        store,
        agent,
        research,
        directory,
    }
}
