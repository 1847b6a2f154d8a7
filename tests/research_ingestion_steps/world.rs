//! Shared world state for research ingestion BDD scenarios.

use std::sync::Arc;

use crate::test_helpers::SteppingClock;
use personable_crm::contact::services::ContactDirectoryService;
use personable_crm::research::{
    adapters::ScriptedResearchAgent, domain::ResearchResult, services::ResearchService,
};
use personable_crm::store::memory::InMemoryCrmStore;
use rstest::fixture;

/// Research service used by the BDD world.
pub type TestResearchService =
    ResearchService<InMemoryCrmStore, ScriptedResearchAgent, SteppingClock>;

/// Directory service used by the BDD world.
pub type TestDirectoryService = ContactDirectoryService<InMemoryCrmStore, SteppingClock>;

/// Scenario world for research ingestion behaviour tests.
pub struct IngestionWorld {
    pub agent: Arc<ScriptedResearchAgent>,
    pub research: TestResearchService,
    pub directory: TestDirectoryService,
    pub last_result: Option<ResearchResult>,
}

impl IngestionWorld {
    /// Creates a world over an empty store.
    #[must_use]
    pub fn new() -> Self {
        let store = Arc::new(InMemoryCrmStore::new());
        let agent = Arc::new(ScriptedResearchAgent::new());
        let clock = Arc::new(SteppingClock::new());
        Self {
            research: ResearchService::new(Arc::clone(&store), Arc::clone(&agent), Arc::clone(&clock)),
            directory: ContactDirectoryService::new(store, clock),
            agent,
            last_result: None,
        }
    }

    /// Returns the outcome of the last research run.
    pub fn result(&self) -> Result<&ResearchResult, eyre::Report> {
        self.last_result
            .as_ref()
            .ok_or_else(|| eyre::eyre!("research has not run in this scenario"))
    }
}

impl Default for IngestionWorld {
    fn default() -> Self {
        Self::new()
    }
}

/// Fixture that creates a new scenario world.
#[fixture]
pub fn world() -> IngestionWorld {
    IngestionWorld::default()
}

/// Runs an async operation within sync step definitions.
pub fn run_async<T>(future: impl std::future::Future<Output = T>) -> T {
    tokio::task::block_in_place(|| tokio::runtime::Handle::current().block_on(future))
}
