//! Behaviour tests for research ingestion.

mod test_helpers;

#[path = "research_ingestion_steps/mod.rs"]
mod research_ingestion_steps_defs;

use research_ingestion_steps_defs::world::{IngestionWorld, world};
use rstest_bdd_macros::scenario;

#[scenario(
    path = "tests/features/research_ingestion.feature",
    name = "Ingest a researched contact with its source"
)]
#[tokio::test(flavor = "multi_thread")]
async fn ingest_contact_with_source(world: IngestionWorld) {
    let _ = world;
}

#[scenario(
    path = "tests/features/research_ingestion.feature",
    name = "Reject a reply without JSON"
)]
#[tokio::test(flavor = "multi_thread")]
async fn reject_reply_without_json(world: IngestionWorld) {
    let _ = world;
}

#[scenario(
    path = "tests/features/research_ingestion.feature",
    name = "Complete with no candidates"
)]
#[tokio::test(flavor = "multi_thread")]
async fn complete_with_no_candidates(world: IngestionWorld) {
    let _ = world;
}

#[scenario(
    path = "tests/features/research_ingestion.feature",
    name = "Skip a contact that already exists"
)]
#[tokio::test(flavor = "multi_thread")]
async fn skip_existing_contact(world: IngestionWorld) {
    let _ = world;
}
