//! When steps for research ingestion BDD scenarios.

use super::world::{IngestionWorld, run_async};
use rstest_bdd_macros::when;

#[when(r#"research runs for "{query}""#)]
fn research_runs(world: &mut IngestionWorld, query: String) {
    let result = run_async(world.research.run_research(&query));
    world.last_result = Some(result);
}
