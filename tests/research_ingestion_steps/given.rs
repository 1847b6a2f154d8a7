//! Given steps for research ingestion BDD scenarios.

use super::world::{IngestionWorld, run_async};
use eyre::WrapErr;
use personable_crm::contact::domain::NewContact;
use rstest_bdd_macros::given;
use serde_json::json;

#[given(r#"the agent finds "{name}" at "{email}" via "{source_url}""#)]
fn agent_finds_person(world: &mut IngestionWorld, name: String, email: String, source_url: String) {
    let reply = json!([{ "name": name, "email": email, "source_url": source_url }]);
    world.agent.push(Ok(reply.to_string().into()));
}

#[given("the agent finds nobody")]
fn agent_finds_nobody(world: &mut IngestionWorld) {
    world.agent.push(Ok("[]".into()));
}

#[given(r#"the agent replies "{reply}""#)]
fn agent_replies(world: &mut IngestionWorld, reply: String) {
    world.agent.push(Ok(reply.into()));
}

#[given(r#"a contact "{name}" at "{email}" exists"#)]
fn contact_exists(
    world: &mut IngestionWorld,
    name: String,
    email: String,
) -> Result<(), eyre::Report> {
    let request = NewContact::try_new(name, email).wrap_err("build existing contact")?;
    run_async(world.directory.create_contact(request)).wrap_err("store existing contact")?;
    Ok(())
}
