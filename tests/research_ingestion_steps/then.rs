//! Then steps for research ingestion BDD scenarios.

use super::world::{IngestionWorld, run_async};
use eyre::WrapErr;
use personable_crm::contact::domain::EmailAddress;
use personable_crm::research::domain::{ResearchResult, ResearchTaskState};
use personable_crm::store::Page;
use rstest_bdd_macros::then;

#[then("the research succeeds with {created:usize} new contacts and {duplicates:usize} duplicates")]
fn research_succeeds(
    world: &IngestionWorld,
    created: usize,
    duplicates: usize,
) -> Result<(), eyre::Report> {
    let ResearchResult::Completed(summary) = world.result()? else {
        return Err(eyre::eyre!("expected success, got {:?}", world.result()?));
    };
    if summary.new_contacts != created || summary.duplicates != duplicates {
        return Err(eyre::eyre!(
            "expected {created} new and {duplicates} duplicates, got {summary:?}"
        ));
    }
    Ok(())
}

#[then("the research fails")]
fn research_fails(world: &IngestionWorld) -> Result<(), eyre::Report> {
    let ResearchResult::Failed(failure) = world.result()? else {
        return Err(eyre::eyre!("expected failure, got {:?}", world.result()?));
    };
    if failure.error.is_empty() {
        return Err(eyre::eyre!("failure carries no error message"));
    }
    Ok(())
}

#[then(r#"the research task is "{state}""#)]
fn research_task_is(world: &IngestionWorld, state: String) -> Result<(), eyre::Report> {
    let expected = ResearchTaskState::try_from(state.as_str())
        .map_err(|err| eyre::eyre!("invalid expected state in scenario: {err}"))?;
    let task_id = world
        .result()?
        .task_id()
        .ok_or_else(|| eyre::eyre!("research run recorded no task"))?;
    let task = run_async(world.research.find_task(task_id))
        .wrap_err("load research task")?
        .ok_or_else(|| eyre::eyre!("research task {task_id} missing"))?;

    if task.state() != expected {
        return Err(eyre::eyre!(
            "expected state {}, found {}",
            expected.as_str(),
            task.state().as_str()
        ));
    }
    Ok(())
}

#[then(r#"contact "{email}" has source "{source_url}""#)]
fn contact_has_source(
    world: &IngestionWorld,
    email: String,
    source_url: String,
) -> Result<(), eyre::Report> {
    let address = EmailAddress::new(email).wrap_err("parse expected email")?;
    let contact = run_async(world.directory.find_by_email(&address))
        .wrap_err("look up contact")?
        .ok_or_else(|| eyre::eyre!("contact {address} not stored"))?;
    let sources = run_async(world.directory.list_research_sources(contact.id()))
        .wrap_err("list research sources")?;

    if !sources.iter().any(|source| source.url() == source_url) {
        return Err(eyre::eyre!("source {source_url} not linked to {address}"));
    }
    Ok(())
}

#[then("the directory holds {count:usize} contacts")]
fn directory_holds(world: &IngestionWorld, count: usize) -> Result<(), eyre::Report> {
    let page = Page::new(0, 100).wrap_err("build page")?;
    let contacts = run_async(world.directory.list_contacts(page)).wrap_err("list contacts")?;
    if contacts.len() != count {
        return Err(eyre::eyre!("expected {count} contacts, found {}", contacts.len()));
    }
    Ok(())
}
