//! Research runs persisted to `PostgreSQL`.

use std::sync::Arc;

use super::helpers::{BoxError, test_database};
use crate::test_helpers::SteppingClock;
use personable_crm::research::{
    adapters::ScriptedResearchAgent,
    domain::{ResearchResult, ResearchTaskState},
    services::ResearchService,
};
use personable_crm::store::Page;
use rstest::rstest;

const REPLY: &str = r#"[
  {"name": "Ada", "email": "ada@uni.edu", "source_url": "https://uni.edu/ada"},
  {"name": "Ada again", "email": "ada@uni.edu"},
  {"name": "", "email": "nobody@uni.edu"},
  {"name": "Grace", "email": "grace@navy.mil"}
]"#;

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn research_run_is_recorded_and_deduplicated() -> Result<(), BoxError> {
    let Some(db) = test_database().await? else {
        return Ok(());
    };
    let agent = ScriptedResearchAgent::new().with_reply(REPLY).with_reply(REPLY);
    let service = ResearchService::new(
        Arc::new(db.store.clone()),
        Arc::new(agent),
        Arc::new(SteppingClock::new()),
    );

    let ResearchResult::Completed(first) = service.run_research("analysts").await else {
        return Err("first run failed".into());
    };
    assert_eq!(first.total_found, 4);
    assert_eq!(first.valid_contacts, 3);
    assert_eq!(first.new_contacts, 2);
    assert_eq!(first.duplicates, 1);

    let ResearchResult::Completed(second) = service.run_research("analysts again").await else {
        return Err("second run failed".into());
    };
    assert_eq!(second.new_contacts, 0);
    assert_eq!(second.duplicates, 3);

    let tasks = service.list_tasks(Page::new(0, 10)?).await?;
    let summary: Vec<_> = tasks
        .iter()
        .map(|task| (task.query().as_str(), task.state(), task.results_count()))
        .collect();
    assert_eq!(
        summary,
        vec![
            ("analysts again", ResearchTaskState::Completed, 0),
            ("analysts", ResearchTaskState::Completed, 2),
        ]
    );
    assert!(tasks.iter().all(|task| task.completed_at().is_some()));
    Ok(())
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn failed_run_persists_the_error() -> Result<(), BoxError> {
    let Some(db) = test_database().await? else {
        return Ok(());
    };
    let agent = ScriptedResearchAgent::new().with_reply("\"just a string\"");
    let service = ResearchService::new(
        Arc::new(db.store.clone()),
        Arc::new(agent),
        Arc::new(SteppingClock::new()),
    );

    let result = service.run_research("strings").await;

    let task_id = result.task_id().ok_or("failed run has a task")?;
    assert!(!result.is_success());
    let task = service.find_task(task_id).await?.ok_or("task stored")?;
    assert_eq!(task.state(), ResearchTaskState::Failed);
    assert!(task.error_message().is_some_and(|message| !message.is_empty()));
    Ok(())
}
