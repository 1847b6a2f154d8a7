//! Background research submission.

use std::sync::Arc;

use super::helpers::{Crm, crm};
use personable_crm::research::{
    domain::ResearchTaskState,
    services::{DispatcherSettings, ResearchDispatcher},
};
use personable_crm::store::Page;
use rstest::rstest;

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn submitted_runs_are_tracked_as_tasks(crm: Crm) {
    crm.reply(r#"[{"name": "Ada", "email": "ada@uni.edu"}]"#);
    crm.reply(r#"[{"name": "Ada", "email": "ada@uni.edu"}]"#);
    crm.reply("no json here");
    let dispatcher = ResearchDispatcher::spawn(
        Arc::clone(&crm.research),
        DispatcherSettings {
            workers: 1,
            queue_capacity: 8,
        },
    );

    for query in ["first", "second", "third"] {
        let accepted = dispatcher.submit(query).await.expect("accepted");
        assert_eq!(accepted.status, "started");
    }
    dispatcher.shutdown().await.expect("drained");

    let tasks = crm
        .research
        .list_tasks(Page::new(0, 10).expect("page"))
        .await
        .expect("tasks");
    let states: Vec<(&str, ResearchTaskState)> = tasks
        .iter()
        .map(|task| (task.query().as_str(), task.state()))
        .collect();
    assert_eq!(
        states,
        vec![
            ("third", ResearchTaskState::Failed),
            ("second", ResearchTaskState::Completed),
            ("first", ResearchTaskState::Completed),
        ]
    );
    let counts: Vec<u32> = tasks.iter().map(|task| task.results_count()).collect();
    assert_eq!(counts, vec![0, 0, 1]);
}
