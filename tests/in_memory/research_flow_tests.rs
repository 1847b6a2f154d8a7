//! Research runs observed through the contact directory.

use super::helpers::{Crm, crm};
use personable_crm::contact::domain::{EmailAddress, ExtractionMethod, NewContact};
use personable_crm::research::domain::{ResearchResult, ResearchTaskState};
use personable_crm::store::Page;
use rstest::rstest;

const TWO_PEOPLE: &str = r#"Here is what I found:
```json
[
  {"name": "Grace Hopper", "email": "grace@navy.mil", "affiliation": "US Navy",
   "field": "Compilers", "source_url": "https://navy.mil/grace", "confidence": 0.9},
  {"name": "Alan Kay", "email": "alan@parc.com", "field": "Objects"}
]
```"#;

fn email(value: &str) -> EmailAddress {
    EmailAddress::new(value).expect("valid email")
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn research_contacts_appear_in_directory(crm: Crm) {
    crm.reply(TWO_PEOPLE);

    let result = crm.research.run_research("compiler pioneers").await;

    let ResearchResult::Completed(summary) = result else {
        panic!("expected completed run, got {result:?}");
    };
    assert_eq!(summary.total_found, 2);
    assert_eq!(summary.new_contacts, 2);

    let grace = crm
        .directory
        .find_by_email(&email("grace@navy.mil"))
        .await
        .expect("lookup")
        .expect("grace stored");
    assert_eq!(grace.affiliation(), Some("US Navy"));

    let detail = crm
        .directory
        .get_contact_detail(grace.id())
        .await
        .expect("detail")
        .expect("grace exists");
    assert_eq!(detail.research_sources.len(), 1);
    let source = detail.research_sources.first().expect("one source");
    assert_eq!(source.url(), "https://navy.mil/grace");
    assert_eq!(source.extraction_method(), Some(&ExtractionMethod::lux_agent()));

    let alan = crm
        .directory
        .find_by_email(&email("alan@parc.com"))
        .await
        .expect("lookup")
        .expect("alan stored");
    let alan_sources = crm
        .directory
        .list_research_sources(alan.id())
        .await
        .expect("sources");
    assert!(alan_sources.is_empty());
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn manually_added_contact_is_a_duplicate_for_research(crm: Crm) {
    crm.directory
        .create_contact(NewContact::try_new("Grace", "grace@navy.mil").expect("request"))
        .await
        .expect("manual contact");
    crm.reply(TWO_PEOPLE);

    let result = crm.research.run_research("compiler pioneers").await;

    let ResearchResult::Completed(summary) = result else {
        panic!("expected completed run, got {result:?}");
    };
    assert_eq!(summary.new_contacts, 1);
    assert_eq!(summary.duplicates, 1);

    let grace = crm
        .directory
        .find_by_email(&email("grace@navy.mil"))
        .await
        .expect("lookup")
        .expect("grace stored");
    assert_eq!(grace.name().as_str(), "Grace");
    let grace_sources = crm
        .directory
        .list_research_sources(grace.id())
        .await
        .expect("sources");
    let urls: Vec<&str> = grace_sources.iter().map(|source| source.url()).collect();
    assert_eq!(urls, vec!["https://navy.mil/grace"]);
    assert_eq!(
        grace_sources.first().and_then(|source| source.extraction_method()),
        Some(&ExtractionMethod::lux_agent())
    );
    let contacts = crm
        .directory
        .list_contacts(Page::new(0, 10).expect("page"))
        .await
        .expect("list");
    assert_eq!(contacts.len(), 2);
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn deleting_a_researched_contact_removes_its_sources(crm: Crm) {
    crm.reply(TWO_PEOPLE);
    let result = crm.research.run_research("compiler pioneers").await;
    assert!(result.is_success());

    let grace = crm
        .directory
        .find_by_email(&email("grace@navy.mil"))
        .await
        .expect("lookup")
        .expect("grace stored");
    assert!(crm.directory.delete_contact(grace.id()).await.expect("delete"));

    let sources = crm
        .directory
        .list_research_sources(grace.id())
        .await
        .expect("sources");
    assert!(sources.is_empty());
    assert!(
        crm.directory
            .get_contact_detail(grace.id())
            .await
            .expect("detail")
            .is_none()
    );
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn failed_run_leaves_directory_untouched(crm: Crm) {
    crm.reply("I could not find anyone, sorry.");

    let result = crm.research.run_research("nobody").await;

    let ResearchResult::Failed(failure) = result else {
        panic!("expected failed run, got {result:?}");
    };
    let task_id = failure.task_id.expect("task recorded");
    let task = crm
        .research
        .find_task(task_id)
        .await
        .expect("lookup")
        .expect("task exists");
    assert_eq!(task.state(), ResearchTaskState::Failed);
    assert!(task.error_message().is_some_and(|message| !message.is_empty()));

    let contacts = crm
        .directory
        .list_contacts(Page::new(0, 10).expect("page"))
        .await
        .expect("list");
    assert!(contacts.is_empty());
    assert_eq!(crm.agent.received().len(), 1);
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn store_outage_fails_without_a_task(crm: Crm) {
    crm.store.set_unavailable(true);

    let result = crm.research.run_research("anyone").await;

    assert!(!result.is_success());
    assert!(result.task_id().is_none());
    assert!(crm.agent.received().is_empty());
}
