//! Contact persistence against `PostgreSQL`.

use std::sync::{Arc, mpsc as std_mpsc};
use std::time::Duration;

use super::helpers::{BoxError, test_database};
use crate::test_helpers::SteppingClock;
use diesel::prelude::*;
use personable_crm::contact::{
    domain::{
        Contact, ContactUpdate, ConversationStatus, EmailAddress, ExtractionMethod, NewContact,
        NewConversation,
    },
    ports::ContactRepository,
    services::{ContactDirectoryService, DirectoryError},
};
use personable_crm::store::{CrmStore, StoreError};
use rstest::rstest;

fn request(name: &str, email: &str) -> Result<NewContact, BoxError> {
    Ok(NewContact::try_new(name, email)?)
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn duplicate_email_is_a_conflict() -> Result<(), BoxError> {
    let Some(db) = test_database().await? else {
        return Ok(());
    };
    let directory =
        ContactDirectoryService::new(Arc::new(db.store.clone()), Arc::new(SteppingClock::new()));

    directory.create_contact(request("Ada", "ada@uni.edu")?).await?;
    let err = directory
        .create_contact(request("Ada L.", "ada@uni.edu")?)
        .await
        .expect_err("second insert conflicts");

    assert!(err.is_conflict());
    assert!(matches!(
        err,
        DirectoryError::Store(StoreError::DuplicateEmail(ref email)) if email == "ada@uni.edu"
    ));
    Ok(())
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn bulk_create_skips_existing_and_repeated_emails() -> Result<(), BoxError> {
    let Some(db) = test_database().await? else {
        return Ok(());
    };
    let clock = SteppingClock::new();
    let session = db.store.open_session().await?;
    session
        .insert(&Contact::create(request("Ada", "ada@uni.edu")?, &clock))
        .await?;

    let batch = vec![
        Contact::create(request("Ada", "ada@uni.edu")?, &clock),
        Contact::create(request("Grace", "grace@navy.mil")?, &clock),
        Contact::create(request("Grace H.", "grace@navy.mil")?, &clock),
    ];
    let outcome = session.bulk_create(batch).await?;

    assert_eq!(outcome.created.len(), 1);
    assert_eq!(
        outcome.skipped,
        vec![EmailAddress::new("ada@uni.edu")?, EmailAddress::new("grace@navy.mil")?]
    );
    assert!(outcome.failed.is_empty());
    let grace = session
        .find_by_email(&EmailAddress::new("grace@navy.mil")?)
        .await?
        .expect("grace stored");
    assert_eq!(grace.name().as_str(), "Grace");
    Ok(())
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn search_treats_wildcards_literally() -> Result<(), BoxError> {
    let Some(db) = test_database().await? else {
        return Ok(());
    };
    let directory =
        ContactDirectoryService::new(Arc::new(db.store.clone()), Arc::new(SteppingClock::new()));
    directory
        .create_contact(request("Ada", "ada@uni.edu")?.with_field("100% Analytical"))
        .await?;
    directory
        .create_contact(request("Grace", "grace@navy.mil")?.with_affiliation("US Navy"))
        .await?;

    let percent = directory.search_contacts("100%").await?;
    let navy = directory.search_contacts("NAVY").await?;
    let everything = directory.search_contacts("%").await?;

    assert_eq!(percent.len(), 1);
    assert_eq!(navy.len(), 1);
    assert_eq!(everything.len(), 1);
    Ok(())
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn update_applies_fields_and_rejects_taken_email() -> Result<(), BoxError> {
    let Some(db) = test_database().await? else {
        return Ok(());
    };
    let directory =
        ContactDirectoryService::new(Arc::new(db.store.clone()), Arc::new(SteppingClock::new()));
    let ada = directory.create_contact(request("Ada", "ada@uni.edu")?).await?;
    directory
        .create_contact(request("Grace", "grace@navy.mil")?)
        .await?;

    let updated = directory
        .update_contact(
            ada.id(),
            ContactUpdate {
                affiliation: Some("Analytical Society".to_owned()),
                ..ContactUpdate::default()
            },
        )
        .await?
        .expect("ada exists");
    assert_eq!(updated.affiliation(), Some("Analytical Society"));
    assert!(updated.updated_at() > ada.updated_at());

    let err = directory
        .update_contact(
            ada.id(),
            ContactUpdate {
                email: Some("grace@navy.mil".to_owned()),
                ..ContactUpdate::default()
            },
        )
        .await
        .expect_err("email taken");
    assert!(err.is_conflict());
    Ok(())
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn deleting_a_contact_cascades_to_children() -> Result<(), BoxError> {
    let Some(db) = test_database().await? else {
        return Ok(());
    };
    let directory =
        ContactDirectoryService::new(Arc::new(db.store.clone()), Arc::new(SteppingClock::new()));
    let ada = directory.create_contact(request("Ada", "ada@uni.edu")?).await?;
    let first = directory
        .create_conversation(NewConversation::new(ada.id(), "Hello")?.with_subject("Intro"))
        .await?;
    let second = directory
        .create_conversation(NewConversation::new(ada.id(), "Following up")?)
        .await?;
    directory
        .add_research_source(ada.id(), "https://uni.edu/ada", ExtractionMethod::manual())
        .await?;

    let sent = directory
        .update_conversation_status(first.id(), ConversationStatus::Sent)
        .await?
        .expect("conversation exists");
    assert!(sent.sent_at().is_some());

    let detail = directory
        .get_contact_detail(ada.id())
        .await?
        .expect("ada exists");
    let order: Vec<_> = detail.conversations.iter().map(|c| c.id()).collect();
    assert_eq!(order, vec![second.id(), first.id()]);
    assert_eq!(detail.research_sources.len(), 1);

    assert!(directory.delete_contact(ada.id()).await?);
    assert!(directory.list_conversations(ada.id()).await?.is_empty());
    assert!(directory.list_research_sources(ada.id()).await?.is_empty());
    Ok(())
}

const RIVAL_INSERT_SQL: &str = "INSERT INTO contacts (id, name, email, confidence, created_at, updated_at) \
     VALUES ($1, 'Rival', $2, 1.0, NOW(), NOW())";

/// Holds an uncommitted insert of `email` on its own connection until released.
fn hold_rival_insert(
    url: String,
    email: &'static str,
    locked: std_mpsc::Sender<()>,
    release: std_mpsc::Receiver<()>,
) -> std::thread::JoinHandle<Result<(), BoxError>> {
    std::thread::spawn(move || {
        let mut conn = PgConnection::establish(&url)?;
        conn.transaction::<_, diesel::result::Error, _>(|tx| {
            diesel::sql_query(RIVAL_INSERT_SQL)
                .bind::<diesel::sql_types::Uuid, _>(uuid::Uuid::new_v4())
                .bind::<diesel::sql_types::Text, _>(email)
                .execute(tx)?;
            locked
                .send(())
                .map_err(|_| diesel::result::Error::RollbackTransaction)?;
            release
                .recv()
                .map_err(|_| diesel::result::Error::RollbackTransaction)?;
            Ok(())
        })?;
        Ok(())
    })
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn concurrent_writer_of_the_same_email_becomes_a_skip() -> Result<(), BoxError> {
    let Some(db) = test_database().await? else {
        return Ok(());
    };
    let (locked_tx, locked_rx) = std_mpsc::channel();
    let (release_tx, release_rx) = std_mpsc::channel();
    let rival = hold_rival_insert(db.url.clone(), "ada@uni.edu", locked_tx, release_rx);
    tokio::task::spawn_blocking(move || locked_rx.recv()).await??;

    let clock = SteppingClock::new();
    let batch = vec![
        Contact::create(request("Ada", "ada@uni.edu")?, &clock),
        Contact::create(request("Grace", "grace@navy.mil")?, &clock),
    ];
    let store = db.store.clone();
    let ingest = tokio::spawn(async move {
        let session = store.open_session().await?;
        session.bulk_create(batch).await
    });

    // Let the batch reach the unique index before the rival commits.
    tokio::task::spawn_blocking(|| std::thread::sleep(Duration::from_millis(300))).await?;
    release_tx.send(())?;
    tokio::task::spawn_blocking(move || rival.join())
        .await?
        .map_err(|_| "rival writer panicked")??;

    let outcome = ingest.await??;
    let created: Vec<&str> = outcome
        .created
        .iter()
        .map(|contact| contact.email().as_str())
        .collect();
    assert_eq!(created, vec!["grace@navy.mil"]);
    assert_eq!(outcome.skipped, vec![EmailAddress::new("ada@uni.edu")?]);
    assert!(outcome.failed.is_empty());

    let session = db.store.open_session().await?;
    let ada = session
        .find_by_email(&EmailAddress::new("ada@uni.edu")?)
        .await?
        .expect("rival row committed");
    assert_eq!(ada.name().as_str(), "Rival");
    Ok(())
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn overlapping_batches_in_opposite_order_never_fail() -> Result<(), BoxError> {
    let Some(db) = test_database().await? else {
        return Ok(());
    };
    let clock = SteppingClock::new();
    let emails = ["a@uni.edu", "b@uni.edu", "c@uni.edu", "d@uni.edu"];
    let forward: Vec<Contact> = emails
        .iter()
        .map(|email| request("Forward", email).map(|req| Contact::create(req, &clock)))
        .collect::<Result<_, _>>()?;
    let backward: Vec<Contact> = emails
        .iter()
        .rev()
        .map(|email| request("Backward", email).map(|req| Contact::create(req, &clock)))
        .collect::<Result<_, _>>()?;

    let first = db.store.open_session().await?;
    let second = db.store.open_session().await?;
    let (left, right) = tokio::join!(first.bulk_create(forward), second.bulk_create(backward));
    let (left_outcome, right_outcome) = (left?, right?);

    assert!(left_outcome.failed.is_empty());
    assert!(right_outcome.failed.is_empty());
    assert_eq!(
        left_outcome.created.len() + right_outcome.created.len(),
        emails.len()
    );
    assert_eq!(
        left_outcome.skipped.len() + right_outcome.skipped.len(),
        emails.len()
    );
    let backward_skips: Vec<&str> = right_outcome
        .skipped
        .iter()
        .map(EmailAddress::as_str)
        .collect();
    let mut in_input_order = backward_skips.clone();
    in_input_order.sort_unstable_by(|left, right| right.cmp(left));
    assert_eq!(backward_skips, in_input_order);
    Ok(())
}
