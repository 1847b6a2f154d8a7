//! Repository implementations for [`PostgresSession`].

use super::{
    PostgresSession,
    models::{ContactRow, ConversationRow, ResearchSourceRow, ResearchTaskRow},
    schema::{contacts, conversations, research_sources, research_tasks},
};
use crate::contact::{
    domain::{Contact, ContactId, Conversation, ConversationId, EmailAddress, ResearchSource},
    ports::{BulkCreateOutcome, ContactRepository, ConversationRepository, ResearchSourceRepository},
};
use crate::research::{
    domain::{ResearchTask, ResearchTaskId},
    ports::ResearchTaskRepository,
};
use crate::store::{Page, StoreError, StoreResult};
use async_trait::async_trait;
use diesel::dsl::exists;
use diesel::pg::PgConnection;
use diesel::prelude::*;
use diesel::result::{DatabaseErrorKind, Error as DieselError};
use std::collections::HashSet;
use tracing::warn;

impl From<DieselError> for StoreError {
    fn from(err: DieselError) -> Self {
        Self::persistence(err)
    }
}

const SEARCH_CONTACTS_SQL: &str = concat!(
    "SELECT id, name, email, affiliation, field, website, source_url, confidence, ",
    "created_at, updated_at FROM contacts ",
    "WHERE name ILIKE $1 ESCAPE '\\' ",
    "OR email ILIKE $1 ESCAPE '\\' ",
    "OR affiliation ILIKE $1 ESCAPE '\\' ",
    "OR field ILIKE $1 ESCAPE '\\' ",
    "ORDER BY created_at, id",
);

#[async_trait]
impl ContactRepository for PostgresSession {
    async fn insert(&self, contact: &Contact) -> StoreResult<()> {
        let row = ContactRow::from(contact);
        self.run(move |connection| {
            diesel::insert_into(contacts::table)
                .values(&row)
                .execute(connection)
                .map_err(|err| map_contact_write_error(err, &row.email))?;
            Ok(())
        })
        .await
    }

    async fn bulk_create(&self, batch: Vec<Contact>) -> StoreResult<BulkCreateOutcome> {
        self.run(move |connection| {
            connection.transaction::<_, StoreError, _>(|transaction| {
                insert_new_contacts(transaction, batch)
            })
        })
        .await
    }

    async fn update(&self, contact: &Contact) -> StoreResult<bool> {
        let row = ContactRow::from(contact);
        self.run(move |connection| {
            let updated = diesel::update(contacts::table.filter(contacts::id.eq(row.id)))
                .set((
                    contacts::name.eq(&row.name),
                    contacts::email.eq(&row.email),
                    contacts::affiliation.eq(&row.affiliation),
                    contacts::field.eq(&row.field),
                    contacts::website.eq(&row.website),
                    contacts::source_url.eq(&row.source_url),
                    contacts::confidence.eq(row.confidence),
                    contacts::updated_at.eq(row.updated_at),
                ))
                .execute(connection)
                .map_err(|err| map_contact_write_error(err, &row.email))?;
            Ok(updated > 0)
        })
        .await
    }

    async fn delete(&self, id: ContactId) -> StoreResult<bool> {
        self.run(move |connection| {
            let deleted = diesel::delete(contacts::table.filter(contacts::id.eq(id.into_inner())))
                .execute(connection)
                .map_err(StoreError::persistence)?;
            Ok(deleted > 0)
        })
        .await
    }

    async fn find_by_id(&self, id: ContactId) -> StoreResult<Option<Contact>> {
        self.run(move |connection| {
            contacts::table
                .filter(contacts::id.eq(id.into_inner()))
                .select(ContactRow::as_select())
                .first::<ContactRow>(connection)
                .optional()
                .map_err(StoreError::persistence)?
                .map(Contact::try_from)
                .transpose()
        })
        .await
    }

    async fn find_by_email(&self, email: &EmailAddress) -> StoreResult<Option<Contact>> {
        let address = email.as_str().to_owned();
        self.run(move |connection| {
            contacts::table
                .filter(contacts::email.eq(&address))
                .select(ContactRow::as_select())
                .first::<ContactRow>(connection)
                .optional()
                .map_err(StoreError::persistence)?
                .map(Contact::try_from)
                .transpose()
        })
        .await
    }

    async fn list(&self, page: Page) -> StoreResult<Vec<Contact>> {
        let (offset, limit) = page_bounds(page)?;
        self.run(move |connection| {
            contacts::table
                .order((contacts::created_at.asc(), contacts::id.asc()))
                .offset(offset)
                .limit(limit)
                .select(ContactRow::as_select())
                .load::<ContactRow>(connection)
                .map_err(StoreError::persistence)?
                .into_iter()
                .map(Contact::try_from)
                .collect()
        })
        .await
    }

    async fn search(&self, text: &str) -> StoreResult<Vec<Contact>> {
        let pattern = format!("%{}%", escape_like(text));
        self.run(move |connection| {
            diesel::sql_query(SEARCH_CONTACTS_SQL)
                .bind::<diesel::sql_types::Text, _>(pattern.as_str())
                .load::<ContactRow>(connection)
                .map_err(StoreError::persistence)?
                .into_iter()
                .map(Contact::try_from)
                .collect()
        })
        .await
    }
}

#[async_trait]
impl ConversationRepository for PostgresSession {
    async fn insert_conversation(&self, conversation: &Conversation) -> StoreResult<()> {
        let row = ConversationRow::from(conversation);
        self.run(move |connection| {
            diesel::insert_into(conversations::table)
                .values(&row)
                .execute(connection)
                .map_err(|err| map_child_write_error(err, row.contact_id))?;
            Ok(())
        })
        .await
    }

    async fn update_conversation(&self, conversation: &Conversation) -> StoreResult<bool> {
        let row = ConversationRow::from(conversation);
        self.run(move |connection| {
            let updated = diesel::update(conversations::table.filter(conversations::id.eq(row.id)))
                .set((
                    conversations::subject.eq(&row.subject),
                    conversations::body.eq(&row.body),
                    conversations::status.eq(&row.status),
                    conversations::sent_at.eq(row.sent_at),
                ))
                .execute(connection)
                .map_err(StoreError::persistence)?;
            Ok(updated > 0)
        })
        .await
    }

    async fn find_conversation(&self, id: ConversationId) -> StoreResult<Option<Conversation>> {
        self.run(move |connection| {
            conversations::table
                .filter(conversations::id.eq(id.into_inner()))
                .select(ConversationRow::as_select())
                .first::<ConversationRow>(connection)
                .optional()
                .map_err(StoreError::persistence)?
                .map(Conversation::try_from)
                .transpose()
        })
        .await
    }

    async fn conversations_for(&self, contact_id: ContactId) -> StoreResult<Vec<Conversation>> {
        self.run(move |connection| {
            conversations::table
                .filter(conversations::contact_id.eq(contact_id.into_inner()))
                .order((conversations::created_at.desc(), conversations::id.desc()))
                .select(ConversationRow::as_select())
                .load::<ConversationRow>(connection)
                .map_err(StoreError::persistence)?
                .into_iter()
                .map(Conversation::try_from)
                .collect()
        })
        .await
    }
}

#[async_trait]
impl ResearchSourceRepository for PostgresSession {
    async fn insert_source(&self, source: &ResearchSource) -> StoreResult<()> {
        let row = ResearchSourceRow::from(source);
        self.run(move |connection| {
            diesel::insert_into(research_sources::table)
                .values(&row)
                .execute(connection)
                .map_err(|err| map_child_write_error(err, row.contact_id))?;
            Ok(())
        })
        .await
    }

    async fn sources_for(&self, contact_id: ContactId) -> StoreResult<Vec<ResearchSource>> {
        self.run(move |connection| {
            let rows = research_sources::table
                .filter(research_sources::contact_id.eq(contact_id.into_inner()))
                .order(research_sources::extracted_at.asc())
                .select(ResearchSourceRow::as_select())
                .load::<ResearchSourceRow>(connection)
                .map_err(StoreError::persistence)?;
            Ok(rows.into_iter().map(ResearchSource::from).collect())
        })
        .await
    }
}

#[async_trait]
impl ResearchTaskRepository for PostgresSession {
    async fn insert_task(&self, task: &ResearchTask) -> StoreResult<()> {
        let row = ResearchTaskRow::try_from(task)?;
        self.run(move |connection| {
            diesel::insert_into(research_tasks::table)
                .values(&row)
                .execute(connection)
                .map_err(StoreError::persistence)?;
            Ok(())
        })
        .await
    }

    async fn update_task(&self, task: &ResearchTask) -> StoreResult<()> {
        let task_id = task.id();
        let row = ResearchTaskRow::try_from(task)?;
        self.run(move |connection| {
            let updated = diesel::update(research_tasks::table.filter(research_tasks::id.eq(row.id)))
                .set((
                    research_tasks::status.eq(&row.status),
                    research_tasks::results_count.eq(row.results_count),
                    research_tasks::error_message.eq(&row.error_message),
                    research_tasks::completed_at.eq(row.completed_at),
                ))
                .execute(connection)
                .map_err(StoreError::persistence)?;
            if updated == 0 {
                return Err(StoreError::TaskNotFound(task_id));
            }
            Ok(())
        })
        .await
    }

    async fn find_task(&self, id: ResearchTaskId) -> StoreResult<Option<ResearchTask>> {
        self.run(move |connection| {
            research_tasks::table
                .filter(research_tasks::id.eq(id.into_inner()))
                .select(ResearchTaskRow::as_select())
                .first::<ResearchTaskRow>(connection)
                .optional()
                .map_err(StoreError::persistence)?
                .map(ResearchTask::try_from)
                .transpose()
        })
        .await
    }

    async fn list_tasks(&self, page: Page) -> StoreResult<Vec<ResearchTask>> {
        let (offset, limit) = page_bounds(page)?;
        self.run(move |connection| {
            research_tasks::table
                .order((research_tasks::created_at.desc(), research_tasks::id.desc()))
                .offset(offset)
                .limit(limit)
                .select(ResearchTaskRow::as_select())
                .load::<ResearchTaskRow>(connection)
                .map_err(StoreError::persistence)?
                .into_iter()
                .map(ResearchTask::try_from)
                .collect()
        })
        .await
    }
}

/// Per-contact result, keyed by input position.
enum BatchEntry {
    Created(Contact),
    Skipped(EmailAddress),
    Failed(EmailAddress, String),
}

/// Inserts a batch inside an open transaction, one savepoint per contact.
///
/// Rows are written in email order so concurrent batches take unique-index
/// locks in the same order and cannot deadlock; the outcome is reported in
/// input order.
fn insert_new_contacts(
    connection: &mut PgConnection,
    batch: Vec<Contact>,
) -> StoreResult<BulkCreateOutcome> {
    let mut ordered: Vec<(usize, Contact)> = batch.into_iter().enumerate().collect();
    ordered.sort_by(|(_, left), (_, right)| left.email().as_str().cmp(right.email().as_str()));

    let mut entries = Vec::with_capacity(ordered.len());
    let mut seen = HashSet::new();
    for (position, contact) in ordered {
        let entry = insert_one(connection, &mut seen, contact)?;
        entries.push((position, entry));
    }
    entries.sort_by_key(|(position, _)| *position);

    let mut outcome = BulkCreateOutcome::default();
    for (_, entry) in entries {
        match entry {
            BatchEntry::Created(contact) => outcome.created.push(contact),
            BatchEntry::Skipped(email) => outcome.skip(email),
            BatchEntry::Failed(email, reason) => outcome.fail(email, reason),
        }
    }
    Ok(outcome)
}

fn insert_one(
    connection: &mut PgConnection,
    seen: &mut HashSet<EmailAddress>,
    contact: Contact,
) -> StoreResult<BatchEntry> {
    let email = contact.email().clone();
    if !seen.insert(email.clone()) {
        return Ok(BatchEntry::Skipped(email));
    }
    let taken = diesel::select(exists(
        contacts::table.filter(contacts::email.eq(email.as_str())),
    ))
    .get_result::<bool>(connection)
    .map_err(StoreError::persistence)?;
    if taken {
        return Ok(BatchEntry::Skipped(email));
    }

    let row = ContactRow::from(&contact);
    let inserted = connection.transaction::<_, DieselError, _>(|savepoint| {
        diesel::insert_into(contacts::table)
            .values(&row)
            .execute(savepoint)
    });
    Ok(match inserted {
        Ok(_) => BatchEntry::Created(contact),
        // A concurrent writer committed the same email after the check.
        Err(DieselError::DatabaseError(DatabaseErrorKind::UniqueViolation, _)) => {
            BatchEntry::Skipped(email)
        }
        Err(err) => {
            warn!(email = %email, error = %err, "contact insert failed inside batch");
            BatchEntry::Failed(email, err.to_string())
        }
    })
}

fn map_contact_write_error(err: DieselError, email: &str) -> StoreError {
    match err {
        DieselError::DatabaseError(DatabaseErrorKind::UniqueViolation, _) => {
            StoreError::DuplicateEmail(email.to_owned())
        }
        other => StoreError::persistence(other),
    }
}

fn map_child_write_error(err: DieselError, contact_id: uuid::Uuid) -> StoreError {
    match err {
        DieselError::DatabaseError(DatabaseErrorKind::ForeignKeyViolation, _) => {
            StoreError::ContactNotFound(ContactId::from_uuid(contact_id))
        }
        other => StoreError::persistence(other),
    }
}

fn page_bounds(page: Page) -> StoreResult<(i64, i64)> {
    let offset = i64::try_from(page.skip()).map_err(StoreError::persistence)?;
    let limit = i64::try_from(page.limit()).map_err(StoreError::persistence)?;
    Ok((offset, limit))
}

/// Escapes `LIKE` wildcards so user text matches literally.
fn escape_like(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for ch in text.chars() {
        if matches!(ch, '\\' | '%' | '_') {
            escaped.push('\\');
        }
        escaped.push(ch);
    }
    escaped
}
