//! Duplicate-tolerant bulk ingestion of new contacts.

use crate::contact::{
    domain::{Contact, NewContact},
    ports::{BulkCreateOutcome, ContactRepository},
};
use crate::store::StoreResult;
use mockable::Clock;
use tracing::{info, warn};

/// Creates contacts for every request whose email is not yet stored.
///
/// Duplicates and per-item store failures are reported in the returned
/// outcome rather than as errors.
///
/// # Errors
///
/// Returns the store error when the batch as a whole cannot be committed.
pub async fn ingest_contacts<R>(
    repository: &R,
    requests: Vec<NewContact>,
    clock: &impl Clock,
) -> StoreResult<BulkCreateOutcome>
where
    R: ContactRepository + ?Sized,
{
    let contacts: Vec<Contact> = requests
        .into_iter()
        .map(|request| Contact::create(request, clock))
        .collect();

    let outcome = repository.bulk_create(contacts).await?;

    for email in &outcome.skipped {
        info!(email = %email, "skipping duplicate contact");
    }
    for failed in &outcome.failed {
        warn!(email = %failed.email, reason = %failed.reason, "failed to create contact");
    }
    info!(
        created = outcome.created.len(),
        skipped = outcome.skipped.len(),
        failed = outcome.failed.len(),
        "bulk contact create finished"
    );
    Ok(outcome)
}
