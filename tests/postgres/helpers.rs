//! Shared helpers for `PostgreSQL` integration tests.

use diesel::connection::SimpleConnection;
use diesel::prelude::*;
use personable_crm::store::postgres::PostgresCrmStore;
use tokio::sync::{Mutex, MutexGuard};

pub type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// Environment variable naming the test database.
pub const DATABASE_URL_ENV: &str = "CRM_TEST_DATABASE_URL";

const RESET_SQL: &str = "TRUNCATE research_tasks, research_sources, conversations, contacts";

static DATABASE_LOCK: Mutex<()> = Mutex::const_new(());

/// Store over an emptied database, held exclusively for one test.
pub struct TestDatabase {
    pub store: PostgresCrmStore,
    pub url: String,
    _lock: MutexGuard<'static, ()>,
}

/// Connects to the test database, applies the schema and empties it.
///
/// Returns `Ok(None)` when [`DATABASE_URL_ENV`] is unset.
///
/// # Errors
///
/// Returns an error if the database cannot be prepared.
pub async fn test_database() -> Result<Option<TestDatabase>, BoxError> {
    let Ok(url) = std::env::var(DATABASE_URL_ENV) else {
        return Ok(None);
    };
    let lock = DATABASE_LOCK.lock().await;

    let store = PostgresCrmStore::connect(&url, 4)?;
    store.apply_schema().await?;
    let reset_url = url.clone();
    tokio::task::spawn_blocking(move || reset(&reset_url)).await??;

    Ok(Some(TestDatabase {
        store,
        url,
        _lock: lock,
    }))
}

fn reset(url: &str) -> Result<(), BoxError> {
    let mut conn = PgConnection::establish(url).map_err(|err| Box::new(err) as BoxError)?;
    conn.batch_execute(RESET_SQL)
        .map_err(|err| Box::new(err) as BoxError)?;
    Ok(())
}
