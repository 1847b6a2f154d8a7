//! `PostgreSQL` store backed by Diesel and an r2d2 pool.
//!
//! Diesel is synchronous, so every statement runs on the blocking thread
//! pool through [`tokio::task::spawn_blocking`]. A session checks one
//! connection out of the pool and returns it when dropped.

mod models;
mod repository;
mod schema;

use crate::store::{CrmStore, StoreError, StoreResult};
use async_trait::async_trait;
use diesel::connection::SimpleConnection;
use diesel::pg::PgConnection;
use diesel::r2d2::{ConnectionManager, Pool, PooledConnection};
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tracing::info;

/// `PostgreSQL` connection pool type.
pub type CrmPgPool = Pool<ConnectionManager<PgConnection>>;

type PooledConn = PooledConnection<ConnectionManager<PgConnection>>;

/// SQL creating the CRM tables. Safe to apply repeatedly.
pub const CREATE_SCHEMA_SQL: &str =
    include_str!("../../../migrations/2026-10-16-000000_create_crm_tables/up.sql");

/// `PostgreSQL`-backed CRM store.
#[derive(Debug, Clone)]
pub struct PostgresCrmStore {
    pool: CrmPgPool,
}

impl PostgresCrmStore {
    /// Creates a store from an existing pool.
    #[must_use]
    pub const fn new(pool: CrmPgPool) -> Self {
        Self { pool }
    }

    /// Builds a pool for `database_url` and wraps it in a store.
    ///
    /// No connection is opened up front, so an unreachable database surfaces
    /// when the first session is opened.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::Unavailable`] when the pool cannot be built.
    pub fn connect(database_url: &str, max_connections: u32) -> StoreResult<Self> {
        let manager = ConnectionManager::<PgConnection>::new(database_url);
        let pool = Pool::builder()
            .max_size(max_connections.max(1))
            .min_idle(Some(0))
            .connection_timeout(Duration::from_secs(10))
            .build(manager)
            .map_err(StoreError::unavailable)?;
        Ok(Self::new(pool))
    }

    /// Creates the CRM tables when they are missing.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::Unavailable`] when no connection is available and
    /// [`StoreError::Persistence`] when the schema statements fail.
    pub async fn apply_schema(&self) -> StoreResult<()> {
        let pool = self.pool.clone();
        tokio::task::spawn_blocking(move || {
            let mut connection = pool.get().map_err(StoreError::unavailable)?;
            connection
                .batch_execute(CREATE_SCHEMA_SQL)
                .map_err(StoreError::persistence)
        })
        .await
        .map_err(StoreError::persistence)??;
        info!("applied CRM schema");
        Ok(())
    }
}

#[async_trait]
impl CrmStore for PostgresCrmStore {
    type Session = PostgresSession;

    async fn open_session(&self) -> StoreResult<Self::Session> {
        let pool = self.pool.clone();
        let connection = tokio::task::spawn_blocking(move || pool.get())
            .await
            .map_err(StoreError::persistence)?
            .map_err(StoreError::unavailable)?;
        Ok(PostgresSession {
            connection: Arc::new(Mutex::new(connection)),
        })
    }
}

/// Unit-of-work handle holding one pooled connection.
pub struct PostgresSession {
    connection: Arc<Mutex<PooledConn>>,
}

impl PostgresSession {
    async fn run<F, T>(&self, operation: F) -> StoreResult<T>
    where
        F: FnOnce(&mut PgConnection) -> StoreResult<T> + Send + 'static,
        T: Send + 'static,
    {
        let connection = Arc::clone(&self.connection);
        tokio::task::spawn_blocking(move || {
            let mut guard = connection
                .lock()
                .map_err(|err| StoreError::persistence(std::io::Error::other(err.to_string())))?;
            operation(&mut guard)
        })
        .await
        .map_err(StoreError::persistence)?
    }
}
