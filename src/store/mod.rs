//! Persistence shared by the contact and research contexts.
//!
//! A research run touches contacts, sources and its own task record, so the
//! repository ports of both contexts are implemented together by one store
//! and handed out through a [`StoreSession`]. A session is opened once per
//! unit of work and released when it is dropped.
//!
//! - [`memory`]: thread-safe in-memory store for tests and local runs
//! - [`postgres`]: Diesel-backed `PostgreSQL` store

mod error;
pub mod memory;
mod page;
pub mod postgres;
mod session;

pub use error::{StoreError, StoreResult};
pub use page::{Page, PageError};
pub use session::{CrmStore, StoreSession};
