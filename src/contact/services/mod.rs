//! Application services for the contact directory.

mod directory;
mod ingestion;

pub use directory::{
    ContactDirectoryService, DEFAULT_CONTACT_PAGE_SIZE, DirectoryError, DirectoryResult,
    MAX_CONTACT_PAGE_SIZE, contact_page,
};
pub use ingestion::ingest_contacts;
