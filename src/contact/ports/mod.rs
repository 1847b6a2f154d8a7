//! Port contracts for contact persistence.
//!
//! Ports define infrastructure-agnostic interfaces used by contact and
//! research services.

pub mod repository;

pub use repository::{
    BulkCreateOutcome, ContactRepository, ConversationRepository, FailedContact,
    ResearchSourceRepository,
};
