//! Personable CRM: research-driven contact discovery.
//!
//! This crate runs people-research tasks through an external agent, turns
//! the agent's reply into validated contacts and stores them without
//! duplicating known email addresses. Each run is tracked as a research
//! task with an explicit lifecycle.
//!
//! # Architecture
//!
//! The crate follows hexagonal architecture principles:
//!
//! - **Domain**: Pure business logic with no infrastructure dependencies
//! - **Ports**: Abstract trait interfaces for external interactions
//! - **Adapters**: Concrete implementations of ports (database, agent process)
//!
//! # Modules
//!
//! - [`contact`]: Contacts, conversations, research sources and ingestion
//! - [`research`]: Research tasks, agent reply handling and orchestration
//! - [`store`]: Store sessions with in-memory and `PostgreSQL` backends
//! - [`config`]: Layered runtime configuration
//! - [`telemetry`]: Logging setup

pub mod config;
pub mod contact;
pub mod research;
pub mod store;
pub mod telemetry;

#[cfg(test)]
mod test_support;
