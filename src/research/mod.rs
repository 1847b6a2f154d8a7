//! Research runs that discover contacts through the external agent.
//!
//! A run creates a tracked [`domain::ResearchTask`], asks the agent for
//! people matching a query, parses and validates the reply, ingests the new
//! contacts without duplicating existing emails, links research sources and
//! finally records the outcome on the task. The module follows the crate's
//! hexagonal split:
//!
//! - Domain types in [`domain`]
//! - Port contracts in [`ports`]
//! - Agent adapters in [`adapters`]
//! - Orchestration services in [`services`]

pub mod adapters;
pub mod domain;
pub mod ports;
pub mod services;

#[cfg(test)]
mod tests;
