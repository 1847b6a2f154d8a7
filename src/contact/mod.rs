//! Contact directory for the CRM.
//!
//! Contacts are people discovered by research runs or entered by hand. Each
//! contact owns its outreach conversations and the research sources that
//! explain where its details were found. The module follows the same
//! hexagonal split as the rest of the crate:
//!
//! - Domain types in [`domain`]
//! - Repository contracts in [`ports`]
//! - Directory operations in [`services`]
//!
//! Store adapters implementing the ports live in [`crate::store`].

pub mod domain;
pub mod ports;
pub mod services;

#[cfg(test)]
mod tests;
