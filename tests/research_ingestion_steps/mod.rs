//! Step definitions for research ingestion scenarios.

pub mod world;

mod given;
mod then;
mod when;
