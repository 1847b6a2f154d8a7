//! Unit tests for the research context.
