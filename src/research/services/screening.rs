//! Validation of the candidates in an agent reply.

use crate::research::domain::{CandidateContact, ValidatedCandidate};
use serde_json::Value;
use tracing::{info, warn};

/// Candidates from one reply after validation.
#[derive(Debug, Clone, PartialEq)]
pub struct ScreenedCandidates {
    /// Number of entries the agent returned.
    pub total: usize,
    /// Entries that passed validation, in reply order.
    pub accepted: Vec<ValidatedCandidate>,
}

/// Validates every entry of an agent reply.
///
/// Rejected entries are logged and dropped; they never abort the batch.
#[must_use]
pub fn screen_candidates(values: Vec<Value>) -> ScreenedCandidates {
    let total = values.len();
    let accepted = values
        .into_iter()
        .enumerate()
        .filter_map(|(position, value)| {
            match CandidateContact::from_value(value).and_then(CandidateContact::validate) {
                Ok(candidate) => Some(candidate),
                Err(reason) => {
                    warn!(position, reason = %reason, "skipping invalid contact");
                    None
                }
            }
        })
        .collect::<Vec<_>>();
    info!(valid = accepted.len(), total, "validated research candidates");
    ScreenedCandidates { total, accepted }
}
