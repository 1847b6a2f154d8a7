//! Parsing of raw agent replies into JSON.

use crate::research::ports::AgentOutput;
use serde_json::Value;
use thiserror::Error;
use tracing::{debug, error};

const JSON_FENCE: &str = "```json";
const FENCE: &str = "```";

/// The agent reply could not be read as contact data.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("agent returned invalid JSON: {reason}")]
pub struct MalformedResponse {
    reason: String,
}

impl MalformedResponse {
    /// Creates an error carrying the parser's explanation.
    #[must_use]
    pub fn new(reason: impl Into<String>) -> Self {
        Self {
            reason: reason.into(),
        }
    }

    /// Returns the parser's explanation.
    #[must_use]
    pub fn reason(&self) -> &str {
        &self.reason
    }
}

/// Removes markdown code fences around an agent reply.
///
/// After trimming, a leading "```json" fence, then a leading "```" fence and
/// then a trailing "```" fence are each removed at most once, and the
/// remainder is trimmed again.
#[must_use]
pub fn strip_code_fences(text: &str) -> &str {
    let trimmed = text.trim();
    let after_json_fence = trimmed.strip_prefix(JSON_FENCE).unwrap_or(trimmed);
    let after_open_fence = after_json_fence
        .strip_prefix(FENCE)
        .unwrap_or(after_json_fence);
    let after_close_fence = after_open_fence
        .strip_suffix(FENCE)
        .unwrap_or(after_open_fence);
    after_close_fence.trim()
}

/// Parses an agent reply into JSON.
///
/// Structured replies are returned unchanged.
///
/// # Errors
///
/// Returns [`MalformedResponse`] when text output is not valid JSON once
/// fences are removed.
pub fn parse_agent_output(output: AgentOutput) -> Result<Value, MalformedResponse> {
    match output {
        AgentOutput::Structured(value) => Ok(value),
        AgentOutput::Text(text) => {
            let cleaned = strip_code_fences(&text);
            serde_json::from_str(cleaned).map_err(|err| {
                error!(error = %err, "failed to parse agent response as JSON");
                debug!(response = cleaned, "unparseable agent response");
                MalformedResponse::new(err.to_string())
            })
        }
    }
}

/// Splits a parsed reply into candidate entries.
///
/// An array yields its elements and a single object yields itself.
///
/// # Errors
///
/// Returns [`MalformedResponse`] for any other JSON value.
pub fn candidate_values(value: Value) -> Result<Vec<Value>, MalformedResponse> {
    match value {
        Value::Array(items) => Ok(items),
        Value::Object(_) => Ok(vec![value]),
        other => Err(MalformedResponse::new(format!(
            "expected an array or object of contacts, got {}",
            json_kind(&other)
        ))),
    }
}

const fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}
