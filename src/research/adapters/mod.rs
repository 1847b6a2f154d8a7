//! Research agent adapters.

mod command;
mod scripted;

pub use command::{AgentCommand, CommandResearchAgent};
pub use scripted::ScriptedResearchAgent;
