//! Research agent backed by an external executable.

use crate::research::ports::{AgentError, AgentOutput, AgentResult, ResearchAgent};
use async_trait::async_trait;
use std::process::Stdio;
use tokio::io::AsyncWriteExt;
use tokio::process::Command;
use tracing::debug;

/// Model name exported to the agent.
const MODEL_ENV: &str = "LUX_MODEL";
/// API key exported to the agent.
const API_KEY_ENV: &str = "LUX_API_KEY";

/// How to launch the agent executable.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AgentCommand {
    program: String,
    args: Vec<String>,
    model: String,
    api_key: Option<String>,
}

impl AgentCommand {
    /// Creates a command for the given program and model.
    #[must_use]
    pub fn new(program: impl Into<String>, model: impl Into<String>) -> Self {
        Self {
            program: program.into(),
            args: Vec::new(),
            model: model.into(),
            api_key: None,
        }
    }

    /// Sets the arguments passed to the program.
    #[must_use]
    pub fn with_args(mut self, args: impl IntoIterator<Item = impl Into<String>>) -> Self {
        self.args = args.into_iter().map(Into::into).collect();
        self
    }

    /// Sets the API key exported to the program.
    #[must_use]
    pub fn with_api_key(mut self, api_key: impl Into<String>) -> Self {
        self.api_key = Some(api_key.into());
        self
    }

    /// Returns the program name.
    #[must_use]
    pub fn program(&self) -> &str {
        &self.program
    }

    /// Returns the model name.
    #[must_use]
    pub fn model(&self) -> &str {
        &self.model
    }
}

/// Runs the agent as a child process per invocation.
///
/// Instructions are written to the child's stdin and its stdout is returned
/// as text. The child is killed if the invocation future is dropped.
#[derive(Debug, Clone)]
pub struct CommandResearchAgent {
    command: AgentCommand,
}

impl CommandResearchAgent {
    /// Creates an agent that launches the given command.
    #[must_use]
    pub const fn new(command: AgentCommand) -> Self {
        Self { command }
    }

    fn build(&self) -> Command {
        let mut command = Command::new(&self.command.program);
        command
            .args(&self.command.args)
            .env(MODEL_ENV, &self.command.model)
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true);
        if let Some(key) = &self.command.api_key {
            command.env(API_KEY_ENV, key);
        }
        command
    }
}

#[async_trait]
impl ResearchAgent for CommandResearchAgent {
    async fn execute(&self, instructions: &str) -> AgentResult<AgentOutput> {
        debug!(program = %self.command.program, model = %self.command.model, "starting research agent");
        let mut child = self.build().spawn().map_err(AgentError::unavailable)?;
        let mut stdin = child
            .stdin
            .take()
            .ok_or_else(|| AgentError::Failed("agent stdin was not captured".to_owned()))?;

        let feed = async move {
            stdin.write_all(instructions.as_bytes()).await?;
            stdin.shutdown().await
        };
        let (fed, finished) = tokio::join!(feed, child.wait_with_output());
        let output = finished.map_err(AgentError::unavailable)?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(AgentError::Failed(format!(
                "{} exited with {}: {}",
                self.command.program,
                output.status,
                stderr.trim()
            )));
        }
        // A child that exits successfully without reading its input is fine.
        if let Err(err) = fed {
            debug!(error = %err, "agent closed stdin early");
        }

        String::from_utf8(output.stdout)
            .map(AgentOutput::Text)
            .map_err(|err| AgentError::Failed(format!("agent output is not UTF-8: {err}")))
    }
}
