//! Layered runtime configuration.
//!
//! Values are merged from built-in defaults, then an optional TOML file,
//! then `CRM_`-prefixed environment variables. Nested keys use `__` in
//! variable names, so `CRM_AGENT__MODEL` sets `agent.model`.

use crate::research::adapters::AgentCommand;
use crate::research::services::DispatcherSettings;
use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};
use serde::{Deserialize, Serialize};
use std::path::Path;
use thiserror::Error;

/// TOML file read when no explicit path is given.
pub const DEFAULT_CONFIG_FILE: &str = "crm.toml";

/// Environment variable prefix.
pub const ENV_PREFIX: &str = "CRM_";

/// Errors raised while loading configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// A source could not be read or did not match the expected shape.
    #[error("failed to load configuration: {0}")]
    Load(#[source] Box<figment::Error>),
    /// A value was read but is out of range.
    #[error("invalid configuration value for {key}: {reason}")]
    Invalid {
        /// Dotted configuration key.
        key: &'static str,
        /// Why the value was rejected.
        reason: &'static str,
    },
}

/// Top-level configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CrmConfig {
    /// `PostgreSQL` URL; the in-memory store is used when absent.
    pub database_url: Option<String>,
    /// Fallback log filter when `RUST_LOG` is unset.
    pub log_level: String,
    /// Research agent launch settings.
    pub agent: AgentConfig,
    /// Background research settings.
    pub research: ResearchConfig,
    /// Connection pool settings.
    pub database: DatabaseConfig,
}

impl Default for CrmConfig {
    fn default() -> Self {
        Self {
            database_url: None,
            log_level: "info".to_owned(),
            agent: AgentConfig::default(),
            research: ResearchConfig::default(),
            database: DatabaseConfig::default(),
        }
    }
}

/// Research agent launch settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AgentConfig {
    /// Executable that runs the agent.
    pub program: String,
    /// Arguments passed to the executable.
    pub args: Vec<String>,
    /// Model name exported to the agent.
    pub model: String,
    /// API key exported to the agent.
    pub api_key: Option<String>,
}

impl Default for AgentConfig {
    fn default() -> Self {
        Self {
            program: "lux-agent".to_owned(),
            args: Vec::new(),
            model: "lux-thinker-1".to_owned(),
            api_key: None,
        }
    }
}

impl AgentConfig {
    /// Builds the agent launch command.
    #[must_use]
    pub fn command(&self) -> AgentCommand {
        let mut command = AgentCommand::new(self.program.as_str(), self.model.as_str())
            .with_args(self.args.iter().cloned());
        if let Some(key) = &self.api_key {
            command = command.with_api_key(key.as_str());
        }
        command
    }
}

/// Background research settings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ResearchConfig {
    /// Worker tasks draining the research queue.
    pub workers: usize,
    /// Capacity of the research queue.
    pub queue_capacity: usize,
}

impl Default for ResearchConfig {
    fn default() -> Self {
        let settings = DispatcherSettings::default();
        Self {
            workers: settings.workers,
            queue_capacity: settings.queue_capacity,
        }
    }
}

impl ResearchConfig {
    /// Returns the dispatcher sizing.
    #[must_use]
    pub const fn dispatcher_settings(self) -> DispatcherSettings {
        DispatcherSettings {
            workers: self.workers,
            queue_capacity: self.queue_capacity,
        }
    }
}

/// Connection pool settings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DatabaseConfig {
    /// Largest number of pooled connections.
    pub max_connections: u32,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self { max_connections: 8 }
    }
}

impl CrmConfig {
    /// Builds the provider stack for an optional explicit file.
    ///
    /// Without a path, [`DEFAULT_CONFIG_FILE`] is read when present.
    #[must_use]
    pub fn figment(path: Option<&Path>) -> Figment {
        let file = path.unwrap_or_else(|| Path::new(DEFAULT_CONFIG_FILE));
        Figment::from(Serialized::defaults(Self::default()))
            .merge(Toml::file(file))
            .merge(Env::prefixed(ENV_PREFIX).split("__"))
    }

    /// Loads configuration from every source.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] when a source is malformed or a value is out
    /// of range.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        Self::from_figment(&Self::figment(path))
    }

    /// Extracts and checks configuration from a prepared provider stack.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] when extraction fails or a value is out of
    /// range.
    pub fn from_figment(figment: &Figment) -> Result<Self, ConfigError> {
        let config: Self = figment
            .extract()
            .map_err(|err| ConfigError::Load(Box::new(err)))?;
        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if self.research.workers == 0 {
            return Err(ConfigError::Invalid {
                key: "research.workers",
                reason: "must be at least 1",
            });
        }
        if self.research.queue_capacity == 0 {
            return Err(ConfigError::Invalid {
                key: "research.queue_capacity",
                reason: "must be at least 1",
            });
        }
        if self.database.max_connections == 0 {
            return Err(ConfigError::Invalid {
                key: "database.max_connections",
                reason: "must be at least 1",
            });
        }
        Ok(())
    }
}
