//! Command-line entry point for research runs.
//!
//! Usage:
//!
//! ```text
//! crm_research [--config <path>] run <query>
//! crm_research [--config <path>] submit <query>...
//! crm_research [--config <path>] tasks [--skip <n>] [--limit <n>]
//! crm_research [--config <path>] task <id>
//! crm_research [--config <path>] migrate
//! ```
//!
//! Results are written to stdout as JSON; logs go to stderr. Without a
//! configured `database_url` the in-memory store is used, which is only
//! useful for dry runs.

use clap::{Parser, Subcommand};
use mockable::DefaultClock;
use personable_crm::config::CrmConfig;
use personable_crm::research::adapters::CommandResearchAgent;
use personable_crm::research::domain::ResearchTaskId;
use personable_crm::research::services::{
    DEFAULT_TASK_PAGE_SIZE, DispatcherSettings, ResearchDispatcher, ResearchService,
};
use personable_crm::store::memory::InMemoryCrmStore;
use personable_crm::store::postgres::PostgresCrmStore;
use personable_crm::store::{CrmStore, Page};
use personable_crm::telemetry;
use serde::Serialize;
use std::io::Write;
use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;
use tracing::warn;

/// Boxed error type for the main result.
type BoxError = Box<dyn std::error::Error + Send + Sync>;

#[derive(Debug, Parser)]
#[command(name = "crm_research", version, about = "Run people research into the CRM")]
struct Cli {
    /// Path to a TOML configuration file (defaults to ./crm.toml)
    #[arg(long, value_name = "PATH")]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Run one research query and wait for the result
    ///
    /// A blank query is rejected without recording a research task.
    Run {
        /// Research query
        query: String,
    },
    /// Queue queries on the worker pool and wait for the queue to drain
    Submit {
        /// Research queries
        #[arg(required = true)]
        queries: Vec<String>,
    },
    /// List research tasks, newest first
    Tasks {
        /// Tasks to skip
        #[arg(long, default_value_t = 0)]
        skip: usize,
        /// Tasks to return
        #[arg(long, default_value_t = DEFAULT_TASK_PAGE_SIZE)]
        limit: usize,
    },
    /// Show one research task
    Task {
        /// Task identifier
        id: uuid::Uuid,
    },
    /// Create the database tables
    Migrate,
}

#[tokio::main]
async fn main() -> Result<ExitCode, BoxError> {
    let cli = Cli::parse();
    let config = CrmConfig::load(cli.config.as_deref())?;
    telemetry::init(&config.log_level);

    let agent = Arc::new(CommandResearchAgent::new(config.agent.command()));
    let settings = config.research.dispatcher_settings();

    if let Some(url) = config.database_url.as_deref() {
        let store = PostgresCrmStore::connect(url, config.database.max_connections)?;
        if matches!(cli.command, Command::Migrate) {
            store.apply_schema().await?;
            return Ok(ExitCode::SUCCESS);
        }
        execute(Arc::new(store), agent, settings, cli.command).await
    } else {
        if matches!(cli.command, Command::Migrate) {
            return Err("migrate needs database_url to be configured".into());
        }
        warn!("no database_url configured; using the in-memory store");
        execute(Arc::new(InMemoryCrmStore::new()), agent, settings, cli.command).await
    }
}

async fn execute<S>(
    store: Arc<S>,
    agent: Arc<CommandResearchAgent>,
    settings: DispatcherSettings,
    command: Command,
) -> Result<ExitCode, BoxError>
where
    S: CrmStore + 'static,
{
    let service = Arc::new(ResearchService::new(store, agent, Arc::new(DefaultClock)));
    match command {
        Command::Run { query } => {
            let result = service.run_research(&query).await;
            emit(&result)?;
            Ok(if result.is_success() {
                ExitCode::SUCCESS
            } else {
                ExitCode::FAILURE
            })
        }
        Command::Submit { queries } => {
            let dispatcher = ResearchDispatcher::spawn(Arc::clone(&service), settings);
            for query in queries {
                emit(&dispatcher.submit(query).await?)?;
            }
            dispatcher.shutdown().await?;
            Ok(ExitCode::SUCCESS)
        }
        Command::Tasks { skip, limit } => {
            let tasks = service.list_tasks(Page::new(skip, limit)?).await?;
            emit(&tasks)?;
            Ok(ExitCode::SUCCESS)
        }
        Command::Task { id } => {
            let task = service.find_task(ResearchTaskId::from_uuid(id)).await?;
            emit(&task)?;
            Ok(if task.is_some() {
                ExitCode::SUCCESS
            } else {
                ExitCode::FAILURE
            })
        }
        Command::Migrate => Err("migrate needs a PostgreSQL store".into()),
    }
}

fn emit<T: Serialize>(value: &T) -> Result<(), BoxError> {
    let mut stdout = std::io::stdout().lock();
    serde_json::to_writer_pretty(&mut stdout, value)?;
    writeln!(stdout)?;
    Ok(())
}
