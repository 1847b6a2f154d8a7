//! Background execution of research runs on a fixed worker pool.

use super::ResearchRunner;
use crate::research::domain::{ResearchAccepted, ResearchResult};
use std::sync::Arc;
use thiserror::Error;
use tokio::sync::{Mutex, mpsc};
use tokio::task::{JoinError, JoinHandle};
use tracing::{debug, error, info};

/// Worker pool sizing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DispatcherSettings {
    /// Number of worker tasks; at least one is always started.
    pub workers: usize,
    /// Queued runs accepted before `submit` waits; at least one.
    pub queue_capacity: usize,
}

impl Default for DispatcherSettings {
    fn default() -> Self {
        Self {
            workers: 2,
            queue_capacity: 32,
        }
    }
}

/// Errors raised by the dispatcher.
#[derive(Debug, Error)]
pub enum DispatchError {
    /// The queue no longer accepts work.
    #[error("research queue is closed")]
    Closed,
    /// A worker task panicked or was cancelled.
    #[error("research worker stopped abnormally: {0}")]
    Worker(#[from] JoinError),
}

type SharedQueue = Arc<Mutex<mpsc::Receiver<String>>>;

/// Fire-and-forget entry point for research runs.
///
/// Queries go into a bounded queue drained by a fixed number of workers.
/// Each worker awaits the same `run_research` used by inline callers and
/// logs the outcome.
#[derive(Debug)]
pub struct ResearchDispatcher {
    sender: mpsc::Sender<String>,
    workers: Vec<JoinHandle<()>>,
}

impl ResearchDispatcher {
    /// Starts the worker pool on the current tokio runtime.
    #[must_use]
    pub fn spawn<R: ResearchRunner>(runner: Arc<R>, settings: DispatcherSettings) -> Self {
        let (sender, receiver) = mpsc::channel(settings.queue_capacity.max(1));
        let queue: SharedQueue = Arc::new(Mutex::new(receiver));
        let workers = (0..settings.workers.max(1))
            .map(|worker| tokio::spawn(work(worker, Arc::clone(&runner), Arc::clone(&queue))))
            .collect();
        Self { sender, workers }
    }

    /// Queues a research run and returns immediately.
    ///
    /// Waits only while the queue is full.
    ///
    /// # Errors
    ///
    /// Returns [`DispatchError::Closed`] when every worker has stopped.
    pub async fn submit(&self, query: impl Into<String>) -> Result<ResearchAccepted, DispatchError> {
        let text = query.into();
        self.sender
            .send(text.clone())
            .await
            .map_err(|_| DispatchError::Closed)?;
        debug!(query = %text, "queued research run");
        Ok(ResearchAccepted::started(text))
    }

    /// Closes the queue and waits for queued runs to finish.
    ///
    /// # Errors
    ///
    /// Returns [`DispatchError::Worker`] when a worker panicked.
    pub async fn shutdown(self) -> Result<(), DispatchError> {
        let Self { sender, workers } = self;
        drop(sender);
        for handle in workers {
            handle.await?;
        }
        info!("research dispatcher drained");
        Ok(())
    }
}

async fn work<R: ResearchRunner>(worker: usize, runner: Arc<R>, queue: SharedQueue) {
    loop {
        let next = queue.lock().await.recv().await;
        let Some(query) = next else {
            debug!(worker, "research worker stopping");
            return;
        };
        match runner.run_research(&query).await {
            ResearchResult::Completed(summary) => info!(
                worker,
                task_id = %summary.task_id,
                query = %summary.query,
                new_contacts = summary.new_contacts,
                "background research finished"
            ),
            ResearchResult::Failed(failure) => error!(
                worker,
                task_id = ?failure.task_id,
                query = %failure.query,
                error = %failure.error,
                "background research failed"
            ),
        }
    }
}
