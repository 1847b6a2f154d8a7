//! Repository port for research task records.

use crate::research::domain::{ResearchTask, ResearchTaskId};
use crate::store::{Page, StoreResult};
use async_trait::async_trait;

/// Research task persistence contract.
#[async_trait]
pub trait ResearchTaskRepository: Send + Sync {
    /// Stores a new task.
    async fn insert_task(&self, task: &ResearchTask) -> StoreResult<()>;

    /// Persists the state of an existing task.
    ///
    /// # Errors
    ///
    /// Returns [`crate::store::StoreError::TaskNotFound`] when the task does
    /// not exist.
    async fn update_task(&self, task: &ResearchTask) -> StoreResult<()>;

    /// Finds a task by identifier.
    async fn find_task(&self, id: ResearchTaskId) -> StoreResult<Option<ResearchTask>>;

    /// Lists tasks, newest first.
    async fn list_tasks(&self, page: Page) -> StoreResult<Vec<ResearchTask>>;
}
