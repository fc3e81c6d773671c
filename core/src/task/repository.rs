//! Task repository trait
//!
//! Defines the interface for task storage operations.

use async_trait::async_trait;
use uuid::Uuid;

use super::model::{NewTask, Task, TaskPatch};
use super::query::TaskQuery;
use crate::Result;

/// Repository interface for task CRUD operations
#[async_trait]
pub trait TaskRepository: Send + Sync {
    /// Create a task, assigning its id and timestamps
    async fn create(&self, task: NewTask) -> Result<Task>;

    /// Find tasks matching the query's filter, in its sort order, paginated
    async fn find(&self, query: &TaskQuery) -> Result<Vec<Task>>;

    /// Get a task by ID
    async fn find_by_id(&self, id: Uuid) -> Result<Option<Task>>;

    /// Apply a partial update. Returns `None` when no task has this ID.
    async fn update_by_id(&self, id: Uuid, patch: TaskPatch) -> Result<Option<Task>>;

    /// Delete a task by ID. Returns `false` when no task has this ID.
    async fn delete_by_id(&self, id: Uuid) -> Result<bool>;
}
