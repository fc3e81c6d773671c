//! Application state

use std::path::PathBuf;
use std::sync::Arc;

use task_core::task::{FileTaskStore, TaskRepository};

/// Shared application state
///
/// The store is opened once at startup and shared by every request.
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    task_store: Box<dyn TaskRepository>,
}

impl AppState {
    /// Open the task store under the given data directory
    pub async fn new(data_dir: PathBuf) -> task_core::Result<Self> {
        let tasks_path = data_dir.join("tasks.json");
        let task_store = FileTaskStore::new(tasks_path).await?;
        Ok(Self::with_store(task_store))
    }

    /// Build state around an already opened store
    pub fn with_store(task_store: impl TaskRepository + 'static) -> Self {
        Self {
            inner: Arc::new(AppStateInner {
                task_store: Box::new(task_store),
            }),
        }
    }

    /// Get reference to the task store
    pub fn task_store(&self) -> &dyn TaskRepository {
        self.inner.task_store.as_ref()
    }
}
