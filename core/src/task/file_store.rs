//! File-based task storage implementation
//!
//! Keeps task documents in memory and writes them as a JSON array to a file
//! on disk. A mutation reaches the in-memory map only after its write succeeds.

use async_trait::async_trait;
use chrono::Utc;
use std::collections::HashMap;
use std::path::PathBuf;
use tokio::sync::RwLock;
use uuid::Uuid;

use super::model::{NewTask, Task, TaskPatch};
use super::query::TaskQuery;
use super::repository::TaskRepository;
use crate::Result;

/// File-based task store using JSON
pub struct FileTaskStore {
    /// Path to the JSON file
    path: PathBuf,
    /// In-memory copy of every document
    cache: RwLock<HashMap<Uuid, Task>>,
}

impl FileTaskStore {
    /// Create a new FileTaskStore
    ///
    /// If the file doesn't exist, it will be created on first write.
    pub async fn new(path: impl Into<PathBuf>) -> Result<Self> {
        let path = path.into();
        let cache = if path.exists() {
            let content = tokio::fs::read_to_string(&path).await?;
            let tasks: Vec<Task> = serde_json::from_str(&content)?;
            tasks.into_iter().map(|t| (t.id, t)).collect()
        } else {
            HashMap::new()
        };

        tracing::info!("Loaded {} tasks from {:?}", cache.len(), path);

        Ok(Self {
            path,
            cache: RwLock::new(cache),
        })
    }

    /// Write `tasks` to disk.
    ///
    /// Callers hold the cache write guard across this call and only swap the
    /// new map in once it returns `Ok`, so a failed write leaves the cache and
    /// the file as they were.
    async fn persist(&self, tasks: &HashMap<Uuid, Task>) -> Result<()> {
        let tasks = natural_order(tasks.values().cloned().collect());
        let content = serde_json::to_string_pretty(&tasks)?;

        // Ensure parent directory exists
        if let Some(parent) = self.path.parent() {
            tokio::fs::create_dir_all(parent).await?;
        }

        tokio::fs::write(&self.path, content).await?;
        Ok(())
    }
}

/// Default order of the store: oldest first, ties broken by id
fn natural_order(mut tasks: Vec<Task>) -> Vec<Task> {
    tasks.sort_by(|a, b| a.created_at.cmp(&b.created_at).then(a.id.cmp(&b.id)));
    tasks
}

#[async_trait]
impl TaskRepository for FileTaskStore {
    async fn create(&self, task: NewTask) -> Result<Task> {
        let task = Task::from(task);
        let mut cache = self.cache.write().await;
        let mut next = cache.clone();
        next.insert(task.id, task.clone());
        self.persist(&next).await?;
        *cache = next;
        tracing::debug!(task_id = %task.id, "Task created");
        Ok(task)
    }

    async fn find(&self, query: &TaskQuery) -> Result<Vec<Task>> {
        let matching: Vec<Task> = {
            let cache = self.cache.read().await;
            cache
                .values()
                .filter(|t| query.filter.matches(t))
                .cloned()
                .collect()
        };
        let mut tasks = natural_order(matching);
        if let Some(sort) = query.sort {
            // Stable, so equal keys keep the natural order
            tasks.sort_by(|a, b| sort.compare(a, b));
        }
        Ok(tasks
            .into_iter()
            .skip(query.skip)
            .take(query.limit)
            .collect())
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<Task>> {
        let cache = self.cache.read().await;
        Ok(cache.get(&id).cloned())
    }

    async fn update_by_id(&self, id: Uuid, patch: TaskPatch) -> Result<Option<Task>> {
        let mut cache = self.cache.write().await;
        let mut next = cache.clone();
        let updated = match next.get_mut(&id) {
            Some(task) => {
                task.apply(patch, Utc::now());
                task.clone()
            }
            None => return Ok(None),
        };
        self.persist(&next).await?;
        *cache = next;
        tracing::debug!(task_id = %id, "Task updated");
        Ok(Some(updated))
    }

    async fn delete_by_id(&self, id: Uuid) -> Result<bool> {
        let mut cache = self.cache.write().await;
        if !cache.contains_key(&id) {
            return Ok(false);
        }
        let mut next = cache.clone();
        next.remove(&id);
        self.persist(&next).await?;
        *cache = next;
        tracing::debug!(task_id = %id, "Task deleted");
        Ok(true)
    }
}
