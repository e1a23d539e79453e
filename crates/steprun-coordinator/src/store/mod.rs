//! Persistent records behind the coordinator.
//!
//! Services only see these traits; [`MemoryStore`] is the in-process
//! implementation used by the binary and the tests.

mod memory;

use std::collections::BTreeMap;

use async_trait::async_trait;
use thiserror::Error;

use steprun_core::{
    NewTask, Task, TaskId, TaskStatus, TaskUpdate, User, UserId, Worker, WorkerId, WorkerStatus,
};

pub use memory::MemoryStore;

/// Storage errors.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("storage unavailable: {0}")]
    Unavailable(String),

    #[error("task not found: {0}")]
    TaskNotFound(TaskId),

    #[error("worker not found: {0}")]
    WorkerNotFound(WorkerId),

    #[error("user not found: {0}")]
    UserNotFound(UserId),

    #[error("duplicate worker name: {0}")]
    DuplicateWorkerName(String),
}

/// Task rows.
#[async_trait]
pub trait TaskStore: Send + Sync {
    /// Insert a task in `Record` with progress 0 and empty detail.
    async fn insert_task(&self, task: NewTask) -> Result<Task, StoreError>;

    async fn find_task(&self, id: TaskId) -> Result<Option<Task>, StoreError>;

    /// Apply a partial update and bump `updated_at`.
    async fn update_task(&self, id: TaskId, update: TaskUpdate) -> Result<(), StoreError>;

    /// Tasks of `worker_id` in `Record` or `Accepted`, oldest first.
    async fn unfinished_tasks(&self, worker_id: WorkerId) -> Result<Vec<Task>, StoreError>;

    /// Number of tasks ever sent to `worker_id`.
    async fn count_tasks(&self, worker_id: WorkerId) -> Result<u64, StoreError>;

    /// A page of `worker_id`'s tasks, newest first.
    async fn list_tasks(
        &self,
        worker_id: WorkerId,
        offset: u64,
        limit: u64,
    ) -> Result<Vec<Task>, StoreError>;

    /// Number of tasks in each status.
    async fn status_counts(&self) -> Result<BTreeMap<TaskStatus, u64>, StoreError>;
}

/// Worker rows and operator-worker links.
#[async_trait]
pub trait WorkerDirectory: Send + Sync {
    async fn find_worker(&self, id: WorkerId) -> Result<Option<Worker>, StoreError>;

    async fn find_worker_by_name(&self, name: &str) -> Result<Option<Worker>, StoreError>;

    /// Insert a new worker in `Disabled`.
    async fn insert_worker(&self, name: &str, desc: &str, key: &str)
        -> Result<Worker, StoreError>;

    /// Rename a worker and replace its description.
    async fn update_worker(&self, id: WorkerId, name: &str, desc: &str)
        -> Result<(), StoreError>;

    async fn set_worker_status(&self, id: WorkerId, status: WorkerStatus)
        -> Result<(), StoreError>;

    /// Delete a worker together with all of its operator links.
    async fn delete_worker(&self, id: WorkerId) -> Result<(), StoreError>;

    async fn list_workers(&self) -> Result<Vec<Worker>, StoreError>;

    /// Workers linked to `user_id`.
    async fn workers_for_user(&self, user_id: UserId) -> Result<Vec<Worker>, StoreError>;

    /// Operators linked to `worker_id`.
    async fn users_for_worker(&self, worker_id: WorkerId) -> Result<Vec<UserId>, StoreError>;

    async fn is_linked(&self, user_id: UserId, worker_id: WorkerId) -> Result<bool, StoreError>;

    /// Link an operator to a worker. Linking twice is a no-op.
    async fn link(&self, user_id: UserId, worker_id: WorkerId) -> Result<(), StoreError>;

    /// Remove a link. Removing a missing link is a no-op.
    async fn unlink(&self, user_id: UserId, worker_id: WorkerId) -> Result<(), StoreError>;
}

/// Operator accounts.
#[async_trait]
pub trait UserDirectory: Send + Sync {
    async fn find_user(&self, id: UserId) -> Result<Option<User>, StoreError>;

    async fn find_user_by_name(&self, name: &str) -> Result<Option<User>, StoreError>;
}
