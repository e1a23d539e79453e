//! Converters between domain records and wire messages.

use steprun_core::{Task, UserId, Worker};

use crate::agent::AgentTask;
use crate::user::{TaskRecord, TaskStatusResponse, WorkerSummary};

impl From<&Task> for AgentTask {
    fn from(task: &Task) -> Self {
        Self {
            id: task.id,
            params: task.params.clone(),
            status: task.status,
            progress: task.progress,
            created_at: task.created_at.timestamp(),
        }
    }
}

impl From<&Task> for TaskStatusResponse {
    fn from(task: &Task) -> Self {
        Self {
            status: task.status,
            progress: task.progress,
            detail: task.detail.clone(),
        }
    }
}

impl TaskRecord {
    /// Build an operator view of a task; `creator` is the sender's name.
    pub fn from_task(task: &Task, creator: impl Into<String>) -> Self {
        Self {
            id: task.id,
            params: task.params.clone(),
            creator: creator.into(),
            status: task.status,
            progress: task.progress,
            detail: task.detail.clone(),
            created_at: task.created_at.timestamp(),
            updated_at: task.updated_at.timestamp(),
        }
    }
}

impl WorkerSummary {
    /// Build an operator view of a worker and its linked operators.
    pub fn from_worker(worker: &Worker, users: Vec<UserId>) -> Self {
        Self {
            id: worker.id,
            key: worker.key.clone(),
            name: worker.name.clone(),
            desc: worker.desc.clone(),
            status: worker.status,
            created_at: worker.created_at.timestamp(),
            users,
        }
    }
}
