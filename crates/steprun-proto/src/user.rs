//! Operator and admin RPC messages.

use serde::{Deserialize, Serialize};
use steprun_core::{TaskId, TaskStatus, UserId, WorkerId, WorkerStatus};

/// `user.Login` request.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserLoginRequest {
    pub username: String,
    pub password: String,
}

/// `user.Login` response.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserLoginResponse {
    pub user_id: UserId,
    pub token: String,
}

/// Request carrying only an operator token (logout, ping, list-worker).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TokenRequest {
    pub token: String,
}

/// A worker as shown to operators.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WorkerSummary {
    pub id: WorkerId,
    pub key: String,
    pub name: String,
    pub desc: String,
    pub status: WorkerStatus,
    /// Unix seconds.
    pub created_at: i64,
    /// Operators linked to this worker.
    pub users: Vec<UserId>,
}

/// `user.UpdateWorkerName` / `user.UpdateWorkerDesc` request.
///
/// Only the field matching the route is read; an empty value is a no-op.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UpdateWorkerRequest {
    pub token: String,
    pub worker_id: WorkerId,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub desc: String,
}

/// `user.SendTask` request.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SendTaskRequest {
    pub token: String,
    pub worker_id: WorkerId,
    pub params: String,
}

/// `user.SendTask` response.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SendTaskResponse {
    pub task_id: TaskId,
}

/// `user.TaskStatus` request.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TaskStatusRequest {
    pub token: String,
    pub task_id: TaskId,
}

/// `user.TaskStatus` response.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TaskStatusResponse {
    pub status: TaskStatus,
    pub progress: i32,
    pub detail: String,
}

/// `user.ListTasks` request.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserListTaskRequest {
    pub token: String,
    pub worker_id: WorkerId,
    #[serde(default)]
    pub offset: u64,
    #[serde(default)]
    pub limit: u64,
}

/// A task as shown to operators.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TaskRecord {
    pub id: TaskId,
    pub params: String,
    /// Name of the operator who sent the task.
    pub creator: String,
    pub status: TaskStatus,
    pub progress: i32,
    pub detail: String,
    /// Unix seconds.
    pub created_at: i64,
    /// Unix seconds.
    pub updated_at: i64,
}

/// `user.ListTasks` response.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct UserListTaskResponse {
    pub total: u64,
    pub tasks: Vec<TaskRecord>,
}

/// `user.AddWorker` request.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AddWorkerRequest {
    pub token: String,
    pub name: String,
    #[serde(default)]
    pub desc: String,
}

/// `user.AddWorker` response.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AddWorkerResponse {
    pub worker_id: WorkerId,
    pub worker_key: String,
}

/// Request naming a single worker (enable, disable, remove).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WorkerRequest {
    pub token: String,
    pub worker_id: WorkerId,
}

/// Request linking or unlinking an operator and a worker.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WorkerUserRequest {
    pub token: String,
    pub worker_id: WorkerId,
    pub user_id: UserId,
}
