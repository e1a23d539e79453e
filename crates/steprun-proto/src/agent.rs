//! Agent-facing RPC messages.

use serde::{Deserialize, Serialize};
use steprun_core::{TaskId, TaskStatus, WorkerId};

/// `agent.Login` request.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AgentLoginRequest {
    pub worker_id: WorkerId,
    pub worker_key: String,
}

/// `agent.Login` response.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AgentLoginResponse {
    pub token: String,
}

/// `agent.ListTasks` request.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AgentListTaskRequest {
    pub token: String,
}

/// An unfinished task as seen by its agent.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AgentTask {
    pub id: TaskId,
    pub params: String,
    pub status: TaskStatus,
    pub progress: i32,
    /// Unix seconds.
    pub created_at: i64,
}

/// `agent.ListTasks` response.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AgentListTaskResponse {
    pub total: u64,
    pub tasks: Vec<AgentTask>,
}

/// `agent.AcceptTask` request.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AcceptTaskRequest {
    pub token: String,
    pub task_id: TaskId,
}

/// `agent.UpdateTask` request.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UpdateTaskRequest {
    pub token: String,
    pub task_id: TaskId,
    pub progress: i32,
    pub detail: String,
}

/// `agent.FinishTask` request.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FinishTaskRequest {
    pub token: String,
    pub task_id: TaskId,
    pub success: bool,
    pub detail: String,
}
