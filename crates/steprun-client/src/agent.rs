//! Typed client for the agent RPC surface.

use steprun_core::{TaskId, WorkerId};
use steprun_proto::agent::{
    AcceptTaskRequest, AgentListTaskRequest, AgentListTaskResponse, AgentLoginRequest,
    AgentLoginResponse, FinishTaskRequest, UpdateTaskRequest,
};
use steprun_proto::routes;

use crate::error::ClientError;
use crate::http::RpcClient;

/// Client used by agents to pull and report on tasks.
#[derive(Debug, Clone)]
pub struct AgentClient {
    rpc: RpcClient,
}

impl AgentClient {
    /// Create a new agent client for a coordinator base URL.
    pub fn new(base_url: &str) -> Self {
        Self {
            rpc: RpcClient::new(base_url),
        }
    }

    /// Log in as a worker and return the session token.
    pub async fn login(&self, worker_id: WorkerId, worker_key: &str) -> Result<String, ClientError> {
        let request = AgentLoginRequest {
            worker_id,
            worker_key: worker_key.to_string(),
        };
        let response: AgentLoginResponse = self.rpc.call(routes::agent::LOGIN, &request).await?;
        Ok(response.token)
    }

    /// List the worker's unfinished tasks.
    pub async fn list_tasks(&self, token: &str) -> Result<AgentListTaskResponse, ClientError> {
        let request = AgentListTaskRequest {
            token: token.to_string(),
        };
        self.rpc.call(routes::agent::LIST_TASK, &request).await
    }

    /// Accept a task.
    pub async fn accept_task(&self, token: &str, task_id: TaskId) -> Result<bool, ClientError> {
        let request = AcceptTaskRequest {
            token: token.to_string(),
            task_id,
        };
        self.rpc.call(routes::agent::ACCEPT_TASK, &request).await
    }

    /// Persist a checkpoint and detail.
    pub async fn update_task(
        &self,
        token: &str,
        task_id: TaskId,
        progress: i32,
        detail: &str,
    ) -> Result<bool, ClientError> {
        let request = UpdateTaskRequest {
            token: token.to_string(),
            task_id,
            progress,
            detail: detail.to_string(),
        };
        self.rpc.call(routes::agent::UPDATE_TASK, &request).await
    }

    /// Report a final outcome.
    pub async fn finish_task(
        &self,
        token: &str,
        task_id: TaskId,
        success: bool,
        detail: &str,
    ) -> Result<bool, ClientError> {
        let request = FinishTaskRequest {
            token: token.to_string(),
            task_id,
            success,
            detail: detail.to_string(),
        };
        self.rpc.call(routes::agent::FINISH_TASK, &request).await
    }
}
