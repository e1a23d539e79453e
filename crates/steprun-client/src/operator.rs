//! Typed client for the operator and admin RPC surface.

use steprun_core::{TaskId, UserId, WorkerId};
use steprun_proto::routes;
use steprun_proto::user::{
    AddWorkerRequest, AddWorkerResponse, SendTaskRequest, SendTaskResponse, TaskStatusRequest,
    TaskStatusResponse, TokenRequest, UpdateWorkerRequest, UserListTaskRequest, UserListTaskResponse,
    UserLoginRequest, UserLoginResponse, WorkerRequest, WorkerSummary, WorkerUserRequest,
};

use crate::error::ClientError;
use crate::http::RpcClient;

/// Client used by operators and admins.
#[derive(Debug, Clone)]
pub struct OperatorClient {
    rpc: RpcClient,
}

impl OperatorClient {
    /// Create a new operator client for a coordinator base URL.
    pub fn new(base_url: &str) -> Self {
        Self {
            rpc: RpcClient::new(base_url),
        }
    }

    /// Access the underlying RPC client.
    pub fn rpc(&self) -> &RpcClient {
        &self.rpc
    }

    pub async fn login(&self, username: &str, password: &str) -> Result<UserLoginResponse, ClientError> {
        let request = UserLoginRequest {
            username: username.to_string(),
            password: password.to_string(),
        };
        self.rpc.call(routes::user::LOGIN, &request).await
    }

    pub async fn logout(&self, token: &str) -> Result<bool, ClientError> {
        self.rpc.call(routes::user::LOGOUT, &token_request(token)).await
    }

    pub async fn ping(&self, token: &str) -> Result<bool, ClientError> {
        self.rpc.call(routes::user::PING, &token_request(token)).await
    }

    pub async fn list_workers(&self, token: &str) -> Result<Vec<WorkerSummary>, ClientError> {
        self.rpc.call(routes::user::LIST_WORKER, &token_request(token)).await
    }

    pub async fn update_worker_name(
        &self,
        token: &str,
        worker_id: WorkerId,
        name: &str,
    ) -> Result<bool, ClientError> {
        let request = UpdateWorkerRequest {
            token: token.to_string(),
            worker_id,
            name: name.to_string(),
            desc: String::new(),
        };
        self.rpc.call(routes::user::UPDATE_WORKER_NAME, &request).await
    }

    pub async fn update_worker_desc(
        &self,
        token: &str,
        worker_id: WorkerId,
        desc: &str,
    ) -> Result<bool, ClientError> {
        let request = UpdateWorkerRequest {
            token: token.to_string(),
            worker_id,
            name: String::new(),
            desc: desc.to_string(),
        };
        self.rpc.call(routes::user::UPDATE_WORKER_DESC, &request).await
    }

    /// Send a task to a worker; returns the new task id.
    pub async fn send_task(
        &self,
        token: &str,
        worker_id: WorkerId,
        params: &str,
    ) -> Result<TaskId, ClientError> {
        let request = SendTaskRequest {
            token: token.to_string(),
            worker_id,
            params: params.to_string(),
        };
        let response: SendTaskResponse = self.rpc.call(routes::user::SEND_TASK, &request).await?;
        Ok(response.task_id)
    }

    pub async fn task_status(&self, token: &str, task_id: TaskId) -> Result<TaskStatusResponse, ClientError> {
        let request = TaskStatusRequest {
            token: token.to_string(),
            task_id,
        };
        self.rpc.call(routes::user::TASK_STATUS, &request).await
    }

    /// List a worker's tasks, newest first.
    pub async fn list_tasks(
        &self,
        token: &str,
        worker_id: WorkerId,
        offset: u64,
        limit: u64,
    ) -> Result<UserListTaskResponse, ClientError> {
        let request = UserListTaskRequest {
            token: token.to_string(),
            worker_id,
            offset,
            limit,
        };
        self.rpc.call(routes::user::LIST_TASK, &request).await
    }

    pub async fn add_worker(&self, token: &str, name: &str, desc: &str) -> Result<AddWorkerResponse, ClientError> {
        let request = AddWorkerRequest {
            token: token.to_string(),
            name: name.to_string(),
            desc: desc.to_string(),
        };
        self.rpc.call(routes::user::ADD_WORKER, &request).await
    }

    pub async fn enable_worker(&self, token: &str, worker_id: WorkerId) -> Result<bool, ClientError> {
        self.rpc
            .call(routes::user::ENABLE_WORKER, &worker_request(token, worker_id))
            .await
    }

    pub async fn disable_worker(&self, token: &str, worker_id: WorkerId) -> Result<bool, ClientError> {
        self.rpc
            .call(routes::user::DISABLE_WORKER, &worker_request(token, worker_id))
            .await
    }

    pub async fn remove_worker(&self, token: &str, worker_id: WorkerId) -> Result<bool, ClientError> {
        self.rpc
            .call(routes::user::REMOVE_WORKER, &worker_request(token, worker_id))
            .await
    }

    pub async fn add_worker_user(
        &self,
        token: &str,
        worker_id: WorkerId,
        user_id: UserId,
    ) -> Result<bool, ClientError> {
        let request = WorkerUserRequest {
            token: token.to_string(),
            worker_id,
            user_id,
        };
        self.rpc.call(routes::user::ADD_WORKER_USER, &request).await
    }

    pub async fn remove_worker_user(
        &self,
        token: &str,
        worker_id: WorkerId,
        user_id: UserId,
    ) -> Result<bool, ClientError> {
        let request = WorkerUserRequest {
            token: token.to_string(),
            worker_id,
            user_id,
        };
        self.rpc.call(routes::user::REMOVE_WORKER_USER, &request).await
    }
}

fn token_request(token: &str) -> TokenRequest {
    TokenRequest {
        token: token.to_string(),
    }
}

fn worker_request(token: &str, worker_id: WorkerId) -> WorkerRequest {
    WorkerRequest {
        token: token.to_string(),
        worker_id,
    }
}
