//! Operator-facing RPCs: sessions, worker views and task submission.

use std::sync::Arc;

use tracing::info;

use steprun_core::NewTask;
use steprun_proto::user::{
    SendTaskRequest, SendTaskResponse, TaskRecord, TaskStatusRequest, TaskStatusResponse,
    TokenRequest, UpdateWorkerRequest, UserListTaskRequest, UserListTaskResponse,
    UserLoginRequest, UserLoginResponse, WorkerSummary,
};

use super::admin::validate_worker_name_desc;
use super::auth::{authorize_user, check_owner, user_name};
use crate::crypto::hash_secret;
use crate::error::RpcError;
use crate::state::AppState;

pub const MIN_USERNAME_LEN: usize = 1;
pub const MAX_USERNAME_LEN: usize = 32;
pub const MIN_PASSWORD_LEN: usize = 6;
pub const MAX_TASK_PARAMS_LEN: usize = 1024;

/// `user.Login`
pub async fn login(
    state: Arc<AppState>,
    req: UserLoginRequest,
) -> Result<UserLoginResponse, RpcError> {
    let username = req.username.trim();
    let password = req.password.trim();

    if !(MIN_USERNAME_LEN..=MAX_USERNAME_LEN).contains(&username.len()) {
        return Err(RpcError::Validation(format!(
            "invalid user name length {}, should in [{MIN_USERNAME_LEN}, {MAX_USERNAME_LEN}]",
            username.len()
        )));
    }
    if password.len() < MIN_PASSWORD_LEN {
        return Err(RpcError::Validation(format!(
            "invalid user password length: {}, should >= {MIN_PASSWORD_LEN}",
            password.len()
        )));
    }

    let user = state
        .users
        .find_user_by_name(username)
        .await?
        .ok_or(RpcError::UnknownUsername)?;

    if hash_secret(password) != user.password_hash {
        return Err(RpcError::IncorrectPassword);
    }
    if !user.status.is_enabled() {
        return Err(RpcError::UserDisabled);
    }

    let token = state.operator_sessions.login(user.id).await;
    info!(user_id = %user.id, name = %user.name, "Operator logged in");

    Ok(UserLoginResponse {
        user_id: user.id,
        token,
    })
}

/// `user.Logout`
pub async fn logout(state: Arc<AppState>, req: TokenRequest) -> Result<bool, RpcError> {
    let user = authorize_user(&state, &req.token).await?;
    state.operator_sessions.logout(user.id).await;
    info!(user_id = %user.id, "Operator logged out");
    Ok(true)
}

/// `user.Ping`
pub async fn ping(state: Arc<AppState>, req: TokenRequest) -> Result<bool, RpcError> {
    authorize_user(&state, &req.token).await?;
    Ok(true)
}

/// `user.ListWorkers`: every worker for the admin, linked workers otherwise.
pub async fn list_workers(
    state: Arc<AppState>,
    req: TokenRequest,
) -> Result<Vec<WorkerSummary>, RpcError> {
    let user = authorize_user(&state, &req.token).await?;

    let workers = if user.is_admin() {
        state.workers.list_workers().await?
    } else {
        state.workers.workers_for_user(user.id).await?
    };

    let mut summaries = Vec::with_capacity(workers.len());
    for worker in &workers {
        let users = state.workers.users_for_worker(worker.id).await?;
        summaries.push(WorkerSummary::from_worker(worker, users));
    }
    Ok(summaries)
}

/// `user.UpdateWorkerName`: rename an owned, enabled worker.
pub async fn update_worker_name(
    state: Arc<AppState>,
    req: UpdateWorkerRequest,
) -> Result<bool, RpcError> {
    let user = authorize_user(&state, &req.token).await?;
    let worker = state
        .workers
        .find_worker(req.worker_id)
        .await?
        .ok_or(RpcError::WorkerNotFound(req.worker_id))?;
    check_owner(&state, &user, worker.id).await?;
    if !worker.status.is_enabled() {
        return Err(RpcError::WorkerDisabled);
    }

    let name = req.name.trim();
    if name.is_empty() || name == worker.name {
        return Ok(true);
    }
    validate_worker_name_desc(name, &worker.desc)?;

    if let Some(other) = state.workers.find_worker_by_name(name).await? {
        if other.id != worker.id {
            return Err(RpcError::Validation("duplicate worker name".to_string()));
        }
    }

    state.workers.update_worker(worker.id, name, &worker.desc).await?;
    info!(worker_id = %worker.id, name = %name, "Worker renamed");
    Ok(true)
}

/// `user.UpdateWorkerDesc`: replace an owned, enabled worker's description.
pub async fn update_worker_desc(
    state: Arc<AppState>,
    req: UpdateWorkerRequest,
) -> Result<bool, RpcError> {
    let user = authorize_user(&state, &req.token).await?;
    let worker = state
        .workers
        .find_worker(req.worker_id)
        .await?
        .ok_or(RpcError::WorkerNotFound(req.worker_id))?;
    check_owner(&state, &user, worker.id).await?;
    if !worker.status.is_enabled() {
        return Err(RpcError::WorkerDisabled);
    }

    let desc = req.desc.trim();
    if desc.is_empty() || desc == worker.desc {
        return Ok(true);
    }
    validate_worker_name_desc(&worker.name, desc)?;

    state.workers.update_worker(worker.id, &worker.name, desc).await?;
    Ok(true)
}

/// `user.SendTask`: queue a task for an owned, enabled worker.
pub async fn send_task(
    state: Arc<AppState>,
    req: SendTaskRequest,
) -> Result<SendTaskResponse, RpcError> {
    let user = authorize_user(&state, &req.token).await?;

    let params = req.params.trim();
    if params.len() > MAX_TASK_PARAMS_LEN {
        return Err(RpcError::Validation(format!(
            "invalid task params length: {}, should <= {MAX_TASK_PARAMS_LEN}",
            params.len()
        )));
    }

    let worker = state
        .workers
        .find_worker(req.worker_id)
        .await?
        .ok_or(RpcError::WorkerNotFound(req.worker_id))?;
    check_owner(&state, &user, worker.id).await?;
    if !worker.status.is_enabled() {
        return Err(RpcError::WorkerDisabled);
    }

    let task = state
        .tasks
        .insert_task(NewTask::new(worker.id, user.id, params))
        .await?;
    info!(task_id = %task.id, worker_id = %worker.id, user_id = %user.id, "Task sent");

    Ok(SendTaskResponse { task_id: task.id })
}

/// `user.TaskStatus`
pub async fn task_status(
    state: Arc<AppState>,
    req: TaskStatusRequest,
) -> Result<TaskStatusResponse, RpcError> {
    let user = authorize_user(&state, &req.token).await?;
    let task = state
        .tasks
        .find_task(req.task_id)
        .await?
        .ok_or(RpcError::TaskNotFound(req.task_id))?;
    check_owner(&state, &user, task.worker_id).await?;

    Ok(TaskStatusResponse::from(&task))
}

/// `user.ListTasks`: a page of a worker's tasks, newest first.
pub async fn list_tasks(
    state: Arc<AppState>,
    req: UserListTaskRequest,
) -> Result<UserListTaskResponse, RpcError> {
    let user = authorize_user(&state, &req.token).await?;
    if state.workers.find_worker(req.worker_id).await?.is_none() {
        return Err(RpcError::WorkerNotFound(req.worker_id));
    }
    check_owner(&state, &user, req.worker_id).await?;

    let total = state.tasks.count_tasks(req.worker_id).await?;
    let tasks = state
        .tasks
        .list_tasks(req.worker_id, req.offset, req.limit)
        .await?;

    let mut records = Vec::with_capacity(tasks.len());
    for task in &tasks {
        let creator = user_name(&state, task.creator_id).await?;
        records.push(TaskRecord::from_task(task, creator));
    }

    Ok(UserListTaskResponse {
        total,
        tasks: records,
    })
}
