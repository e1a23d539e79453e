//! Agent-facing RPCs: login, polling and lifecycle reports.

use std::sync::Arc;

use tracing::{debug, info, warn};

use steprun_core::{lifecycle, Task, TaskId, Transition, Worker, MAX_TASK_DETAIL_LEN};
use steprun_proto::agent::{
    AcceptTaskRequest, AgentListTaskRequest, AgentListTaskResponse, AgentLoginRequest,
    AgentLoginResponse, AgentTask, FinishTaskRequest, UpdateTaskRequest,
};

use super::auth::authorize_agent;
use crate::error::RpcError;
use crate::state::AppState;

/// `agent.Login`: exchange a worker id and key for a session token.
///
/// The key and the enabled flag are checked before any existing session is
/// reused, so a live token is never handed to a caller with a wrong key.
pub async fn login(
    state: Arc<AppState>,
    req: AgentLoginRequest,
) -> Result<AgentLoginResponse, RpcError> {
    let worker = state
        .workers
        .find_worker(req.worker_id)
        .await?
        .ok_or(RpcError::WorkerNotFound(req.worker_id))?;

    if !worker.key_matches(&req.worker_key) {
        warn!(worker_id = %worker.id, "Agent login with incorrect key");
        return Err(RpcError::IncorrectWorkerKey);
    }
    if !worker.status.is_enabled() {
        return Err(RpcError::WorkerDisabled);
    }

    let token = state.agent_sessions.login(worker.id).await;
    info!(worker_id = %worker.id, name = %worker.name, "Agent logged in");

    Ok(AgentLoginResponse { token })
}

/// `agent.ListTasks`: the caller's tasks in `Record` or `Accepted`.
pub async fn list_tasks(
    state: Arc<AppState>,
    req: AgentListTaskRequest,
) -> Result<AgentListTaskResponse, RpcError> {
    let worker = authorize_agent(&state, &req.token).await?;

    let tasks: Vec<AgentTask> = state
        .tasks
        .unfinished_tasks(worker.id)
        .await?
        .iter()
        .map(AgentTask::from)
        .collect();

    Ok(AgentListTaskResponse {
        total: tasks.len() as u64,
        tasks,
    })
}

/// `agent.AcceptTask`: `Record -> Accepted`, idempotent on `Accepted`.
pub async fn accept_task(state: Arc<AppState>, req: AcceptTaskRequest) -> Result<bool, RpcError> {
    let worker = authorize_agent(&state, &req.token).await?;
    let task = find_own_task(&state, &worker, req.task_id).await?;

    let transition = lifecycle::accept(&task)?;
    commit(&state, &task, transition).await?;

    info!(task_id = %task.id, worker_id = %worker.id, "Task accepted");
    Ok(true)
}

/// `agent.UpdateTask`: record a new checkpoint and detail.
pub async fn update_task(state: Arc<AppState>, req: UpdateTaskRequest) -> Result<bool, RpcError> {
    let worker = authorize_agent(&state, &req.token).await?;
    let detail = checked_detail(&req.detail)?;
    let task = find_own_task(&state, &worker, req.task_id).await?;

    let transition = lifecycle::update_progress(&task, req.progress, detail)?;
    commit(&state, &task, transition).await?;

    debug!(task_id = %task.id, progress = req.progress, "Task progress updated");
    Ok(true)
}

/// `agent.FinishTask`: `Accepted -> Success | Failed`.
pub async fn finish_task(state: Arc<AppState>, req: FinishTaskRequest) -> Result<bool, RpcError> {
    let worker = authorize_agent(&state, &req.token).await?;
    let detail = checked_detail(&req.detail)?;
    let task = find_own_task(&state, &worker, req.task_id).await?;

    let transition = lifecycle::finish(&task, req.success, detail)?;
    let changed = commit(&state, &task, transition).await?;

    if changed {
        info!(task_id = %task.id, success = req.success, "Task finished");
    }
    Ok(true)
}

/// Trim a reported detail and reject it if it is still too long.
fn checked_detail(detail: &str) -> Result<&str, RpcError> {
    let detail = detail.trim();
    if detail.len() > MAX_TASK_DETAIL_LEN {
        return Err(RpcError::DetailTooLong(detail.len()));
    }
    Ok(detail)
}

/// Load a task addressed to `worker`. Other workers' tasks are reported as
/// missing.
async fn find_own_task(state: &AppState, worker: &Worker, id: TaskId) -> Result<Task, RpcError> {
    match state.tasks.find_task(id).await? {
        Some(task) if task.worker_id == worker.id => Ok(task),
        _ => Err(RpcError::TaskNotFound(id)),
    }
}

/// Persist a transition. Returns whether anything was written.
async fn commit(state: &AppState, task: &Task, transition: Transition) -> Result<bool, RpcError> {
    match transition {
        Transition::Unchanged => Ok(false),
        Transition::Apply(update) => {
            state.tasks.update_task(task.id, update).await?;
            Ok(true)
        }
    }
}
