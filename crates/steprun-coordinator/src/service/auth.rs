//! Token checks shared by the services.

use steprun_core::{User, UserId, Worker, WorkerId};

use crate::error::RpcError;
use crate::state::AppState;

/// Resolve an agent token to its enabled worker.
pub(crate) async fn authorize_agent(state: &AppState, token: &str) -> Result<Worker, RpcError> {
    let worker_id = state
        .agent_sessions
        .validate(token)
        .await
        .ok_or(RpcError::InvalidAgentToken)?;

    let worker = state
        .workers
        .find_worker(worker_id)
        .await?
        .ok_or(RpcError::WorkerNotFound(worker_id))?;

    if !worker.status.is_enabled() {
        return Err(RpcError::WorkerDisabled);
    }
    Ok(worker)
}

/// Resolve an operator token to its enabled account.
pub(crate) async fn authorize_user(state: &AppState, token: &str) -> Result<User, RpcError> {
    let user_id = state
        .operator_sessions
        .validate(token)
        .await
        .ok_or(RpcError::InvalidUserToken)?;

    let user = state
        .users
        .find_user(user_id)
        .await?
        .ok_or(RpcError::UserNotFound(user_id))?;

    if !user.status.is_enabled() {
        return Err(RpcError::UserDisabled);
    }
    Ok(user)
}

/// Like [`authorize_user`], but only the admin passes.
pub(crate) async fn authorize_admin(state: &AppState, token: &str) -> Result<User, RpcError> {
    let user = authorize_user(state, token).await?;
    if !user.is_admin() {
        return Err(RpcError::PermissionDenied);
    }
    Ok(user)
}

/// Check that `user` may act on `worker_id`. The admin owns every worker.
pub(crate) async fn check_owner(
    state: &AppState,
    user: &User,
    worker_id: WorkerId,
) -> Result<(), RpcError> {
    if user.is_admin() || state.workers.is_linked(user.id, worker_id).await? {
        return Ok(());
    }
    Err(RpcError::NotOwner)
}

/// Resolve a user id to a display name, empty if the account is gone.
pub(crate) async fn user_name(state: &AppState, user_id: UserId) -> Result<String, RpcError> {
    Ok(state
        .users
        .find_user(user_id)
        .await?
        .map(|u| u.name)
        .unwrap_or_default())
}
