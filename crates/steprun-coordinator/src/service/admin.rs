//! Admin-only RPCs: worker registration and operator links.

use std::sync::Arc;

use tracing::info;

use steprun_core::{WorkerId, WorkerStatus};
use steprun_proto::user::{AddWorkerRequest, AddWorkerResponse, WorkerRequest, WorkerUserRequest};

use super::auth::authorize_admin;
use crate::crypto::generate_token;
use crate::error::RpcError;
use crate::state::AppState;

pub const MIN_WORKER_NAME_LEN: usize = 1;
pub const MAX_WORKER_NAME_LEN: usize = 32;
pub const MAX_WORKER_DESC_LEN: usize = 1024;

pub(crate) fn validate_worker_name_desc(name: &str, desc: &str) -> Result<(), RpcError> {
    if !(MIN_WORKER_NAME_LEN..=MAX_WORKER_NAME_LEN).contains(&name.len()) {
        return Err(RpcError::Validation(format!(
            "invalid worker name length {}, should in [{MIN_WORKER_NAME_LEN}, {MAX_WORKER_NAME_LEN}]",
            name.len()
        )));
    }
    if desc.len() > MAX_WORKER_DESC_LEN {
        return Err(RpcError::Validation(format!(
            "invalid worker desc length: {}, should <= {MAX_WORKER_DESC_LEN}",
            desc.len()
        )));
    }
    Ok(())
}

/// `user.AddWorker`: register a disabled worker with a fresh key.
///
/// Repeating the call with the same name and description returns the
/// existing worker.
pub async fn add_worker(
    state: Arc<AppState>,
    req: AddWorkerRequest,
) -> Result<AddWorkerResponse, RpcError> {
    authorize_admin(&state, &req.token).await?;

    let name = req.name.trim();
    let desc = req.desc.trim();
    validate_worker_name_desc(name, desc)?;

    if let Some(existing) = state.workers.find_worker_by_name(name).await? {
        if existing.desc != desc {
            return Err(RpcError::WorkerExists(name.to_string()));
        }
        return Ok(AddWorkerResponse {
            worker_id: existing.id,
            worker_key: existing.key,
        });
    }

    let worker = state
        .workers
        .insert_worker(name, desc, &generate_token())
        .await?;
    info!(worker_id = %worker.id, name = %worker.name, "Worker added");

    Ok(AddWorkerResponse {
        worker_id: worker.id,
        worker_key: worker.key,
    })
}

/// `user.EnableWorker`
pub async fn enable_worker(state: Arc<AppState>, req: WorkerRequest) -> Result<bool, RpcError> {
    set_status(&state, req, WorkerStatus::Enabled).await
}

/// `user.DisableWorker`
///
/// The agent's session stays registered, but every call it makes is
/// rejected until the worker is enabled again.
pub async fn disable_worker(state: Arc<AppState>, req: WorkerRequest) -> Result<bool, RpcError> {
    set_status(&state, req, WorkerStatus::Disabled).await
}

async fn set_status(
    state: &AppState,
    req: WorkerRequest,
    status: WorkerStatus,
) -> Result<bool, RpcError> {
    authorize_admin(state, &req.token).await?;

    let worker = state
        .workers
        .find_worker(req.worker_id)
        .await?
        .ok_or(RpcError::WorkerNotFound(req.worker_id))?;
    if worker.status == status {
        return Ok(true);
    }

    state.workers.set_worker_status(worker.id, status).await?;
    info!(worker_id = %worker.id, enabled = status.is_enabled(), "Worker status changed");
    Ok(true)
}

/// `user.RemoveWorker`: delete a worker and its links, then drop its agent
/// session. Unknown workers are already removed.
pub async fn remove_worker(state: Arc<AppState>, req: WorkerRequest) -> Result<bool, RpcError> {
    authorize_admin(&state, &req.token).await?;

    let Some(worker) = state.workers.find_worker(req.worker_id).await? else {
        return Ok(true);
    };

    state.workers.delete_worker(worker.id).await?;
    state.agent_sessions.evict(worker.id).await;
    info!(worker_id = %worker.id, name = %worker.name, "Worker removed");
    Ok(true)
}

/// `user.AddWorkerUser`: grant an operator ownership of a worker.
pub async fn add_worker_user(
    state: Arc<AppState>,
    req: WorkerUserRequest,
) -> Result<bool, RpcError> {
    authorize_admin(&state, &req.token).await?;
    let worker_id = check_link_ends(&state, &req).await?;

    if !state.workers.is_linked(req.user_id, worker_id).await? {
        state.workers.link(req.user_id, worker_id).await?;
        info!(worker_id = %worker_id, user_id = %req.user_id, "Operator linked to worker");
    }
    Ok(true)
}

/// `user.RemoveWorkerUser`: revoke an operator's ownership of a worker.
pub async fn remove_worker_user(
    state: Arc<AppState>,
    req: WorkerUserRequest,
) -> Result<bool, RpcError> {
    authorize_admin(&state, &req.token).await?;
    let worker_id = check_link_ends(&state, &req).await?;

    state.workers.unlink(req.user_id, worker_id).await?;
    Ok(true)
}

async fn check_link_ends(state: &AppState, req: &WorkerUserRequest) -> Result<WorkerId, RpcError> {
    if state.workers.find_worker(req.worker_id).await?.is_none() {
        return Err(RpcError::WorkerNotFound(req.worker_id));
    }
    if state.users.find_user(req.user_id).await?.is_none() {
        return Err(RpcError::UserNotFound(req.user_id));
    }
    Ok(req.worker_id)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::service::agent;
    use crate::service::testing::Fixture;
    use steprun_core::UserId;
    use steprun_proto::agent::{AgentListTaskRequest, AgentLoginRequest};

    fn add_req(token: &str, name: &str, desc: &str) -> AddWorkerRequest {
        AddWorkerRequest {
            token: token.to_string(),
            name: name.to_string(),
            desc: desc.to_string(),
        }
    }

    fn worker_req(token: &str, worker_id: WorkerId) -> WorkerRequest {
        WorkerRequest {
            token: token.to_string(),
            worker_id,
        }
    }

    #[tokio::test]
    async fn test_add_worker_is_idempotent_and_disabled() {
        let fx = Fixture::new().await;
        let token = fx.admin_login().await;

        let first = add_worker(fx.state.clone(), add_req(&token, " deployer ", "ships"))
            .await
            .unwrap();
        let second = add_worker(fx.state.clone(), add_req(&token, "deployer", "ships"))
            .await
            .unwrap();
        assert_eq!(first, second);
        assert_eq!(first.worker_key.len(), 43);

        let worker = fx
            .state
            .workers
            .find_worker(first.worker_id)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(worker.status, WorkerStatus::Disabled);

        let err = add_worker(fx.state.clone(), add_req(&token, "deployer", "other"))
            .await
            .unwrap_err();
        assert_eq!(err.to_string(), "worker deployer already existed");
    }

    #[tokio::test]
    async fn test_add_worker_validation() {
        let fx = Fixture::new().await;
        let token = fx.admin_login().await;

        let err = add_worker(fx.state.clone(), add_req(&token, "   ", ""))
            .await
            .unwrap_err();
        assert_eq!(err.to_string(), "invalid worker name length 0, should in [1, 32]");

        let long_desc = "d".repeat(MAX_WORKER_DESC_LEN + 1);
        let err = add_worker(fx.state.clone(), add_req(&token, "w", &long_desc))
            .await
            .unwrap_err();
        assert_eq!(err.kind(), "validation");
    }

    #[tokio::test]
    async fn test_non_admin_is_denied() {
        let fx = Fixture::new().await;
        let alice = fx.add_operator("alice", "secret1").await;
        let token = fx.login_as(&alice).await;

        let err = add_worker(fx.state.clone(), add_req(&token, "w", ""))
            .await
            .unwrap_err();
        assert_eq!(err.to_string(), "permission denied");

        let err = enable_worker(fx.state.clone(), worker_req(&token, fx.worker.id))
            .await
            .unwrap_err();
        assert!(matches!(err, RpcError::PermissionDenied));
    }

    #[tokio::test]
    async fn test_enable_and_disable_are_idempotent() {
        let fx = Fixture::new().await;
        let token = fx.admin_login().await;

        for _ in 0..2 {
            assert!(disable_worker(fx.state.clone(), worker_req(&token, fx.worker.id))
                .await
                .unwrap());
        }
        let login = AgentLoginRequest {
            worker_id: fx.worker.id,
            worker_key: fx.worker.key.clone(),
        };
        let err = agent::login(fx.state.clone(), login.clone()).await.unwrap_err();
        assert!(matches!(err, RpcError::WorkerDisabled));

        for _ in 0..2 {
            assert!(enable_worker(fx.state.clone(), worker_req(&token, fx.worker.id))
                .await
                .unwrap());
        }
        assert!(agent::login(fx.state.clone(), login).await.is_ok());
    }

    #[tokio::test]
    async fn test_remove_worker_evicts_agent_session() {
        let fx = Fixture::new().await;
        let token = fx.admin_login().await;
        let agent_token = fx.agent_login().await;

        assert!(remove_worker(fx.state.clone(), worker_req(&token, fx.worker.id))
            .await
            .unwrap());

        let err = agent::list_tasks(
            fx.state.clone(),
            AgentListTaskRequest { token: agent_token },
        )
        .await
        .unwrap_err();
        assert!(matches!(err, RpcError::InvalidAgentToken));
        assert_eq!(fx.state.agent_sessions.active_count().await, 0);

        // Removing again is a no-op.
        assert!(remove_worker(fx.state.clone(), worker_req(&token, fx.worker.id))
            .await
            .unwrap());
    }

    #[tokio::test]
    async fn test_worker_user_links() {
        let fx = Fixture::new().await;
        let token = fx.admin_login().await;
        let alice = fx.add_operator("alice", "secret1").await;

        let req = WorkerUserRequest {
            token: token.clone(),
            worker_id: fx.worker.id,
            user_id: alice.id,
        };
        assert!(add_worker_user(fx.state.clone(), req.clone()).await.unwrap());
        assert!(add_worker_user(fx.state.clone(), req.clone()).await.unwrap());
        assert_eq!(
            fx.state.workers.users_for_worker(fx.worker.id).await.unwrap(),
            vec![alice.id]
        );

        assert!(remove_worker_user(fx.state.clone(), req.clone()).await.unwrap());
        assert!(remove_worker_user(fx.state.clone(), req).await.unwrap());
        assert!(!fx
            .state
            .workers
            .is_linked(alice.id, fx.worker.id)
            .await
            .unwrap());

        let err = add_worker_user(
            fx.state.clone(),
            WorkerUserRequest {
                token,
                worker_id: fx.worker.id,
                user_id: UserId::new(99),
            },
        )
        .await
        .unwrap_err();
        assert!(matches!(err, RpcError::UserNotFound(_)));
    }
}
