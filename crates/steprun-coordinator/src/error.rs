//! RPC error type.
//!
//! The `Display` text of each variant is what clients see in the response
//! envelope's `error` field, so agents can match on it.

use thiserror::Error;

use steprun_core::{LifecycleError, TaskId, UserId, WorkerId, MAX_TASK_DETAIL_LEN};
use steprun_proto::{ERR_INVALID_AGENT_TOKEN, ERR_INVALID_USER_TOKEN};

use crate::store::StoreError;

/// Errors returned by RPC handlers.
#[derive(Debug, Error)]
pub enum RpcError {
    #[error("{}", ERR_INVALID_AGENT_TOKEN)]
    InvalidAgentToken,

    #[error("{}", ERR_INVALID_USER_TOKEN)]
    InvalidUserToken,

    #[error("incorrect worker key")]
    IncorrectWorkerKey,

    #[error("username not exist")]
    UnknownUsername,

    #[error("incorrect password")]
    IncorrectPassword,

    #[error("worker disabled")]
    WorkerDisabled,

    #[error("user disabled")]
    UserDisabled,

    #[error("permission denied")]
    PermissionDenied,

    #[error("you don't own this worker")]
    NotOwner,

    #[error("worker not found: {0}")]
    WorkerNotFound(WorkerId),

    #[error("user not found: {0}")]
    UserNotFound(UserId),

    #[error("task not found: {0}")]
    TaskNotFound(TaskId),

    #[error("worker {0} already existed")]
    WorkerExists(String),

    #[error("invalid task detail length: {0}, should <= {max}", max = MAX_TASK_DETAIL_LEN)]
    DetailTooLong(usize),

    #[error("{0}")]
    Validation(String),

    #[error("bind args failed, {0}")]
    BadRequest(String),

    #[error(transparent)]
    Lifecycle(#[from] LifecycleError),

    #[error("storage error: {0}")]
    Storage(#[from] StoreError),
}

impl RpcError {
    /// Coarse category used in logs.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::InvalidAgentToken
            | Self::InvalidUserToken
            | Self::IncorrectWorkerKey
            | Self::UnknownUsername
            | Self::IncorrectPassword => "authentication",
            Self::WorkerDisabled | Self::UserDisabled => "disabled",
            Self::PermissionDenied | Self::NotOwner => "permission",
            Self::WorkerNotFound(_) | Self::UserNotFound(_) | Self::TaskNotFound(_) => "not_found",
            Self::WorkerExists(_)
            | Self::DetailTooLong(_)
            | Self::Validation(_)
            | Self::BadRequest(_) => "validation",
            Self::Lifecycle(_) => "state",
            Self::Storage(_) => "storage",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_wire_messages() {
        assert_eq!(RpcError::InvalidAgentToken.to_string(), "invalid agent token");
        assert_eq!(RpcError::InvalidUserToken.to_string(), "invalid user token");
        assert_eq!(RpcError::NotOwner.to_string(), "you don't own this worker");
        assert_eq!(
            RpcError::DetailTooLong(40000).to_string(),
            "invalid task detail length: 40000, should <= 32768"
        );
        assert_eq!(
            RpcError::from(LifecycleError::NotAccepted).to_string(),
            "task must accept first"
        );
        assert_eq!(
            RpcError::WorkerExists("builder".to_string()).to_string(),
            "worker builder already existed"
        );
    }

    #[test]
    fn test_kind() {
        assert_eq!(RpcError::InvalidAgentToken.kind(), "authentication");
        assert_eq!(RpcError::from(LifecycleError::AcceptFinished).kind(), "state");
        assert_eq!(
            RpcError::from(StoreError::Unavailable("down".to_string())).kind(),
            "storage"
        );
    }
}
