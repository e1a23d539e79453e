//! Task lifecycle state machine.
//!
//! ```text
//! Record -> Accepted -> { Success, Failed }
//! ```
//!
//! Each function inspects the task's current stored row and decides what the
//! coordinator should write. They never touch storage themselves, so the
//! rules can be exercised without a store. Terminal states are never left.

use thiserror::Error;

use crate::task::{truncate_detail, Task, TaskUpdate};
use crate::TaskStatus;

/// Rejected lifecycle transitions.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LifecycleError {
    #[error("can't accept a finished task")]
    AcceptFinished,

    #[error("task must accept first")]
    NotAccepted,

    #[error("can't update a finished task")]
    UpdateFinished,

    #[error("task has finished already")]
    AlreadyFinished,
}

/// Outcome of a legal lifecycle call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Transition {
    /// The call succeeds without writing anything (idempotent repeat).
    Unchanged,
    /// The call succeeds and the store must apply this update.
    Apply(TaskUpdate),
}

/// Accept a task for execution.
pub fn accept(task: &Task) -> Result<Transition, LifecycleError> {
    match task.status {
        TaskStatus::Record => Ok(Transition::Apply(TaskUpdate {
            status: Some(TaskStatus::Accepted),
            ..Default::default()
        })),
        TaskStatus::Accepted => Ok(Transition::Unchanged),
        TaskStatus::Failed | TaskStatus::Success => Err(LifecycleError::AcceptFinished),
    }
}

/// Record a new checkpoint and detail for an accepted task.
///
/// Negative indexes clamp to 0, and the stored checkpoint never moves
/// backwards.
pub fn update_progress(
    task: &Task,
    progress: i32,
    detail: &str,
) -> Result<Transition, LifecycleError> {
    match task.status {
        TaskStatus::Record => Err(LifecycleError::NotAccepted),
        TaskStatus::Failed | TaskStatus::Success => Err(LifecycleError::UpdateFinished),
        TaskStatus::Accepted => {
            let progress = progress.max(0).max(task.progress);
            Ok(Transition::Apply(TaskUpdate {
                status: None,
                progress: Some(progress),
                detail: Some(truncate_detail(detail).to_string()),
            }))
        }
    }
}

/// Finish an accepted task.
///
/// Re-finishing a terminal task is accepted only when both the outcome and
/// the detail match what is stored.
pub fn finish(task: &Task, success: bool, detail: &str) -> Result<Transition, LifecycleError> {
    let detail = truncate_detail(detail);

    match task.status {
        TaskStatus::Record => Err(LifecycleError::NotAccepted),
        TaskStatus::Success => {
            if success && detail == task.detail {
                Ok(Transition::Unchanged)
            } else {
                Err(LifecycleError::AlreadyFinished)
            }
        }
        TaskStatus::Failed => {
            if !success && detail == task.detail {
                Ok(Transition::Unchanged)
            } else {
                Err(LifecycleError::AlreadyFinished)
            }
        }
        TaskStatus::Accepted => {
            let status = if success {
                TaskStatus::Success
            } else {
                TaskStatus::Failed
            };
            // An empty success detail keeps the last step's output.
            let detail = if success && detail.is_empty() {
                None
            } else {
                Some(detail.to_string())
            };
            Ok(Transition::Apply(TaskUpdate {
                status: Some(status),
                progress: None,
                detail,
            }))
        }
    }
}
