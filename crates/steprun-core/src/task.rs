//! Task records and detail handling.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::{TaskId, TaskStatus, UserId, WorkerId};

/// Maximum length in bytes of a task detail string.
///
/// Shared by the coordinator and the agent; both sides truncate to it.
pub const MAX_TASK_DETAIL_LEN: usize = 32 * 1024;

/// A Task as persisted by the external task store.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Task {
    /// Unique task identifier.
    pub id: TaskId,

    /// Worker that owns this task.
    pub worker_id: WorkerId,

    /// Operator who sent this task.
    pub creator_id: UserId,

    /// Raw parameter string: definition name followed by positional arguments.
    pub params: String,

    /// Current lifecycle status.
    pub status: TaskStatus,

    /// Index of the next step to execute.
    pub progress: i32,

    /// Outcome text of the most recent operation.
    pub detail: String,

    /// When the task was created.
    pub created_at: DateTime<Utc>,

    /// When the task row was last changed.
    pub updated_at: DateTime<Utc>,
}

impl Task {
    /// Apply a lifecycle update to this row.
    pub fn apply(&mut self, update: &TaskUpdate) {
        if let Some(status) = update.status {
            self.status = status;
        }
        if let Some(progress) = update.progress {
            self.progress = progress;
        }
        if let Some(detail) = &update.detail {
            self.detail = detail.clone();
        }
        self.updated_at = Utc::now();
    }
}

/// Fields needed to insert a new task row.
#[derive(Debug, Clone, PartialEq)]
pub struct NewTask {
    pub worker_id: WorkerId,
    pub creator_id: UserId,
    pub params: String,
}

impl NewTask {
    /// Create a new task insert for a worker.
    pub fn new(worker_id: WorkerId, creator_id: UserId, params: impl Into<String>) -> Self {
        Self {
            worker_id,
            creator_id,
            params: params.into(),
        }
    }
}

/// A partial row update; `None` fields are left untouched.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TaskUpdate {
    pub status: Option<TaskStatus>,
    pub progress: Option<i32>,
    pub detail: Option<String>,
}

/// Truncate a detail string to [`MAX_TASK_DETAIL_LEN`] bytes.
///
/// The cut lands on the largest UTF-8 character boundary that fits.
pub fn truncate_detail(detail: &str) -> &str {
    if detail.len() <= MAX_TASK_DETAIL_LEN {
        return detail;
    }

    let mut end = MAX_TASK_DETAIL_LEN;
    while !detail.is_char_boundary(end) {
        end -= 1;
    }
    &detail[..end]
}
