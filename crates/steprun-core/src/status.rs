//! Status enums for Tasks, Workers, and Users.
//!
//! Statuses travel as their numeric codes so that stored rows and wire
//! messages stay compatible with existing deployments.

use serde::{Deserialize, Serialize};

use crate::CoreError;

/// Status of a Task.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "i8", into = "i8")]
pub enum TaskStatus {
    /// Task created by an operator, not yet picked up by an agent.
    #[default]
    Record,
    /// Task accepted by its agent and in progress.
    Accepted,
    /// Task finished with a failure.
    Failed,
    /// Task finished successfully.
    Success,
}

impl TaskStatus {
    /// Numeric status code.
    pub const fn code(self) -> i8 {
        match self {
            Self::Record => 0,
            Self::Accepted => 1,
            Self::Failed => 20,
            Self::Success => 50,
        }
    }

    /// Returns true if the task is in a terminal state.
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Failed | Self::Success)
    }

    /// Returns true if the task still needs work from its agent.
    pub fn is_unfinished(&self) -> bool {
        !self.is_terminal()
    }

    /// Lowercase name used in logs and metrics labels.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Record => "record",
            Self::Accepted => "accepted",
            Self::Failed => "failed",
            Self::Success => "success",
        }
    }
}

impl TryFrom<i8> for TaskStatus {
    type Error = CoreError;

    fn try_from(code: i8) -> Result<Self, Self::Error> {
        match code {
            0 => Ok(Self::Record),
            1 => Ok(Self::Accepted),
            20 => Ok(Self::Failed),
            50 => Ok(Self::Success),
            other => Err(CoreError::InvalidTaskStatus(other)),
        }
    }
}

impl From<TaskStatus> for i8 {
    fn from(status: TaskStatus) -> Self {
        status.code()
    }
}

/// Status of a registered Worker identity.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "i8", into = "i8")]
pub enum WorkerStatus {
    /// Worker may not log in or receive tasks.
    #[default]
    Disabled,
    /// Worker is active.
    Enabled,
}

impl WorkerStatus {
    /// Returns true if the worker may log in and receive tasks.
    pub fn is_enabled(&self) -> bool {
        matches!(self, Self::Enabled)
    }
}

impl TryFrom<i8> for WorkerStatus {
    type Error = CoreError;

    fn try_from(code: i8) -> Result<Self, Self::Error> {
        match code {
            0 => Ok(Self::Disabled),
            1 => Ok(Self::Enabled),
            other => Err(CoreError::InvalidWorkerStatus(other)),
        }
    }
}

impl From<WorkerStatus> for i8 {
    fn from(status: WorkerStatus) -> Self {
        match status {
            WorkerStatus::Disabled => 0,
            WorkerStatus::Enabled => 1,
        }
    }
}

/// Status of an operator account.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "i8", into = "i8")]
pub enum UserStatus {
    #[default]
    Disabled,
    Enabled,
}

impl UserStatus {
    /// Returns true if the operator may log in.
    pub fn is_enabled(&self) -> bool {
        matches!(self, Self::Enabled)
    }
}

impl TryFrom<i8> for UserStatus {
    type Error = CoreError;

    fn try_from(code: i8) -> Result<Self, Self::Error> {
        match code {
            0 => Ok(Self::Disabled),
            1 => Ok(Self::Enabled),
            other => Err(CoreError::InvalidUserStatus(other)),
        }
    }
}

impl From<UserStatus> for i8 {
    fn from(status: UserStatus) -> Self {
        match status {
            UserStatus::Disabled => 0,
            UserStatus::Enabled => 1,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_task_status_codes() {
        assert_eq!(serde_json::to_string(&TaskStatus::Record).unwrap(), "0");
        assert_eq!(serde_json::to_string(&TaskStatus::Accepted).unwrap(), "1");
        assert_eq!(serde_json::to_string(&TaskStatus::Failed).unwrap(), "20");
        assert_eq!(serde_json::to_string(&TaskStatus::Success).unwrap(), "50");

        let status: TaskStatus = serde_json::from_str("20").unwrap();
        assert_eq!(status, TaskStatus::Failed);
    }

    #[test]
    fn test_unknown_task_status_rejected() {
        assert!(serde_json::from_str::<TaskStatus>("3").is_err());
        assert!(matches!(
            TaskStatus::try_from(7),
            Err(CoreError::InvalidTaskStatus(7))
        ));
    }

    #[test]
    fn test_terminal_states() {
        assert!(!TaskStatus::Record.is_terminal());
        assert!(!TaskStatus::Accepted.is_terminal());
        assert!(TaskStatus::Failed.is_terminal());
        assert!(TaskStatus::Success.is_terminal());
    }

    #[test]
    fn test_unfinished_ordering() {
        // Unfinished tasks are exactly those at or below Accepted.
        for status in [
            TaskStatus::Record,
            TaskStatus::Accepted,
            TaskStatus::Failed,
            TaskStatus::Success,
        ] {
            assert_eq!(status.is_unfinished(), status <= TaskStatus::Accepted);
        }
    }
}
