//! Core domain errors.

use thiserror::Error;

/// Core domain errors for steprun.
#[derive(Debug, Error)]
pub enum CoreError {
    /// Task status code outside the known set.
    #[error("invalid task status: {0}")]
    InvalidTaskStatus(i8),

    /// Worker status code outside the known set.
    #[error("invalid worker status: {0}")]
    InvalidWorkerStatus(i8),

    /// User status code outside the known set.
    #[error("invalid user status: {0}")]
    InvalidUserStatus(i8),

    /// Invalid input.
    #[error("invalid input: {0}")]
    InvalidInput(String),
}
