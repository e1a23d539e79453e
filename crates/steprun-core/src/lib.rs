//! steprun Core Domain Types
//!
//! This crate contains pure domain types with no dependencies on:
//! - Network/HTTP
//! - Storage
//! - Runtime specifics
//!
//! All types here represent the core business domain of steprun: workers,
//! operators, tasks, task definitions, and the task lifecycle rules.

pub mod definition;
pub mod error;
pub mod ids;
pub mod lifecycle;
pub mod status;
pub mod task;
pub mod worker;

// Re-export commonly used types
pub use definition::{Step, TaskDefinition};
pub use error::CoreError;
pub use ids::{TaskId, UserId, WorkerId};
pub use lifecycle::{LifecycleError, Transition};
pub use status::{TaskStatus, UserStatus, WorkerStatus};
pub use task::{truncate_detail, NewTask, Task, TaskUpdate, MAX_TASK_DETAIL_LEN};
pub use worker::{User, Worker, ADMIN_USERNAME};
