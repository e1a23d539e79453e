//! Worker and operator records.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::{UserId, UserStatus, WorkerId, WorkerStatus};

/// Name of the operator account with administrative rights.
pub const ADMIN_USERNAME: &str = "admin";

/// A registered worker identity.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Worker {
    /// Unique worker identifier.
    pub id: WorkerId,

    /// Secret key agents present at login.
    pub key: String,

    /// Unique human-readable name.
    pub name: String,

    /// Free-form description.
    pub desc: String,

    /// Whether the worker may log in and receive tasks.
    pub status: WorkerStatus,

    /// When the worker was registered.
    pub created_at: DateTime<Utc>,
}

impl Worker {
    /// Check the presented key against the stored one.
    pub fn key_matches(&self, key: &str) -> bool {
        self.key == key
    }
}

/// An operator account.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct User {
    pub id: UserId,
    pub name: String,
    /// Hex-encoded SHA-256 of the password.
    pub password_hash: String,
    pub detail: String,
    pub status: UserStatus,
}

impl User {
    /// Returns true if this operator has administrative rights.
    pub fn is_admin(&self) -> bool {
        self.name == ADMIN_USERNAME
    }
}
