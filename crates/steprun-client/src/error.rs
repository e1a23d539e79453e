//! Error types for the RPC clients.

use steprun_proto::{ERR_INVALID_AGENT_TOKEN, ERR_INVALID_USER_TOKEN};
use thiserror::Error;

/// Errors that can occur when calling the coordinator.
#[derive(Debug, Error)]
pub enum ClientError {
    /// Transport-level HTTP failure.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// The coordinator answered with a non-success HTTP status.
    #[error("HTTP {status}: {path}")]
    Status { status: u16, path: String },

    /// The coordinator rejected the call; carries the envelope error text.
    #[error("{0}")]
    Rpc(String),

    /// Serialization/deserialization error.
    #[error("serialization error: {0}")]
    Serialization(String),

    /// A successful envelope arrived without a payload.
    #[error("missing response data: {0}")]
    MissingData(String),
}

impl ClientError {
    /// Returns true if the coordinator no longer recognizes the agent token.
    pub fn is_invalid_agent_token(&self) -> bool {
        matches!(self, Self::Rpc(msg) if msg == ERR_INVALID_AGENT_TOKEN)
    }

    /// Returns true if the coordinator no longer recognizes the operator token.
    pub fn is_invalid_user_token(&self) -> bool {
        matches!(self, Self::Rpc(msg) if msg == ERR_INVALID_USER_TOKEN)
    }
}
