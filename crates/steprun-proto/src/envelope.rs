//! Uniform response envelope.

use serde::{Deserialize, Serialize};

/// Every RPC response: an empty `error` and a `data` payload on success, or a
/// non-empty `error` and `null` data on failure.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Envelope<T> {
    #[serde(default)]
    pub error: String,
    pub data: Option<T>,
}

impl<T> Envelope<T> {
    /// Successful response carrying `data`.
    pub fn success(data: T) -> Self {
        Self {
            error: String::new(),
            data: Some(data),
        }
    }

    /// Failed response carrying an error message.
    pub fn failure(error: impl Into<String>) -> Self {
        Self {
            error: error.into(),
            data: None,
        }
    }

    /// Build an envelope from a handler result.
    pub fn from_result<E: std::fmt::Display>(result: Result<T, E>) -> Self {
        match result {
            Ok(data) => Self::success(data),
            Err(e) => Self::failure(e.to_string()),
        }
    }

    /// Returns true if this envelope carries an error.
    pub fn is_error(&self) -> bool {
        !self.error.is_empty()
    }
}
