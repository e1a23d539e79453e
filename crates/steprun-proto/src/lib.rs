//! Wire contract for the steprun RPC surface.
//!
//! This crate contains:
//! - Request/response messages for the agent and operator RPCs
//! - The uniform `{error, data}` response envelope
//! - Route paths shared by the coordinator and its clients
//! - Converters between domain records and wire messages

pub mod agent;
pub mod convert;
pub mod envelope;
pub mod routes;
pub mod user;

pub use envelope::Envelope;

/// Error text returned for an unknown or revoked agent token.
///
/// Agents match on it to decide when to log in again.
pub const ERR_INVALID_AGENT_TOKEN: &str = "invalid agent token";

/// Error text returned for an unknown or revoked operator token.
pub const ERR_INVALID_USER_TOKEN: &str = "invalid user token";
