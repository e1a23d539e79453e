//! HTTP RPC clients for the steprun coordinator.
//!
//! Provides a generic envelope-aware JSON client plus typed wrappers for the
//! agent and operator RPC surfaces.

pub mod agent;
pub mod error;
pub mod http;
pub mod operator;

pub use agent::AgentClient;
pub use error::ClientError;
pub use http::RpcClient;
pub use operator::OperatorClient;
