//! steprun Coordinator Library
//!
//! This crate provides the coordinator: the session registries, the task
//! store, the RPC services for agents and operators, and the HTTP router
//! that exposes them.

pub mod config;
pub mod crypto;
pub mod error;
pub mod http;
pub mod metrics;
pub mod service;
pub mod session;
pub mod state;
pub mod store;

pub use config::Config;
pub use error::RpcError;
pub use session::{MemorySessions, SessionStore};
pub use state::AppState;
pub use store::{MemoryStore, StoreError};
