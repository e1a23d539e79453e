//! steprun Agent Library
//!
//! The agent polls the coordinator for tasks addressed to its worker, runs
//! each task's steps as child processes, and reports progress back after
//! every step.

pub mod agent;
pub mod catalog;
pub mod config;
pub mod executor;

pub use agent::{Agent, AgentError, Coordinator};
pub use catalog::{Catalog, Plan, ResolveError};
pub use config::{AgentConfig, ConfigError};
pub use executor::{Executor, StepError};
