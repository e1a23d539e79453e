//! HTTP request handlers outside the RPC surface.

mod health;

pub use health::{health_check, metrics_handler};
