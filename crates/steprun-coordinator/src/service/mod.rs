//! RPC service implementations.
//!
//! Each handler is a plain async function taking the shared [`AppState`]
//! and a typed request, returning a typed response or an [`RpcError`].
//!
//! [`AppState`]: crate::state::AppState
//! [`RpcError`]: crate::error::RpcError

pub mod admin;
pub mod agent;
mod auth;
pub mod operator;

#[cfg(test)]
pub(crate) mod testing;
