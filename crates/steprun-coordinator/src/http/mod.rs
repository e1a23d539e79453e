//! HTTP server for the coordinator.
//!
//! Provides endpoints for:
//! - Agent RPCs (`/v1/agent/*`)
//! - Operator and admin RPCs (`/v1/user/*`)
//! - Health check (`/health`)
//! - Prometheus metrics (`/metrics`)

use std::sync::Arc;

use axum::{routing::get, Router};
use tower_http::trace::TraceLayer;

use steprun_proto::routes;

use crate::service::{admin, agent, operator};
use crate::state::AppState;

mod handlers;
mod rpc;

pub use rpc::RpcRouter;

/// Create the HTTP router.
pub fn create_router(state: Arc<AppState>) -> Router {
    Router::<Arc<AppState>>::new()
        // Agent RPCs
        .rpc(routes::agent::LOGIN, agent::login)
        .rpc(routes::agent::LIST_TASK, agent::list_tasks)
        .rpc(routes::agent::ACCEPT_TASK, agent::accept_task)
        .rpc(routes::agent::UPDATE_TASK, agent::update_task)
        .rpc(routes::agent::FINISH_TASK, agent::finish_task)
        // Operator RPCs
        .rpc(routes::user::LOGIN, operator::login)
        .rpc(routes::user::LOGOUT, operator::logout)
        .rpc(routes::user::PING, operator::ping)
        .rpc(routes::user::LIST_WORKER, operator::list_workers)
        .rpc(routes::user::UPDATE_WORKER_NAME, operator::update_worker_name)
        .rpc(routes::user::UPDATE_WORKER_DESC, operator::update_worker_desc)
        .rpc(routes::user::SEND_TASK, operator::send_task)
        .rpc(routes::user::TASK_STATUS, operator::task_status)
        .rpc(routes::user::LIST_TASK, operator::list_tasks)
        // Admin RPCs
        .rpc(routes::user::ADD_WORKER, admin::add_worker)
        .rpc(routes::user::ENABLE_WORKER, admin::enable_worker)
        .rpc(routes::user::DISABLE_WORKER, admin::disable_worker)
        .rpc(routes::user::REMOVE_WORKER, admin::remove_worker)
        .rpc(routes::user::ADD_WORKER_USER, admin::add_worker_user)
        .rpc(routes::user::REMOVE_WORKER_USER, admin::remove_worker_user)
        // Observability routes
        .route("/health", get(handlers::health_check))
        .route("/metrics", get(handlers::metrics_handler))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
