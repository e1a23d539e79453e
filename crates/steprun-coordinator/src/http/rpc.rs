//! Typed RPC routes.
//!
//! Every RPC is a `POST` with a JSON body. The response is always HTTP 200
//! with an [`Envelope`]; failures, including bodies that do not parse, are
//! reported in its `error` field.

use std::future::Future;
use std::sync::Arc;

use axum::extract::rejection::JsonRejection;
use axum::extract::State;
use axum::routing::post;
use axum::{Json, Router};
use serde::de::DeserializeOwned;
use serde::Serialize;
use tracing::{debug, warn};

use steprun_proto::Envelope;

use crate::error::RpcError;
use crate::state::AppState;

/// Registers RPC handlers on a router.
pub trait RpcRouter {
    /// Route `POST path` to `handler`, decoding `Req` and encoding `Resp`.
    fn rpc<Req, Resp, F, Fut>(self, path: &'static str, handler: F) -> Self
    where
        Req: DeserializeOwned + Send + 'static,
        Resp: Serialize + Send + 'static,
        F: Fn(Arc<AppState>, Req) -> Fut + Clone + Send + Sync + 'static,
        Fut: Future<Output = Result<Resp, RpcError>> + Send + 'static;
}

impl RpcRouter for Router<Arc<AppState>> {
    fn rpc<Req, Resp, F, Fut>(self, path: &'static str, handler: F) -> Self
    where
        Req: DeserializeOwned + Send + 'static,
        Resp: Serialize + Send + 'static,
        F: Fn(Arc<AppState>, Req) -> Fut + Clone + Send + Sync + 'static,
        Fut: Future<Output = Result<Resp, RpcError>> + Send + 'static,
    {
        let route = post(
            move |State(state): State<Arc<AppState>>,
                  body: Result<Json<Req>, JsonRejection>| async move {
                let result = match body {
                    Ok(Json(req)) => handler(state, req).await,
                    Err(rejection) => Err(RpcError::BadRequest(rejection.body_text())),
                };

                match &result {
                    Ok(_) => debug!(path, "RPC ok"),
                    Err(e) => warn!(path, kind = e.kind(), error = %e, "RPC failed"),
                }

                Json(Envelope::from_result(result))
            },
        );

        self.route(path, route)
    }
}
