//! Route paths. Every RPC is a `POST` carrying a JSON request body.

/// Agent-facing routes.
pub mod agent {
    pub const LOGIN: &str = "/v1/agent/login";
    pub const LIST_TASK: &str = "/v1/agent/list-task";
    pub const ACCEPT_TASK: &str = "/v1/agent/accept-task";
    pub const UPDATE_TASK: &str = "/v1/agent/update-task";
    pub const FINISH_TASK: &str = "/v1/agent/finish-task";
}

/// Operator and admin routes.
pub mod user {
    pub const LOGIN: &str = "/v1/user/login";
    pub const LOGOUT: &str = "/v1/user/logout";
    pub const PING: &str = "/v1/user/ping";
    pub const LIST_WORKER: &str = "/v1/user/list-worker";
    pub const SEND_TASK: &str = "/v1/user/send-task";
    pub const TASK_STATUS: &str = "/v1/user/task-status";
    pub const LIST_TASK: &str = "/v1/user/list-task";
    pub const UPDATE_WORKER_NAME: &str = "/v1/user/update-worker-name";
    pub const UPDATE_WORKER_DESC: &str = "/v1/user/update-worker-desc";

    pub const ADD_WORKER: &str = "/v1/user/add-worker";
    pub const ENABLE_WORKER: &str = "/v1/user/enable-worker";
    pub const DISABLE_WORKER: &str = "/v1/user/disable-worker";
    pub const REMOVE_WORKER: &str = "/v1/user/remove-worker";
    pub const ADD_WORKER_USER: &str = "/v1/user/add-worker-user";
    pub const REMOVE_WORKER_USER: &str = "/v1/user/remove-worker-user";
}
