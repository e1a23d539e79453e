//! Shared application state.

use std::sync::Arc;

use steprun_core::{UserId, UserStatus, WorkerId, ADMIN_USERNAME};

use crate::config::Config;
use crate::session::{MemorySessions, SessionStore};
use crate::store::{MemoryStore, TaskStore, UserDirectory, WorkerDirectory};

/// Context handed to every RPC handler.
pub struct AppState {
    /// Sessions of logged-in agents, keyed by worker.
    pub agent_sessions: Arc<dyn SessionStore<WorkerId>>,

    /// Sessions of logged-in operators.
    pub operator_sessions: Arc<dyn SessionStore<UserId>>,

    pub tasks: Arc<dyn TaskStore>,
    pub workers: Arc<dyn WorkerDirectory>,
    pub users: Arc<dyn UserDirectory>,
}

impl AppState {
    /// Create a new AppState over a single in-memory store.
    pub fn new(store: Arc<MemoryStore>) -> Arc<Self> {
        Arc::new(Self {
            agent_sessions: Arc::new(MemorySessions::new()),
            operator_sessions: Arc::new(MemorySessions::new()),
            tasks: store.clone(),
            workers: store.clone(),
            users: store,
        })
    }

    /// Create the state for a configured coordinator: an in-memory store
    /// seeded with the `admin` account and any extra operators.
    pub async fn bootstrap(config: &Config) -> Arc<Self> {
        let store = Arc::new(MemoryStore::new());
        seed_operators(&store, config).await;
        Self::new(store)
    }
}

/// Create the configured operator accounts, all enabled.
pub async fn seed_operators(store: &MemoryStore, config: &Config) {
    store
        .upsert_user(ADMIN_USERNAME, &config.admin_password, UserStatus::Enabled)
        .await;
    for (name, password) in &config.operators {
        store.upsert_user(name, password, UserStatus::Enabled).await;
    }
}
