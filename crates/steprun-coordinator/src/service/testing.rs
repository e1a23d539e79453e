//! Shared setup for service tests.

use std::sync::Arc;

use steprun_core::{NewTask, Task, TaskId, User, UserStatus, Worker, WorkerId, WorkerStatus};
use steprun_proto::agent::AgentLoginRequest;

use crate::state::AppState;
use crate::store::{MemoryStore, TaskStore, WorkerDirectory};

pub(crate) const ADMIN_PASSWORD: &str = "123456";

/// A store with an `admin` account and one enabled worker named `builder`.
pub(crate) struct Fixture {
    pub state: Arc<AppState>,
    pub store: Arc<MemoryStore>,
    pub admin: User,
    pub worker: Worker,
}

impl Fixture {
    pub async fn new() -> Self {
        let store = Arc::new(MemoryStore::new());
        let admin = store
            .upsert_user("admin", ADMIN_PASSWORD, UserStatus::Enabled)
            .await;
        let worker = enabled_worker(&store, "builder").await;
        let state = AppState::new(store.clone());

        Self {
            state,
            store,
            admin,
            worker,
        }
    }

    /// Register and enable a worker.
    pub async fn add_worker(&self, name: &str) -> Worker {
        enabled_worker(&self.store, name).await
    }

    pub async fn add_operator(&self, name: &str, password: &str) -> User {
        self.store
            .upsert_user(name, password, UserStatus::Enabled)
            .await
    }

    /// Log in the fixture worker through the agent RPC.
    pub async fn agent_login(&self) -> String {
        super::agent::login(
            self.state.clone(),
            AgentLoginRequest {
                worker_id: self.worker.id,
                worker_key: self.worker.key.clone(),
            },
        )
        .await
        .unwrap()
        .token
    }

    pub async fn admin_login(&self) -> String {
        self.login_as(&self.admin).await
    }

    pub async fn login_as(&self, user: &User) -> String {
        self.state.operator_sessions.login(user.id).await
    }

    /// Insert a task for the fixture worker, sent by the admin.
    pub async fn send_task(&self, params: &str) -> TaskId {
        self.send_task_to(self.worker.id, params).await
    }

    pub async fn send_task_to(&self, worker_id: WorkerId, params: &str) -> TaskId {
        self.store
            .insert_task(NewTask::new(worker_id, self.admin.id, params))
            .await
            .unwrap()
            .id
    }

    pub async fn task(&self, id: TaskId) -> Task {
        self.store.find_task(id).await.unwrap().unwrap()
    }
}

async fn enabled_worker(store: &MemoryStore, name: &str) -> Worker {
    let mut worker = store
        .insert_worker(name, "", &format!("{name}-key"))
        .await
        .unwrap();
    store
        .set_worker_status(worker.id, WorkerStatus::Enabled)
        .await
        .unwrap();
    worker.status = WorkerStatus::Enabled;
    worker
}
