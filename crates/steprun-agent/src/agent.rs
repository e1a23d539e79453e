//! Polling loop that drives a worker's tasks.
//!
//! Each cycle lists the worker's unfinished tasks and runs them one at a
//! time, reporting a checkpoint after every successful step and a final
//! outcome at the end. A step failure or an unresolvable task is an outcome,
//! not an error: it is reported through `FinishTask`.

use std::future::Future;
use std::time::Duration;

use async_trait::async_trait;
use thiserror::Error;
use tracing::{debug, error, info, warn};

use steprun_client::{AgentClient, ClientError};
use steprun_core::{truncate_detail, TaskId, TaskStatus, WorkerId};
use steprun_proto::agent::{AgentListTaskResponse, AgentTask};

use crate::catalog::Catalog;
use crate::config::AgentConfig;
use crate::executor::Executor;

/// The agent RPC surface of the coordinator.
#[async_trait]
pub trait Coordinator: Send + Sync {
    async fn login(&self, worker_id: WorkerId, worker_key: &str) -> Result<String, ClientError>;

    async fn list_tasks(&self, token: &str) -> Result<AgentListTaskResponse, ClientError>;

    async fn accept_task(&self, token: &str, task_id: TaskId) -> Result<bool, ClientError>;

    async fn update_task(
        &self,
        token: &str,
        task_id: TaskId,
        progress: i32,
        detail: &str,
    ) -> Result<bool, ClientError>;

    async fn finish_task(
        &self,
        token: &str,
        task_id: TaskId,
        success: bool,
        detail: &str,
    ) -> Result<bool, ClientError>;
}

#[async_trait]
impl Coordinator for AgentClient {
    async fn login(&self, worker_id: WorkerId, worker_key: &str) -> Result<String, ClientError> {
        AgentClient::login(self, worker_id, worker_key).await
    }

    async fn list_tasks(&self, token: &str) -> Result<AgentListTaskResponse, ClientError> {
        AgentClient::list_tasks(self, token).await
    }

    async fn accept_task(&self, token: &str, task_id: TaskId) -> Result<bool, ClientError> {
        AgentClient::accept_task(self, token, task_id).await
    }

    async fn update_task(
        &self,
        token: &str,
        task_id: TaskId,
        progress: i32,
        detail: &str,
    ) -> Result<bool, ClientError> {
        AgentClient::update_task(self, token, task_id, progress, detail).await
    }

    async fn finish_task(
        &self,
        token: &str,
        task_id: TaskId,
        success: bool,
        detail: &str,
    ) -> Result<bool, ClientError> {
        AgentClient::finish_task(self, token, task_id, success, detail).await
    }
}

/// Coordinator failures that interrupt a poll cycle or a task.
#[derive(Debug, Error)]
pub enum AgentError {
    #[error("login failed: {0}")]
    Login(#[source] ClientError),

    #[error("list tasks failed: {0}")]
    List(#[source] ClientError),

    #[error("accept task {task_id} failed: {source}")]
    Accept {
        task_id: TaskId,
        source: ClientError,
    },

    #[error("update task {task_id} at step index {index} failed: {source}")]
    Update {
        task_id: TaskId,
        index: usize,
        source: ClientError,
    },
}

/// Final outcome of running a task, reported through `FinishTask`.
#[derive(Debug, Clone, PartialEq, Eq)]
struct Outcome {
    success: bool,
    detail: String,
}

impl Outcome {
    fn success() -> Self {
        Self {
            success: true,
            detail: String::new(),
        }
    }

    fn failure(detail: impl Into<String>) -> Self {
        let detail = detail.into();
        Self {
            success: false,
            detail: truncate_detail(&detail).to_string(),
        }
    }
}

/// A polling agent for one worker.
pub struct Agent<C> {
    coordinator: C,
    catalog: Catalog,
    executor: Executor,
    worker_id: WorkerId,
    worker_key: String,
    poll_interval: Duration,
    token: Option<String>,
}

impl<C: Coordinator> Agent<C> {
    pub fn new(coordinator: C, config: AgentConfig) -> Self {
        Self {
            coordinator,
            executor: Executor::new(config.shell.clone()),
            poll_interval: config.poll_interval(),
            worker_id: config.worker_id,
            worker_key: config.worker_key,
            catalog: Catalog::new(config.tasks),
            token: None,
        }
    }

    pub fn coordinator(&self) -> &C {
        &self.coordinator
    }

    /// Log in and keep the session token.
    pub async fn login(&mut self) -> Result<String, AgentError> {
        let token = self
            .coordinator
            .login(self.worker_id, &self.worker_key)
            .await
            .map_err(AgentError::Login)?;
        info!(worker_id = %self.worker_id, "Logged in to coordinator");
        self.token = Some(token.clone());
        Ok(token)
    }

    /// Run one poll cycle.
    ///
    /// An expired session triggers a fresh login and ends the cycle without
    /// processing anything. A failed checkpoint write ends the cycle early.
    pub async fn poll_once(&mut self) -> Result<(), AgentError> {
        let token = match self.token.clone() {
            Some(token) => token,
            None => self.login().await?,
        };

        let tasks = match self.coordinator.list_tasks(&token).await {
            Ok(response) => response.tasks,
            Err(e) if e.is_invalid_agent_token() => {
                warn!(worker_id = %self.worker_id, "Agent token rejected, logging in again");
                self.token = None;
                self.login().await?;
                return Ok(());
            }
            Err(e) => return Err(AgentError::List(e)),
        };

        debug!(count = tasks.len(), "Listed tasks");

        for task in &tasks {
            let outcome = match self.process(&token, task).await {
                Ok(outcome) => outcome,
                Err(e @ AgentError::Accept { .. }) => {
                    error!(task_id = %task.id, error = %e, "Skipping task");
                    continue;
                }
                Err(e) => return Err(e),
            };

            match self
                .coordinator
                .finish_task(&token, task.id, outcome.success, &outcome.detail)
                .await
            {
                Ok(_) => info!(
                    task_id = %task.id,
                    params = %task.params,
                    success = outcome.success,
                    "Task finished"
                ),
                Err(e) => error!(
                    task_id = %task.id,
                    params = %task.params,
                    error = %e,
                    "Failed to finish task"
                ),
            }
        }

        Ok(())
    }

    /// Run one task from its stored checkpoint.
    async fn process(&self, token: &str, task: &AgentTask) -> Result<Outcome, AgentError> {
        info!(
            task_id = %task.id,
            params = %task.params,
            progress = task.progress,
            status = task.status.as_str(),
            "Processing task"
        );

        // Accept first so that an unrunnable task can still be finished.
        if task.status == TaskStatus::Record {
            self.coordinator
                .accept_task(token, task.id)
                .await
                .map_err(|source| AgentError::Accept {
                    task_id: task.id,
                    source,
                })?;
        }

        let plan = match self.catalog.resolve(&task.params, task.progress) {
            Ok(plan) => plan,
            Err(e) => {
                warn!(task_id = %task.id, error = %e, "Cannot run task");
                return Ok(Outcome::failure(e.to_string()));
            }
        };

        let work_dir = plan.definition.work_dir.as_str();
        for (index, step) in plan.remaining() {
            match self.executor.run_step(step, work_dir, &plan.args).await {
                Ok(output) => {
                    let detail = format!("step at index {index}({}) done:\n{output}", step.name);
                    let progress = i32::try_from(index + 1).unwrap_or(i32::MAX);
                    self.coordinator
                        .update_task(token, task.id, progress, truncate_detail(&detail))
                        .await
                        .map_err(|source| AgentError::Update {
                            task_id: task.id,
                            index,
                            source,
                        })?;
                    debug!(task_id = %task.id, step = %step.name, index, "Step done");
                }
                Err(e) => {
                    warn!(task_id = %task.id, step = %step.name, index, error = %e, "Step failed");
                    return Ok(Outcome::failure(format!(
                        "step at index {index}({}) failed, {e}, {}",
                        step.name,
                        e.output()
                    )));
                }
            }
        }

        Ok(Outcome::success())
    }

    /// Poll until `shutdown` resolves.
    pub async fn run_until<F>(&mut self, shutdown: F)
    where
        F: Future<Output = ()>,
    {
        tokio::pin!(shutdown);

        info!(
            worker_id = %self.worker_id,
            interval_ms = self.poll_interval.as_millis() as u64,
            "Starting poll loop"
        );

        loop {
            if let Err(e) = self.poll_once().await {
                error!(error = %e, "Poll cycle failed");
            }

            tokio::select! {
                _ = &mut shutdown => {
                    info!("Shutting down agent");
                    return;
                }
                _ = tokio::time::sleep(self.poll_interval) => {}
            }
        }
    }

    /// Poll until interrupted with Ctrl+C.
    pub async fn run(&mut self) {
        self.run_until(async {
            if let Err(e) = tokio::signal::ctrl_c().await {
                error!(error = %e, "Failed to listen for shutdown signal");
                std::future::pending::<()>().await;
            }
        })
        .await
    }
}
