//! Prometheus metrics collection and formatting.
//!
//! This module provides metrics in Prometheus text exposition format.

use std::fmt::Write;

use steprun_core::TaskStatus;
use tracing::warn;

use crate::state::AppState;

const TASK_STATUSES: [TaskStatus; 4] = [
    TaskStatus::Record,
    TaskStatus::Accepted,
    TaskStatus::Failed,
    TaskStatus::Success,
];

/// Collect all metrics from AppState and format as Prometheus text.
pub async fn collect_metrics(state: &AppState) -> String {
    let mut output = String::new();

    collect_session_metrics(state, &mut output).await;
    collect_task_metrics(state, &mut output).await;

    output
}

/// Live sessions per principal class.
async fn collect_session_metrics(state: &AppState, output: &mut String) {
    let agents = state.agent_sessions.active_count().await;
    let operators = state.operator_sessions.active_count().await;

    writeln!(
        output,
        "# HELP steprun_sessions_active Number of live sessions by principal class"
    )
    .ok();
    writeln!(output, "# TYPE steprun_sessions_active gauge").ok();
    writeln!(output, "steprun_sessions_active{{class=\"agent\"}} {agents}").ok();
    writeln!(
        output,
        "steprun_sessions_active{{class=\"operator\"}} {operators}"
    )
    .ok();
}

/// Tasks per status. Omitted if the store cannot be read.
async fn collect_task_metrics(state: &AppState, output: &mut String) {
    let counts = match state.tasks.status_counts().await {
        Ok(counts) => counts,
        Err(e) => {
            warn!(error = %e, "Failed to collect task metrics");
            return;
        }
    };

    writeln!(output).ok();
    writeln!(
        output,
        "# HELP steprun_tasks_total Total number of tasks by status"
    )
    .ok();
    writeln!(output, "# TYPE steprun_tasks_total gauge").ok();
    for status in TASK_STATUSES {
        let count = counts.get(&status).copied().unwrap_or(0);
        writeln!(
            output,
            "steprun_tasks_total{{status=\"{}\"}} {count}",
            status.as_str()
        )
        .ok();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    use steprun_core::{NewTask, UserId, WorkerId};

    use crate::store::{MemoryStore, TaskStore};

    #[tokio::test]
    async fn test_collect_metrics_empty_state() {
        let state = AppState::new(Arc::new(MemoryStore::new()));
        let output = collect_metrics(&state).await;

        assert!(output.contains("steprun_sessions_active{class=\"agent\"} 0"));
        assert!(output.contains("steprun_sessions_active{class=\"operator\"} 0"));
        assert!(output.contains("steprun_tasks_total{status=\"record\"} 0"));
        assert!(output.contains("steprun_tasks_total{status=\"success\"} 0"));
    }

    #[tokio::test]
    async fn test_collect_metrics_counts() {
        let store = Arc::new(MemoryStore::new());
        let state = AppState::new(store.clone());
        store
            .insert_task(NewTask::new(WorkerId::new(1), UserId::new(1), "build"))
            .await
            .unwrap();
        state.agent_sessions.login(WorkerId::new(1)).await;

        let output = collect_metrics(&state).await;
        assert!(output.contains("steprun_sessions_active{class=\"agent\"} 1"));
        assert!(output.contains("steprun_tasks_total{status=\"record\"} 1"));
    }

    #[tokio::test]
    async fn test_offline_store_keeps_session_metrics() {
        let store = Arc::new(MemoryStore::new());
        let state = AppState::new(store.clone());
        store.set_offline(true);

        let output = collect_metrics(&state).await;
        assert!(output.contains("steprun_sessions_active"));
        assert!(!output.contains("steprun_tasks_total"));
    }
}
