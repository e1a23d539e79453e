//! Agent against a live coordinator on an ephemeral port.

use steprun_agent::{Agent, AgentConfig};
use steprun_client::{AgentClient, OperatorClient};
use steprun_coordinator::{http::create_router, AppState, Config};
use steprun_core::{Step, TaskDefinition, TaskStatus};
use tokio::net::TcpListener;

async fn start_coordinator() -> String {
    let state = AppState::bootstrap(&Config::default()).await;
    let router = create_router(state);

    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, router).await.unwrap();
    });
    format!("http://{addr}")
}

#[tokio::test]
async fn test_agent_drives_tasks_to_terminal_states() {
    let url = start_coordinator().await;
    let operator = OperatorClient::new(&url);
    let admin = operator.login("admin", "123456").await.unwrap().token;

    let worker = operator.add_worker(&admin, "builder", "").await.unwrap();
    operator.enable_worker(&admin, worker.worker_id).await.unwrap();

    let work_dir = tempfile::TempDir::new().unwrap();
    let config = AgentConfig {
        url: url.clone(),
        worker_id: worker.worker_id,
        worker_key: worker.worker_key.clone(),
        poll_interval_ms: 10,
        shell: "sh".to_string(),
        tasks: vec![
            TaskDefinition {
                name: "build".to_string(),
                work_dir: work_dir.path().to_string_lossy().into_owned(),
                steps: vec![
                    Step::shell("compile", "echo compiled > out.txt"),
                    Step::shell("test", "cat out.txt; exit 3"),
                    Step::shell("package", "echo packaged"),
                ],
            },
            TaskDefinition {
                name: "greet".to_string(),
                work_dir: String::new(),
                steps: vec![Step::with_params("say", "echo")],
            },
        ],
    };

    let failing = operator
        .send_task(&admin, worker.worker_id, "build arg1")
        .await
        .unwrap();
    let passing = operator
        .send_task(&admin, worker.worker_id, "greet hello world")
        .await
        .unwrap();

    let mut agent = Agent::new(AgentClient::new(&url), config);
    agent.poll_once().await.unwrap();

    let status = operator.task_status(&admin, failing).await.unwrap();
    assert_eq!(status.status, TaskStatus::Failed);
    assert_eq!(status.progress, 1);
    assert_eq!(
        status.detail,
        "step at index 1(test) failed, exit status: 3, compiled"
    );

    let status = operator.task_status(&admin, passing).await.unwrap();
    assert_eq!(status.status, TaskStatus::Success);
    assert_eq!(status.progress, 1);
    assert_eq!(status.detail, "step at index 0(say) done:\nhello world");

    // Nothing left to do on the next cycle.
    agent.poll_once().await.unwrap();
    let listed = AgentClient::new(&url)
        .list_tasks(&agent_token(&url, &worker).await)
        .await
        .unwrap();
    assert_eq!(listed.total, 0);
}

#[tokio::test]
async fn test_unknown_definition_is_recorded_as_failed() {
    let url = start_coordinator().await;
    let operator = OperatorClient::new(&url);
    let admin = operator.login("admin", "123456").await.unwrap().token;

    let worker = operator.add_worker(&admin, "builder", "").await.unwrap();
    operator.enable_worker(&admin, worker.worker_id).await.unwrap();

    let config: AgentConfig = format!(
        r#"
        url = "{url}"
        worker_id = {}
        worker_key = "{}"

        [[tasks]]
        name = "build"

        [[tasks.steps]]
        name = "compile"
        cmd = "true"
        "#,
        worker.worker_id, worker.worker_key
    )
    .parse()
    .unwrap();

    let task_id = operator
        .send_task(&admin, worker.worker_id, "lint src")
        .await
        .unwrap();

    let mut agent = Agent::new(AgentClient::new(&url), config);
    agent.poll_once().await.unwrap();

    let status = operator.task_status(&admin, task_id).await.unwrap();
    assert_eq!(status.status, TaskStatus::Failed);
    assert_eq!(status.progress, 0);
    assert_eq!(status.detail, "invalid task name lint, must be one of [build]");

    // The failed task is no longer handed out.
    agent.poll_once().await.unwrap();
    let listed = AgentClient::new(&url)
        .list_tasks(&agent_token(&url, &worker).await)
        .await
        .unwrap();
    assert_eq!(listed.total, 0);
}

async fn agent_token(url: &str, worker: &steprun_proto::user::AddWorkerResponse) -> String {
    AgentClient::new(url)
        .login(worker.worker_id, &worker.worker_key)
        .await
        .unwrap()
}
