//! steprun CLI - operator and admin tool for the steprun coordinator.

use clap::{Parser, Subcommand};
use serde::Serialize;

use steprun_client::OperatorClient;
use steprun_core::{TaskId, TaskStatus, UserId, WorkerId, WorkerStatus};
use steprun_proto::user::{TaskRecord, WorkerSummary};

/// steprun CLI - coordinator management tool
#[derive(Parser)]
#[command(name = "steprun")]
#[command(about = "CLI for the steprun coordinator", long_about = None)]
struct Cli {
    /// Coordinator base URL
    #[arg(short, long, default_value = "http://127.0.0.1:8080", env = "STEPRUN_URL")]
    url: String,

    /// Operator session token (from `steprun login`)
    #[arg(short, long, env = "STEPRUN_TOKEN", hide_env_values = true)]
    token: Option<String>,

    /// Print raw JSON responses
    #[arg(long)]
    json: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Log in and print a session token
    Login {
        username: String,
        password: String,
    },

    /// End the current session
    Logout,

    /// Check that the session token is still valid
    Ping,

    /// List workers you own
    #[command(name = "list-workers")]
    ListWorkers,

    /// Rename a worker
    #[command(name = "update-worker-name")]
    UpdateWorkerName { worker_id: u64, name: String },

    /// Change a worker's description
    #[command(name = "update-worker-desc")]
    UpdateWorkerDesc { worker_id: u64, desc: String },

    /// Send a task to a worker
    #[command(name = "send-task")]
    SendTask {
        worker_id: u64,

        /// Task definition name followed by positional arguments
        #[arg(required = true, num_args = 1..)]
        params: Vec<String>,
    },

    /// Show a task's status, progress and detail
    #[command(name = "task-status")]
    TaskStatus { task_id: u64 },

    /// List a worker's tasks, newest first
    #[command(name = "list-tasks")]
    ListTasks {
        worker_id: u64,

        #[arg(long, default_value_t = 0)]
        offset: u64,

        #[arg(long, default_value_t = 20)]
        limit: u64,
    },

    /// Register a worker (admin)
    #[command(name = "add-worker")]
    AddWorker {
        name: String,

        #[arg(long, default_value = "")]
        desc: String,
    },

    /// Allow a worker to log in (admin)
    #[command(name = "enable-worker")]
    EnableWorker { worker_id: u64 },

    /// Stop a worker from logging in or polling (admin)
    #[command(name = "disable-worker")]
    DisableWorker { worker_id: u64 },

    /// Delete a worker and end its session (admin)
    #[command(name = "remove-worker")]
    RemoveWorker { worker_id: u64 },

    /// Grant an operator ownership of a worker (admin)
    #[command(name = "add-worker-user")]
    AddWorkerUser { worker_id: u64, user_id: u64 },

    /// Revoke an operator's ownership of a worker (admin)
    #[command(name = "remove-worker-user")]
    RemoveWorkerUser { worker_id: u64, user_id: u64 },
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    let client = OperatorClient::new(&cli.url);

    if let Commands::Login { username, password } = &cli.command {
        let response = client.login(username, password).await?;
        if cli.json {
            print_json(&response)?;
        } else {
            println!("Logged in as {} (user id {})", username, response.user_id);
            println!("export STEPRUN_TOKEN={}", response.token);
        }
        return Ok(());
    }

    let token = cli
        .token
        .as_deref()
        .ok_or("missing token: pass --token or set STEPRUN_TOKEN")?;

    match cli.command {
        Commands::Login { .. } => {}
        Commands::Logout => {
            client.logout(token).await?;
            println!("Logged out");
        }
        Commands::Ping => {
            client.ping(token).await?;
            println!("pong");
        }
        Commands::ListWorkers => {
            let workers = client.list_workers(token).await?;
            if cli.json {
                print_json(&workers)?;
            } else {
                print_workers(&workers);
            }
        }
        Commands::UpdateWorkerName { worker_id, name } => {
            client
                .update_worker_name(token, WorkerId::new(worker_id), &name)
                .await?;
            println!("Worker {worker_id} renamed");
        }
        Commands::UpdateWorkerDesc { worker_id, desc } => {
            client
                .update_worker_desc(token, WorkerId::new(worker_id), &desc)
                .await?;
            println!("Worker {worker_id} description updated");
        }
        Commands::SendTask { worker_id, params } => {
            let task_id = client
                .send_task(token, WorkerId::new(worker_id), &params.join(" "))
                .await?;
            println!("Task created: {task_id}");
        }
        Commands::TaskStatus { task_id } => {
            let status = client.task_status(token, TaskId::new(task_id)).await?;
            if cli.json {
                print_json(&status)?;
            } else {
                println!("  ID:         {task_id}");
                println!("  Status:     {}", status_name(status.status));
                println!("  Progress:   {}", status.progress);
                if !status.detail.is_empty() {
                    println!("  Detail:");
                    for line in status.detail.lines() {
                        println!("    {line}");
                    }
                }
            }
        }
        Commands::ListTasks {
            worker_id,
            offset,
            limit,
        } => {
            let response = client
                .list_tasks(token, WorkerId::new(worker_id), offset, limit)
                .await?;
            if cli.json {
                print_json(&response)?;
            } else {
                print_tasks(response.total, &response.tasks);
            }
        }
        Commands::AddWorker { name, desc } => {
            let response = client.add_worker(token, &name, &desc).await?;
            if cli.json {
                print_json(&response)?;
            } else {
                println!("Worker added (disabled until enabled):");
                println!("  ID:   {}", response.worker_id);
                println!("  Key:  {}", response.worker_key);
            }
        }
        Commands::EnableWorker { worker_id } => {
            client.enable_worker(token, WorkerId::new(worker_id)).await?;
            println!("Worker {worker_id} enabled");
        }
        Commands::DisableWorker { worker_id } => {
            client.disable_worker(token, WorkerId::new(worker_id)).await?;
            println!("Worker {worker_id} disabled");
        }
        Commands::RemoveWorker { worker_id } => {
            client.remove_worker(token, WorkerId::new(worker_id)).await?;
            println!("Worker {worker_id} removed");
        }
        Commands::AddWorkerUser { worker_id, user_id } => {
            client
                .add_worker_user(token, WorkerId::new(worker_id), UserId::new(user_id))
                .await?;
            println!("User {user_id} now owns worker {worker_id}");
        }
        Commands::RemoveWorkerUser { worker_id, user_id } => {
            client
                .remove_worker_user(token, WorkerId::new(worker_id), UserId::new(user_id))
                .await?;
            println!("User {user_id} no longer owns worker {worker_id}");
        }
    }

    Ok(())
}

fn print_json<T: Serialize>(value: &T) -> Result<(), serde_json::Error> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

fn print_workers(workers: &[WorkerSummary]) {
    println!("Workers ({}):", workers.len());
    println!("{:<6}  {:<10}  {:<20}  {:<19}  {}", "ID", "STATUS", "NAME", "CREATED", "USERS");
    println!("{}", "-".repeat(80));

    for worker in workers {
        let users: Vec<String> = worker.users.iter().map(|u| u.to_string()).collect();
        println!(
            "{:<6}  {:<10}  {:<20}  {:<19}  {}",
            worker.id,
            worker_status_name(worker.status),
            worker.name,
            format_timestamp(worker.created_at),
            users.join(",")
        );
    }
}

fn print_tasks(total: u64, tasks: &[TaskRecord]) {
    println!("Tasks ({} of {}):", tasks.len(), total);
    println!(
        "{:<8}  {:<9}  {:<8}  {:<12}  {:<19}  {}",
        "ID", "STATUS", "PROGRESS", "CREATOR", "CREATED", "PARAMS"
    );
    println!("{}", "-".repeat(80));

    for task in tasks {
        println!(
            "{:<8}  {:<9}  {:<8}  {:<12}  {:<19}  {}",
            task.id,
            status_name(task.status),
            task.progress,
            task.creator,
            format_timestamp(task.created_at),
            task.params
        );
    }
}

fn status_name(status: TaskStatus) -> &'static str {
    match status {
        TaskStatus::Record => "RECORD",
        TaskStatus::Accepted => "ACCEPTED",
        TaskStatus::Failed => "FAILED",
        TaskStatus::Success => "SUCCESS",
    }
}

fn worker_status_name(status: WorkerStatus) -> &'static str {
    match status {
        WorkerStatus::Enabled => "ENABLED",
        WorkerStatus::Disabled => "DISABLED",
    }
}

fn format_timestamp(secs: i64) -> String {
    chrono::DateTime::from_timestamp(secs, 0)
        .map(|dt| dt.format("%Y-%m-%d %H:%M:%S").to_string())
        .unwrap_or_else(|| "-".to_string())
}
