//! steprun Agent Daemon

use std::path::PathBuf;

use clap::Parser;
use tracing::info;
use tracing_subscriber::EnvFilter;

use steprun_agent::{Agent, AgentConfig};
use steprun_client::AgentClient;

/// Polls the coordinator and runs tasks for one worker.
#[derive(Parser, Debug)]
#[command(name = "steprun-agent")]
#[command(about = "steprun polling agent")]
struct Args {
    /// Path to the agent config file
    #[arg(short, long, default_value = "agent.toml")]
    config: PathBuf,

    /// Override the coordinator URL from the config file
    #[arg(long)]
    url: Option<String>,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env().add_directive("steprun=info".parse()?))
        .with_target(true)
        .init();

    let args = Args::parse();

    let mut config = AgentConfig::load(&args.config)?;
    if let Some(url) = args.url {
        config.url = url;
    }

    info!(
        worker_id = %config.worker_id,
        coordinator = %config.url,
        tasks = config.tasks.len(),
        "Starting steprun agent"
    );

    let client = AgentClient::new(&config.url);
    let mut agent = Agent::new(client, config);
    agent.run().await;

    Ok(())
}
