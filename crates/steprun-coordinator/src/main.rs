//! steprun Coordinator Server

use std::net::SocketAddr;

use clap::Parser;
use tokio::net::TcpListener;
use tracing::info;
use tracing_subscriber::EnvFilter;

use steprun_coordinator::{http, AppState, Config};

/// steprun coordinator: hands tasks to polling agents.
#[derive(Parser, Debug)]
#[command(name = "steprun-coordinator", about = "steprun coordinator server")]
struct Args {
    /// HTTP server address
    #[arg(long, default_value = "127.0.0.1:8080")]
    http_addr: String,

    /// Password for the built-in admin operator
    #[arg(long, default_value = "123456")]
    admin_password: String,

    /// Extra operator account as name:password (repeatable)
    #[arg(long = "operator", value_parser = Config::parse_operator)]
    operators: Vec<(String, String)>,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env().add_directive("steprun=info".parse()?))
        .with_target(true)
        .init();

    let config = Config {
        http_addr: args.http_addr,
        admin_password: args.admin_password,
        operators: args.operators,
    };
    let http_addr: SocketAddr = config.http_addr.parse()?;

    let state = AppState::bootstrap(&config).await;
    info!(
        operators = config.operators.len() + 1,
        "Operator accounts seeded"
    );

    let router = http::create_router(state);
    let listener = TcpListener::bind(http_addr).await?;
    info!("HTTP server listening on {}", http_addr);

    axum::serve(listener, router)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Coordinator stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "Failed to listen for shutdown signal");
    }
}
