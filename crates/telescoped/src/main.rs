//! telescoped — the Telescope daemon.
//!
//! Single binary serving the operator console for the netcon problem
//! management system:
//! - REST API under `/api/v1`
//! - Server-rendered dashboard under `/dashboard`
//! - Prometheus exposition at `/metrics`
//!
//! # Usage
//!
//! ```text
//! telescoped serve --port 8080 --namespace netcon
//! ```

use std::net::SocketAddr;
use std::sync::Arc;

use clap::{Parser, Subcommand};
use tracing::info;

use telescope_cluster::KubeCluster;
use telescope_types::DEFAULT_NAMESPACE;

#[derive(Parser)]
#[command(name = "telescoped", about = "Telescope daemon")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Serve the dashboard and API against the cluster.
    Serve {
        /// Port to listen on.
        #[arg(long, default_value = "8080")]
        port: u16,

        /// Namespace holding Problems and ProblemEnvironments.
        #[arg(long, default_value = DEFAULT_NAMESPACE)]
        namespace: String,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info,telescoped=debug,telescope=debug".parse().unwrap()),
        )
        .init();

    let cli = Cli::parse();

    match cli.command {
        Command::Serve { port, namespace } => serve(port, namespace).await,
    }
}

async fn serve(port: u16, namespace: String) -> anyhow::Result<()> {
    info!(%namespace, "Telescope daemon starting");

    let cluster = KubeCluster::connect(&namespace).await?;
    info!("cluster client connected");

    let router = telescope_api::build_router(Arc::new(cluster));
    let addr = SocketAddr::from(([0, 0, 0, 0], port));

    info!(%addr, "server starting");

    let listener = tokio::net::TcpListener::bind(addr).await?;

    axum::serve(listener, router)
        .with_graceful_shutdown(async {
            if let Err(e) = tokio::signal::ctrl_c().await {
                tracing::error!(error = %e, "failed to install CTRL+C handler");
                return;
            }
            info!("shutdown signal received");
        })
        .await?;

    info!("Telescope daemon stopped");
    Ok(())
}
