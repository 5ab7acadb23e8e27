//! trialview-server binary: serve one experiment directory.

use std::path::PathBuf;

use anyhow::Result;
use clap::Parser;
use tracing_subscriber::EnvFilter;

use trialview_server::{serve, ServerConfig};

#[derive(Parser)]
#[command(
    name = "trialview-server",
    about = "Serve the trial dashboard for an experiment directory",
    version,
    author
)]
struct Cli {
    /// Path to the experiment directory
    #[arg(default_value = "./experiment")]
    dir: PathBuf,
    /// Host to bind to
    #[arg(long, default_value = "127.0.0.1")]
    host: String,
    /// Port to bind to
    #[arg(long, short, default_value_t = 8080)]
    port: u16,
    /// Mount point of the REST API
    #[arg(long, default_value = "/api/v1/nni")]
    api_prefix: String,
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_target(false)
        .compact()
        .init();

    let cli = Cli::parse();
    if !cli.dir.exists() {
        anyhow::bail!("experiment directory not found: {}", cli.dir.display());
    }

    serve(ServerConfig {
        base_dir: cli.dir,
        host: cli.host,
        port: cli.port,
        api_prefix: cli.api_prefix,
    })
    .await
}
