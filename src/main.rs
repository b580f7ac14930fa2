use std::net::SocketAddr;
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use tracing::info;

use timesheet_engine::api::{create_router, AppState};
use timesheet_engine::config::ConfigLoader;

#[derive(Debug, Parser)]
#[command(author, version, about)]
struct Args {
    /// Directory holding organization.yaml, locations.yaml and pay_periods.yaml
    #[arg(long, default_value = "./config/default")]
    config: PathBuf,

    /// Address the HTTP API listens on
    #[arg(long, default_value = "127.0.0.1:3000")]
    bind: SocketAddr,
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_target(false)
        .compact()
        .init();

    let args = Args::parse();
    let loader = ConfigLoader::load(&args.config)
        .with_context(|| format!("failed to load configuration from {}", args.config.display()))?;
    let router = create_router(AppState::from_loader(loader));

    let listener = tokio::net::TcpListener::bind(args.bind)
        .await
        .with_context(|| format!("failed to bind {}", args.bind))?;
    info!(addr = %args.bind, "Timesheet engine listening");

    axum::serve(listener, router).await?;
    Ok(())
}
