// ABOUTME: Entry point for the sensord binary.
// ABOUTME: Parses CLI arguments, initializes tracing, and starts the HTTP server.

use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Context;
use clap::Parser;
use sensord_server::{AppState, SensordConfig, create_router};

/// File-backed sensor reading service with an HTTP CRUD API.
#[derive(Debug, Parser)]
#[command(name = "sensord", version, about)]
struct Cli {
    /// Socket address to bind, overriding SENSORD_BIND.
    #[arg(long)]
    bind: Option<SocketAddr>,

    /// Directory holding the reading files, overriding SENSORD_DATA_DIR.
    #[arg(long)]
    data_dir: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "sensord=debug,tower_http=debug".parse().unwrap()),
        )
        .init();

    let cli = Cli::parse();
    let mut config = SensordConfig::from_env()?;
    if let Some(bind) = cli.bind {
        config.bind = bind;
    }
    if let Some(data_dir) = cli.data_dir {
        config.data_dir = data_dir;
    }

    std::fs::create_dir_all(&config.data_dir)
        .with_context(|| format!("creating data directory {}", config.data_dir.display()))?;

    let state = Arc::new(AppState::new(config.data_dir.clone()));
    let app = create_router(state);

    let listener = tokio::net::TcpListener::bind(config.bind)
        .await
        .with_context(|| format!("binding {}", config.bind))?;
    tracing::info!("sensord listening on {}", config.bind);

    axum::serve(listener, app).await?;
    Ok(())
}
