//! Todo Order Server Entry Point

use std::path::PathBuf;

use anyhow::Context;
use clap::Parser;
use tracing::info;

use todo_order::build_app;
use todo_order::config::ServiceConfig;

/// Ordered todo list service
#[derive(Debug, Parser)]
#[command(name = "todo-order", version, about)]
struct Cli {
    /// TOML configuration file
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Port to listen on
    #[arg(short, long)]
    port: Option<u16>,

    /// SQLite database file, or `:memory:`
    #[arg(long)]
    db: Option<PathBuf>,
}

impl Cli {
    fn apply(&self, config: &mut ServiceConfig) {
        if let Some(port) = self.port {
            config.http.port = port;
        }
        if let Some(db) = &self.db {
            config.store.path = db.clone();
        }
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let mut config = ServiceConfig::load(cli.config.as_deref()).context("failed to load configuration")?;
    cli.apply(&mut config);
    config.validate().context("invalid configuration")?;

    let _log_guard = rolling_logger::init_logger(
        &config.log.dir,
        env!("CARGO_PKG_NAME"),
        &config.log.level,
        config.log.retain_files,
    )
    .context("failed to initialize logging")?;

    let app = build_app(&config)
        .with_context(|| format!("failed to open store at {}", config.store.path.display()))?;

    let addr = config.http_addr();
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("failed to bind {}", addr))?;

    info!(%addr, db = %config.store.path.display(), "todo-order listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("server error")?;

    info!("todo-order stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(err) = tokio::signal::ctrl_c().await {
        tracing::error!("failed to listen for shutdown signal: {err}");
        std::future::pending::<()>().await;
    }
    info!("shutdown signal received");
}
