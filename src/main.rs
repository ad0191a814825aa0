use anyhow::Result;
use std::sync::Arc;

use clap::Parser;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::info;
use tracing_subscriber::{EnvFilter, fmt};

use tokio::sync::Mutex;

#[tokio::main]
async fn main() -> Result<()> {
    init_tracing();

    let cli = roster::config::Cli::parse();
    let cmd = cli.command.clone().unwrap_or(roster::config::Command::Run);

    match cmd {
        roster::config::Command::Run => run_server(cli.config).await,
        roster::config::Command::Roster => print_roster(&cli.config),
    }
}

fn print_roster(config: &roster::config::Config) -> Result<()> {
    let directory = roster::state::Directory::new(config.directory_init());
    let out = serde_json::to_string_pretty(directory.store.list())?;
    println!("{out}");
    Ok(())
}

async fn run_server(config: roster::config::Config) -> Result<()> {
    let directory = roster::state::Directory::new(config.directory_init());
    let students = directory.store.len();
    let directory = Arc::new(Mutex::new(directory));

    let app = roster::http::build_router(config.clone(), directory)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive());

    info!(
        bind = %config.bind,
        students,
        version = roster::version::VERSION,
        "starting roster"
    );
    let listener = tokio::net::TcpListener::bind(config.bind).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;
    Ok(())
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .compact()
        .init();
}

async fn shutdown_signal() {
    let _ = tokio::signal::ctrl_c().await;
}
