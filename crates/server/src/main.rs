use anyhow::Result;
use clap::Parser;
use std::path::PathBuf;

mod api;
mod config;

use config::{AppState, Overrides, ServerConfig};

#[derive(Parser, Debug)]
#[command(name = "datetool")]
#[command(about = "Date and time tool server with a discovery endpoint", long_about = None)]
struct Args {
    /// Path to configuration file
    #[arg(short, long, default_value = "datetool.toml")]
    config: PathBuf,

    /// Port to listen on [default: 5000]
    #[arg(short, long)]
    port: Option<u16>,

    /// Host to bind to [default: 127.0.0.1]
    #[arg(long)]
    host: Option<String>,

    /// Verbose request logging [default: true]
    #[arg(long)]
    debug: Option<bool>,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    let config = ServerConfig::load(&args.config)?.apply(Overrides {
        host: args.host,
        port: args.port,
        debug: args.debug,
    });

    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| config.log_filter().into()),
        )
        .with_target(false)
        .with_thread_ids(true)
        .with_file(true)
        .with_line_number(true)
        .init();

    tracing::info!("Starting datetool server");
    if !args.config.exists() {
        tracing::info!("Configuration file not found, using defaults");
    }

    api::serve(&config, AppState::default()).await?;

    Ok(())
}
