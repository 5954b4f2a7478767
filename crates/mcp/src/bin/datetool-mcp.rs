// Standalone MCP server binary

use anyhow::Result;
use clap::Parser;
use datetool_core::{Clock, SystemClock, DEFAULT_UTC_OFFSET_HOURS};
use datetool_mcp::server::McpServer;
use datetool_mcp::tools::*;
use std::sync::Arc;

#[derive(Parser, Debug)]
#[command(name = "datetool-mcp")]
#[command(about = "Date and time tools over MCP stdio", long_about = None)]
struct Args {
    /// Default hour offset from UTC for get_current_time
    #[arg(
        long,
        default_value_t = DEFAULT_UTC_OFFSET_HOURS,
        allow_negative_numbers = true,
        value_parser = clap::value_parser!(i32).range(-23..=23)
    )]
    utc_offset_hours: i32,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    // stdout carries the protocol, so logs go to stderr
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();

    tracing::info!("datetool MCP server starting...");

    let clock: Arc<dyn Clock> = Arc::new(SystemClock);

    let mut registry = ToolRegistry::new();
    registry.register(Arc::new(GetCurrentDateTool::new(clock.clone())));
    registry.register(Arc::new(GetCurrentTimeTool::new(clock, args.utc_offset_hours)));

    tracing::info!(
        "Registered {} tools (default UTC offset: {}h)",
        registry.len(),
        args.utc_offset_hours
    );

    let server = McpServer::new(registry);
    server.start().await?;

    Ok(())
}
