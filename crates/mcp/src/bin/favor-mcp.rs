// Standalone MCP server exposing the favorability tools over stdio

use anyhow::Result;
use clap::Parser;
use favor_core::FavorConfig;
use favor_mcp::{FavorPlugin, McpServer};
use std::path::PathBuf;
use std::sync::Arc;

#[derive(Parser, Debug)]
#[command(name = "favor-mcp")]
#[command(about = "Per-user favorability tools for chat agents, served over MCP stdio", long_about = None)]
struct Args {
    /// Path to configuration file
    #[arg(short, long, default_value = "favor.toml")]
    config: PathBuf,

    /// Host data directory; scores live under it
    #[arg(short, long, env = "FAVOR_DATA_DIR", default_value = "./data")]
    data_dir: PathBuf,

    /// User the tools act for when a call names no sender
    #[arg(short, long, default_value = "anonymous")]
    sender: String,
}

#[tokio::main]
async fn main() -> Result<()> {
    // stdout carries the protocol, so logs go to stderr
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "favor=info,favor_core=info,favor_mcp=info".into()),
        )
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();

    let args = Args::parse();

    tracing::info!("Favorability MCP server starting...");
    tracing::info!("Data directory: {}", args.data_dir.display());

    let config = FavorConfig::load(&args.config)?;
    let plugin = Arc::new(FavorPlugin::initialize(config, &args.data_dir).await?);

    tracing::info!("Registered {} tools", plugin.tools().len());

    let server = McpServer::new(plugin.clone(), args.sender);
    server.start().await?;

    plugin.terminate();
    Ok(())
}
