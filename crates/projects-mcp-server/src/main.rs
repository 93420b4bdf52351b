use std::path::PathBuf;

use clap::Parser;
use clap::builder::Styles;
use clap::builder::styling::{AnsiColor, Effects};
use projects_mcp_server::server::Server;
use runtime::Config;
use tracing::{debug, info};

mod runtime;

/// Clap styling
const STYLES: Styles = Styles::styled()
    .header(AnsiColor::Green.on_default().effects(Effects::BOLD))
    .usage(AnsiColor::Green.on_default().effects(Effects::BOLD))
    .literal(AnsiColor::Cyan.on_default().effects(Effects::BOLD))
    .placeholder(AnsiColor::Cyan.on_default());

/// Arguments to the MCP server
#[derive(Debug, clap::Parser)]
#[command(
    version,
    styles = STYLES,
    about = "Projects MCP Server - manage GitHub Projects from an AI agent",
)]
struct Args {
    /// Path to the config file. Without one, config is read from the environment
    config: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config: Config = match Args::parse().config {
        Some(config_path) => runtime::read_config(config_path)?,
        None => runtime::read_config_from_env()?,
    };

    let _guard = runtime::setup_logging(&config)?;

    info!(
        "Projects MCP Server v{} // GitHub Projects tools over MCP",
        std::env!("CARGO_PKG_VERSION")
    );
    debug!(?config, "Loaded configuration");

    let endpoint = config.endpoint()?;
    let headers = config.request_headers()?;

    Ok(Server::builder()
        .transport(config.transport)
        .endpoint(endpoint)
        .headers(headers)
        .timeout(config.timeout)
        .mutation_mode(config.overrides.mutation_mode)
        .build()
        .start()
        .await?)
}
