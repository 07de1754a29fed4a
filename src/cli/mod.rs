//! CLI entry point for yachtsy-mcp.

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use crate::config::{CitationPolicy, ConfigOverrides};
use crate::gateway::AgentGateway;

/// Default log filter when neither `--log-filter` nor `RUST_LOG` is set.
pub const DEFAULT_LOG_FILTER: &str = "yachtsy_mcp=info";

/// Yachtsy MCP server
#[derive(Parser, Debug)]
#[command(
    name = "yachtsy-mcp",
    version,
    about = "MCP server for the Yachtsy yacht marketplace agent"
)]
pub struct Cli {
    /// Yachtsy API key (overrides YACHTSY_API_KEY)
    #[arg(long, global = true)]
    pub api_key: Option<String>,

    /// Upstream base URL (overrides YACHTSY_API_BASE_URL)
    #[arg(long, global = true)]
    pub base_url: Option<String>,

    /// Path to a TOML config file
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// What to do with citations returned by the agent (drop, append)
    #[arg(long, global = true)]
    pub citations: Option<CitationPolicy>,

    /// tracing filter directive, e.g. `yachtsy_mcp=debug`
    #[arg(long, global = true)]
    pub log_filter: Option<String>,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

/// Top-level CLI commands.
#[derive(Subcommand, Debug, PartialEq, Eq)]
pub enum Commands {
    /// Run the MCP server on stdio (default)
    Serve,
    /// Send one prompt to the agent and print the reply
    Ask(AskArgs),
}

/// Arguments for `yachtsy-mcp ask`.
#[derive(Parser, Debug, PartialEq, Eq)]
pub struct AskArgs {
    /// Natural language query about yachts, boats, or sailing
    pub prompt: String,
}

impl Cli {
    /// Parse CLI arguments.
    pub fn parse_args() -> Self {
        Self::parse()
    }

    /// The subcommand to run, `serve` when none was given.
    pub fn command(&self) -> &Commands {
        static SERVE: Commands = Commands::Serve;
        self.command.as_ref().unwrap_or(&SERVE)
    }

    /// Highest-precedence configuration layer.
    pub fn overrides(&self) -> ConfigOverrides {
        ConfigOverrides {
            api_key: self.api_key.clone(),
            base_url: self.base_url.clone(),
            citations: self.citations,
            config_path: self.config.clone(),
        }
    }
}

/// Run one `ask` invocation.
///
/// Returns the reply text, or the error envelope text when the
/// invocation failed.
pub async fn ask(gateway: &AgentGateway, prompt: &str) -> Result<String, String> {
    let response = gateway.invoke(prompt).await;
    if response.is_error() {
        Err(response.text().to_owned())
    } else {
        Ok(response.text().to_owned())
    }
}

/// Install the stderr tracing subscriber.
///
/// stdout carries the MCP protocol, so logs must never go there.
pub fn init_tracing(filter: Option<&str>) {
    let filter = match filter {
        Some(directive) => EnvFilter::new(directive),
        None => EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_FILTER)),
    };

    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_ansi(false)
        .try_init();
}
