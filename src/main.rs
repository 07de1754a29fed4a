//! yachtsy-mcp binary entry point.

use std::sync::Arc;

use yachtsy_mcp::cli::{Cli, Commands};
use yachtsy_mcp::config::YachtsyConfig;
use yachtsy_mcp::gateway::AgentGateway;
use yachtsy_mcp::server::{serve_stdio, YachtsyServer};

#[tokio::main]
async fn main() {
    let cli = Cli::parse_args();
    yachtsy_mcp::cli::init_tracing(cli.log_filter.as_deref());

    if let Err(message) = run(&cli).await {
        eprintln!("{message}");
        std::process::exit(1);
    }
}

async fn run(cli: &Cli) -> Result<(), String> {
    let gateway = build_gateway(cli).map_err(|e| format!("Error: {e}"))?;

    match cli.command() {
        Commands::Serve => serve_stdio(YachtsyServer::new(Arc::new(gateway)))
            .await
            .map_err(|e| format!("Error: {e}")),
        Commands::Ask(args) => {
            let text = yachtsy_mcp::cli::ask(&gateway, &args.prompt).await?;
            println!("{text}");
            Ok(())
        }
    }
}

fn build_gateway(cli: &Cli) -> yachtsy_mcp::Result<AgentGateway> {
    let config = YachtsyConfig::load(&cli.overrides())?;
    tracing::debug!(?config, "configuration resolved");
    AgentGateway::from_config(Arc::new(config))
}
