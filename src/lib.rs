//! yachtsy-mcp: MCP server for the Yachtsy yacht marketplace agent.
//!
//! Exposes one tool, `yachtsy-agent`, that forwards a natural language
//! prompt to the upstream agent's streaming chat-completion endpoint,
//! aggregates the streamed chunks into one text and returns it as an MCP
//! tool result.
//!
//! # Quick Start
//!
//! ```no_run
//! use std::sync::Arc;
//! use yachtsy_mcp::config::YachtsyConfig;
//! use yachtsy_mcp::gateway::AgentGateway;
//!
//! # async fn example() -> yachtsy_mcp::Result<()> {
//! let config = YachtsyConfig::builder().api_key("sk-...").build();
//! let gateway = AgentGateway::from_config(Arc::new(config))?;
//! let response = gateway.invoke("Tell me about the Tayana 37").await;
//! println!("{}", response.text());
//! # Ok(())
//! # }
//! ```

pub mod config;
pub mod error;
pub mod gateway;
pub mod provider;
pub mod stream;
pub mod types;

#[cfg(feature = "server")]
pub mod server;

#[cfg(feature = "cli")]
pub mod cli;

pub use error::{FailureKind, Result, YachtsyError};
