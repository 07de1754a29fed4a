//! MCP server exposing the `yachtsy-agent` tool.

use std::sync::Arc;

use rmcp::handler::server::router::tool::ToolRouter;
use rmcp::handler::server::wrapper::Parameters;
use rmcp::model::{CallToolResult, Content, Implementation, ServerCapabilities, ServerInfo};
use rmcp::{schemars, tool, tool_handler, tool_router, ErrorData, ServerHandler, ServiceExt};
use serde::Deserialize;
use tracing::info;

use crate::error::YachtsyError;
use crate::gateway::AgentGateway;
use crate::types::ToolResponse;

/// Name clients use to call the agent.
pub const TOOL_NAME: &str = "yachtsy-agent";

const INSTRUCTIONS: &str = "Use the yachtsy-agent tool for any question about yachts, boats, \
sailing or the yacht marketplace. Pass the user's request as a natural language prompt.";

/// Arguments of the `yachtsy-agent` tool.
#[derive(Debug, Clone, Deserialize, schemars::JsonSchema)]
#[schemars(crate = "rmcp::schemars")]
pub struct PromptArgs {
    /// Your natural language query about yachts, boats, or sailing
    pub prompt: String,
}

/// rmcp handler forwarding tool calls to an [`AgentGateway`].
#[derive(Clone)]
pub struct YachtsyServer {
    gateway: Arc<AgentGateway>,
    tool_router: ToolRouter<Self>,
}

#[tool_router]
impl YachtsyServer {
    pub fn new(gateway: Arc<AgentGateway>) -> Self {
        Self {
            gateway,
            tool_router: Self::tool_router(),
        }
    }

    pub fn gateway(&self) -> &AgentGateway {
        &self.gateway
    }

    #[tool(
        name = "yachtsy-agent",
        description = "[YACHT MARKETPLACE INTELLIGENCE] Main Yachtsy agent with automatic routing to specialized sub-agents. Capabilities: Intelligently routes queries to Listings Agent, General Boat Expert (Small Talk Agent), or Deep Research Agent based on context. Handles boat listings searches, yacht specifications, market trends, sailing advice, and general yacht-related questions. Best for: Any yacht or boat-related query - the agent will automatically select the best specialized agent. Example queries: 'Show me Catalina 34 sailboats under $100k', 'What are the best bluewater cruising boats?', 'Find me yacht listings in Florida', 'Tell me about the Tayana 37', 'What should I look for when buying a used sailboat?'."
    )]
    async fn yachtsy_agent(
        &self,
        Parameters(args): Parameters<PromptArgs>,
    ) -> std::result::Result<CallToolResult, ErrorData> {
        Ok(to_call_result(self.gateway.invoke(&args.prompt).await))
    }
}

#[tool_handler]
impl ServerHandler for YachtsyServer {
    fn get_info(&self) -> ServerInfo {
        ServerInfo {
            capabilities: ServerCapabilities::builder().enable_tools().build(),
            server_info: Implementation {
                name: env!("CARGO_PKG_NAME").to_string(),
                version: env!("CARGO_PKG_VERSION").to_string(),
                ..Default::default()
            },
            instructions: Some(INSTRUCTIONS.to_string()),
            ..Default::default()
        }
    }
}

/// Convert a gateway envelope into the MCP result shape.
pub fn to_call_result(response: ToolResponse) -> CallToolResult {
    match response {
        ToolResponse::Success { text } => CallToolResult::success(vec![Content::text(text)]),
        ToolResponse::Error { message } => CallToolResult::error(vec![Content::text(message)]),
    }
}

/// Serve over stdin/stdout until the client disconnects.
pub async fn serve_stdio(server: YachtsyServer) -> crate::Result<()> {
    info!(tool = TOOL_NAME, "starting MCP server on stdio");

    let running = server
        .serve(rmcp::transport::stdio())
        .await
        .map_err(|e| YachtsyError::Io(std::io::Error::other(e.to_string())))?;

    let reason = running
        .waiting()
        .await
        .map_err(|e| YachtsyError::Io(std::io::Error::other(e.to_string())))?;

    info!(?reason, "MCP client disconnected");
    Ok(())
}
