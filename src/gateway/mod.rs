//! Agent gateway: prompt in, tool envelope out.

use std::fmt;
use std::sync::Arc;

use tracing::{debug, error, info, info_span, warn, Instrument};
use uuid::Uuid;

use crate::config::{CitationPolicy, YachtsyConfig};
use crate::error::Result;
use crate::provider::{ChunkSource, OpenAiCompatibleClient};
use crate::stream::Aggregator;
use crate::types::{AggregationResult, ChatRequest, ToolResponse};

/// Upstream model identifier every request is sent to.
pub const AGENT_MODEL: &str = "yachtsy-agent";

/// Leading text of every error envelope.
pub const ERROR_PREFIX: &str = "Error: Failed to process yacht marketplace query.";

/// Forwards prompts to the upstream agent and shapes the reply.
///
/// Holds only read-only state, so one gateway can serve any number of
/// concurrent invocations. Each invocation owns its own accumulation
/// buffer.
#[derive(Clone)]
pub struct AgentGateway {
    source: Arc<dyn ChunkSource>,
    aggregator: Aggregator,
    citations: CitationPolicy,
}

impl fmt::Debug for AgentGateway {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AgentGateway")
            .field("source", &self.source.name())
            .field("aggregator", &self.aggregator)
            .field("citations", &self.citations)
            .finish()
    }
}

impl AgentGateway {
    pub fn new(source: Arc<dyn ChunkSource>, citations: CitationPolicy) -> Self {
        Self {
            source,
            aggregator: Aggregator::new(),
            citations,
        }
    }

    /// Gateway talking to the OpenAI-compatible endpoint in `config`.
    pub fn from_config(config: Arc<YachtsyConfig>) -> Result<Self> {
        let citations = config.citations();
        let client = OpenAiCompatibleClient::new(config)?;
        Ok(Self::new(Arc::new(client), citations))
    }

    /// Replace the aggregator (and with it the chunk format table).
    pub fn with_aggregator(mut self, aggregator: Aggregator) -> Self {
        self.aggregator = aggregator;
        self
    }

    pub fn citations(&self) -> CitationPolicy {
        self.citations
    }

    /// Run one prompt and return the caller-visible envelope.
    ///
    /// Never fails: request and stream errors are logged and turned into
    /// an error envelope. Partial text from a failed stream is never
    /// included.
    pub async fn invoke(&self, prompt: &str) -> ToolResponse {
        let invocation_id = Uuid::new_v4();
        let span = info_span!("invoke", %invocation_id, source = self.source.name());

        async move {
            if prompt.trim().is_empty() {
                warn!("empty prompt forwarded upstream");
            }

            match self.run(prompt).await {
                Ok(result) => {
                    info!(
                        text_len = result.text.len(),
                        chunks = result.chunks_seen,
                        "yachtsy agent answered"
                    );
                    ToolResponse::success(render_text(result, self.citations))
                }
                Err(err) => {
                    error!(error = %err, kind = ?err.kind(), "Error calling Yachtsy agent");
                    ToolResponse::error(format!("{ERROR_PREFIX} {err}"))
                }
            }
        }
        .instrument(span)
        .await
    }

    /// Issue the upstream request and aggregate its stream.
    pub async fn run(&self, prompt: &str) -> Result<AggregationResult> {
        let request = ChatRequest::single_prompt(AGENT_MODEL, prompt);
        let stream = self.source.open_stream(&request).await?;
        debug!("consuming upstream stream");
        self.aggregator.consume(stream).await
    }
}

/// Final success text under the given citation policy.
pub fn render_text(result: AggregationResult, policy: CitationPolicy) -> String {
    let AggregationResult {
        mut text,
        citations,
        ..
    } = result;

    match (policy, citations) {
        (CitationPolicy::Append, Some(citations)) if !citations.is_empty() => {
            if !text.is_empty() {
                text.push_str("\n\n");
            }
            text.push_str("Sources:");
            for (index, citation) in citations.iter().enumerate() {
                text.push_str(&format!("\n{}. {}", index + 1, citation.display_line()));
            }
            text
        }
        _ => text,
    }
}
