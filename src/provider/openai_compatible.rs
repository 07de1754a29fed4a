//! OpenAI-compatible chat-completion stream client.

use std::sync::Arc;

use async_trait::async_trait;
use tracing::debug;

use crate::config::YachtsyConfig;
use crate::error::YachtsyError;
use crate::types::ChatRequest;

use super::http::{bearer_headers, build_client, status_to_error};
use super::sse::decode_sse;
use super::{ChunkSource, ChunkStream};

/// Streams chat completions from `{base_url}/chat/completions`.
#[derive(Debug, Clone)]
pub struct OpenAiCompatibleClient {
    client: reqwest::Client,
    config: Arc<YachtsyConfig>,
}

impl OpenAiCompatibleClient {
    pub fn new(config: Arc<YachtsyConfig>) -> Result<Self, YachtsyError> {
        let client = build_client(&config)?;
        Ok(Self { client, config })
    }

    pub fn endpoint(&self) -> String {
        format!("{}/chat/completions", self.config.base_url())
    }
}

#[async_trait]
impl ChunkSource for OpenAiCompatibleClient {
    fn name(&self) -> &str {
        "openai-compatible"
    }

    async fn open_stream(&self, request: &ChatRequest) -> Result<ChunkStream, YachtsyError> {
        let url = self.endpoint();

        debug!(model = %request.model, url = %url, "opening chat completion stream");

        let resp = self
            .client
            .post(&url)
            .headers(bearer_headers(self.config.api_key()))
            .json(request)
            .send()
            .await?;

        let status = resp.status();
        if !status.is_success() {
            let body_text = resp.text().await.unwrap_or_default();
            return Err(status_to_error(status.as_u16(), &body_text));
        }

        debug!(status = status.as_u16(), "chat completion stream opened");

        Ok(decode_sse(resp.bytes_stream()))
    }
}
