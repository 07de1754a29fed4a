//! Upstream chunk sources.

pub mod http;
pub mod openai_compatible;
pub mod sse;

pub use openai_compatible::OpenAiCompatibleClient;

use async_trait::async_trait;
use futures::stream::BoxStream;

use crate::error::YachtsyError;
use crate::types::ChatRequest;

/// Lazy, finite sequence of raw upstream chunks.
pub type ChunkStream = BoxStream<'static, Result<serde_json::Value, YachtsyError>>;

/// Something that can open a streaming chat completion.
#[async_trait]
pub trait ChunkSource: Send + Sync {
    /// Short name used in logs.
    fn name(&self) -> &str;

    /// Issue the request and return the chunk sequence.
    ///
    /// Failing here is a request error; failures while iterating the
    /// returned stream are stream errors.
    async fn open_stream(&self, request: &ChatRequest) -> Result<ChunkStream, YachtsyError>;
}
