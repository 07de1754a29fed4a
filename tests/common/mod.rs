//! Shared test helpers and scripted chunk source.

#![allow(dead_code)]

use std::sync::Mutex;

use async_trait::async_trait;
use serde_json::{json, Value};

use yachtsy_mcp::error::YachtsyError;
use yachtsy_mcp::provider::{ChunkSource, ChunkStream};
use yachtsy_mcp::types::ChatRequest;

/// A chunk source that replays a canned sequence.
pub struct ScriptedSource {
    items: Mutex<Option<Vec<Result<Value, YachtsyError>>>>,
    open_error: Mutex<Option<YachtsyError>>,
    requests: Mutex<Vec<ChatRequest>>,
}

impl ScriptedSource {
    pub fn new(items: Vec<Result<Value, YachtsyError>>) -> Self {
        Self {
            items: Mutex::new(Some(items)),
            open_error: Mutex::new(None),
            requests: Mutex::new(Vec::new()),
        }
    }

    /// A source whose `open_stream` fails with `err`.
    pub fn failing(err: YachtsyError) -> Self {
        let source = Self::new(Vec::new());
        *source.open_error.lock().unwrap() = Some(err);
        source
    }

    /// Requests seen so far.
    pub fn requests(&self) -> Vec<ChatRequest> {
        self.requests.lock().unwrap().clone()
    }
}

#[async_trait]
impl ChunkSource for ScriptedSource {
    fn name(&self) -> &str {
        "scripted"
    }

    async fn open_stream(&self, request: &ChatRequest) -> Result<ChunkStream, YachtsyError> {
        self.requests.lock().unwrap().push(request.clone());
        if let Some(err) = self.open_error.lock().unwrap().take() {
            return Err(err);
        }
        let items = self.items.lock().unwrap().take().unwrap_or_default();
        Ok(Box::pin(futures::stream::iter(items)))
    }
}

/// Chat-completion delta chunk.
pub fn delta(content: &str) -> Value {
    json!({
        "object": "chat.completion.chunk",
        "choices": [{ "index": 0, "delta": { "content": content } }]
    })
}

/// Terminal chat-completion chunk carrying citations.
pub fn stop_with_citations(content: &str, citations: Value) -> Value {
    json!({
        "object": "chat.completion.chunk",
        "choices": [{
            "index": 0,
            "delta": { "content": content },
            "finish_reason": "stop",
            "citations": citations
        }]
    })
}

/// Responses-format text delta.
pub fn output_text(delta: &str) -> Value {
    json!({ "type": "response.output_text.delta", "text": { "delta": delta } })
}

/// Render chunks as an SSE body terminated by `[DONE]`.
pub fn sse_body(chunks: &[Value]) -> String {
    let mut body = String::new();
    for chunk in chunks {
        body.push_str("data: ");
        body.push_str(&chunk.to_string());
        body.push_str("\n\n");
    }
    body.push_str("data: [DONE]\n\n");
    body
}
