//! Upstream stream chunk shapes.
//!
//! The upstream endpoint may speak either the Chat Completions stream
//! format or the Responses stream format. Each raw JSON chunk is
//! classified into zero or more recognized [`Chunk`] variants; anything
//! else becomes [`Chunk::Unrecognized`] and is skipped by the aggregator.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use strum::{AsRefStr, Display, EnumString};

/// Finish marker value that makes a delta chunk terminal.
pub const FINISH_STOP: &str = "stop";

/// Discriminator of a recognized chunk shape.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumString, AsRefStr)]
pub enum ChunkKind {
    /// Chat Completions `choices[0].delta` chunk.
    #[strum(serialize = "chat.completion.chunk")]
    ChatCompletionDelta,
    /// Responses API `response.output_text.delta` event.
    #[strum(serialize = "response.output_text.delta")]
    OutputTextDelta,
}

/// A source reference attached to the terminal chat chunk.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Citation {
    Url(String),
    Reference {
        #[serde(default, skip_serializing_if = "Option::is_none")]
        title: Option<String>,
        url: String,
    },
    Other(Value),
}

impl Citation {
    /// Human-readable one-line rendering.
    pub fn display_line(&self) -> String {
        match self {
            Self::Url(url) => url.clone(),
            Self::Reference {
                title: Some(title),
                url,
            } => format!("{title} - {url}"),
            Self::Reference { title: None, url } => url.clone(),
            Self::Other(value) => value.to_string(),
        }
    }
}

/// Incremental chunk in the Chat Completions stream format.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DeltaChunk {
    pub content: Option<String>,
    pub finish_reason: Option<String>,
    pub citations: Option<Vec<Citation>>,
}

impl DeltaChunk {
    /// Decode from a raw chunk exposing a non-empty `choices` list.
    ///
    /// Only the first choice is considered.
    pub fn from_value(raw: &Value) -> Option<Self> {
        let choice = raw.get("choices")?.as_array()?.first()?;
        let content = choice
            .get("delta")
            .and_then(|delta| delta.get("content"))
            .and_then(Value::as_str)
            .map(str::to_owned);
        let finish_reason = choice
            .get("finish_reason")
            .and_then(Value::as_str)
            .map(str::to_owned);
        let citations = choice
            .get("citations")
            .filter(|value| !value.is_null())
            .map(parse_citations);

        Some(Self {
            content,
            finish_reason,
            citations,
        })
    }

    /// Whether this chunk carries the `stop` finish marker.
    pub fn is_terminal(&self) -> bool {
        self.finish_reason.as_deref() == Some(FINISH_STOP)
    }

    /// Text fragment to append, if any. Empty content counts as none.
    pub fn fragment(&self) -> Option<&str> {
        self.content.as_deref().filter(|text| !text.is_empty())
    }
}

fn parse_citations(value: &Value) -> Vec<Citation> {
    serde_json::from_value::<Vec<Citation>>(value.clone())
        .unwrap_or_else(|_| vec![Citation::Other(value.clone())])
}

/// Incremental chunk in the Responses stream format.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct OutputTextDeltaChunk {
    pub delta: Option<String>,
}

impl OutputTextDeltaChunk {
    /// Decode from a raw chunk whose `type` is `response.output_text.delta`.
    ///
    /// The fragment is read from `text.delta`, falling back to the
    /// top-level `delta` field.
    pub fn from_value(raw: &Value) -> Option<Self> {
        let event_type = raw.get("type")?.as_str()?;
        if event_type != ChunkKind::OutputTextDelta.as_ref() {
            return None;
        }
        let delta = raw
            .get("text")
            .and_then(|text| text.get("delta"))
            .or_else(|| raw.get("delta"))
            .and_then(Value::as_str)
            .map(str::to_owned);
        Some(Self { delta })
    }

    /// Text fragment to append. Absent deltas contribute an empty string.
    pub fn fragment(&self) -> &str {
        self.delta.as_deref().unwrap_or_default()
    }
}

/// One classified upstream chunk.
#[derive(Debug, Clone, PartialEq)]
pub enum Chunk {
    Delta(DeltaChunk),
    OutputTextDelta(OutputTextDeltaChunk),
    /// A chunk matching no known shape. Contributes nothing.
    Unrecognized(Value),
}

impl Chunk {
    /// Discriminator of a recognized chunk.
    pub fn kind(&self) -> Option<ChunkKind> {
        match self {
            Self::Delta(_) => Some(ChunkKind::ChatCompletionDelta),
            Self::OutputTextDelta(_) => Some(ChunkKind::OutputTextDelta),
            Self::Unrecognized(_) => None,
        }
    }

    pub fn is_recognized(&self) -> bool {
        !matches!(self, Self::Unrecognized(_))
    }

    /// Text this chunk contributes to the aggregate, if any.
    pub fn fragment(&self) -> Option<&str> {
        match self {
            Self::Delta(delta) => delta.fragment(),
            Self::OutputTextDelta(output) => Some(output.fragment()),
            Self::Unrecognized(_) => None,
        }
    }

    /// Citations to hold when this chunk is terminal.
    pub fn terminal_citations(&self) -> Option<&[Citation]> {
        match self {
            Self::Delta(delta) if delta.is_terminal() => delta.citations.as_deref(),
            _ => None,
        }
    }
}
