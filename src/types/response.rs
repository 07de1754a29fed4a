//! Aggregation results and the caller-visible tool outcome.

use super::chunk::Citation;

/// Final result after consuming an upstream chunk stream.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AggregationResult {
    /// Recognized fragments concatenated in arrival order.
    pub text: String,
    /// Citations from the last terminal chat chunk that carried any.
    pub citations: Option<Vec<Citation>>,
    /// Number of raw chunks consumed.
    pub chunks_seen: usize,
    /// Raw chunks that matched no known shape.
    pub chunks_skipped: usize,
}

/// Outcome of one tool invocation. Exactly one variant is produced per call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ToolResponse {
    Success { text: String },
    Error { message: String },
}

impl ToolResponse {
    pub fn success(text: impl Into<String>) -> Self {
        Self::Success { text: text.into() }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self::Error {
            message: message.into(),
        }
    }

    pub fn is_error(&self) -> bool {
        matches!(self, Self::Error { .. })
    }

    /// The single text payload, whichever variant this is.
    pub fn text(&self) -> &str {
        match self {
            Self::Success { text } => text,
            Self::Error { message } => message,
        }
    }
}
