//! Table of known upstream chunk formats.

use std::fmt;

use serde_json::Value;

use crate::types::{Chunk, ChunkKind, DeltaChunk, OutputTextDeltaChunk};

/// Decodes a raw chunk into one recognized shape, or `None` if it does not match.
pub type ChunkDecoder = fn(&Value) -> Option<Chunk>;

/// One entry of the format table: a discriminator and its decoder.
#[derive(Clone, Copy)]
pub struct ChunkFormat {
    pub kind: ChunkKind,
    pub decode: ChunkDecoder,
}

impl fmt::Debug for ChunkFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ChunkFormat")
            .field("kind", &self.kind)
            .finish_non_exhaustive()
    }
}

impl ChunkFormat {
    /// Chat Completions `choices[0].delta` chunks.
    pub const CHAT_COMPLETION: Self = Self {
        kind: ChunkKind::ChatCompletionDelta,
        decode: decode_chat_delta,
    };

    /// Responses API `response.output_text.delta` events.
    pub const OUTPUT_TEXT: Self = Self {
        kind: ChunkKind::OutputTextDelta,
        decode: decode_output_text,
    };

    /// Built-in formats, in the order they are tried.
    pub fn defaults() -> Vec<Self> {
        vec![Self::CHAT_COMPLETION, Self::OUTPUT_TEXT]
    }
}

fn decode_chat_delta(raw: &Value) -> Option<Chunk> {
    DeltaChunk::from_value(raw).map(Chunk::Delta)
}

fn decode_output_text(raw: &Value) -> Option<Chunk> {
    OutputTextDeltaChunk::from_value(raw).map(Chunk::OutputTextDelta)
}

/// Classify a raw chunk against every format in `formats`.
///
/// A chunk may match several formats; all matches are returned in table
/// order. A chunk matching none yields a single [`Chunk::Unrecognized`].
pub fn classify(raw: Value, formats: &[ChunkFormat]) -> Vec<Chunk> {
    let matched: Vec<Chunk> = formats
        .iter()
        .filter_map(|format| (format.decode)(&raw))
        .collect();

    if matched.is_empty() {
        vec![Chunk::Unrecognized(raw)]
    } else {
        matched
    }
}
