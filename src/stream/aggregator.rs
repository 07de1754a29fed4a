//! Merge an upstream chunk stream into one text result.

use futures::{Stream, StreamExt};
use serde_json::Value;
use tracing::{debug, trace};

use crate::error::{BoxError, YachtsyError};
use crate::types::{AggregationResult, Chunk};

use super::formats::{classify, ChunkFormat};

/// Consumes chunk streams using a table of known chunk formats.
///
/// Chunk-level problems are lenient: a chunk matching no format is
/// skipped. Sequence-level problems are strict: if the stream itself
/// yields an error, the partial text is discarded and a stream error is
/// returned.
#[derive(Debug, Clone)]
pub struct Aggregator {
    formats: Vec<ChunkFormat>,
}

impl Default for Aggregator {
    fn default() -> Self {
        Self::new()
    }
}

impl Aggregator {
    /// Aggregator recognizing the built-in chunk formats.
    pub fn new() -> Self {
        Self::with_formats(ChunkFormat::defaults())
    }

    /// Aggregator recognizing exactly the given formats.
    pub fn with_formats(formats: Vec<ChunkFormat>) -> Self {
        Self { formats }
    }

    pub fn formats(&self) -> &[ChunkFormat] {
        &self.formats
    }

    /// Start a fresh accumulation buffer.
    pub fn accumulator(&self) -> Accumulator<'_> {
        Accumulator {
            formats: &self.formats,
            result: AggregationResult::default(),
        }
    }

    /// Consume `chunks` in arrival order.
    pub async fn consume<S, E>(&self, chunks: S) -> Result<AggregationResult, YachtsyError>
    where
        S: Stream<Item = Result<Value, E>>,
        E: Into<BoxError>,
    {
        let mut accumulator = self.accumulator();
        let mut chunks = std::pin::pin!(chunks);

        while let Some(item) = chunks.next().await {
            match item {
                Ok(raw) => accumulator.push(raw),
                Err(cause) => {
                    let err = YachtsyError::stream(cause);
                    debug!(
                        chunks_seen = accumulator.result.chunks_seen,
                        error = %err,
                        "chunk stream failed; discarding partial text"
                    );
                    return Err(err);
                }
            }
        }

        Ok(accumulator.finish())
    }
}

/// Accumulation state for one stream consumption.
#[derive(Debug)]
pub struct Accumulator<'a> {
    formats: &'a [ChunkFormat],
    result: AggregationResult,
}

impl Accumulator<'_> {
    /// Fold one raw chunk into the result.
    pub fn push(&mut self, raw: Value) {
        self.result.chunks_seen += 1;
        let chunks = classify(raw, self.formats);

        for chunk in &chunks {
            self.absorb(chunk);
        }
    }

    fn absorb(&mut self, chunk: &Chunk) {
        if !chunk.is_recognized() {
            trace!("skipping unrecognized chunk");
            self.result.chunks_skipped += 1;
            return;
        }
        if let Some(fragment) = chunk.fragment() {
            self.result.text.push_str(fragment);
        }
        if let Some(citations) = chunk.terminal_citations() {
            self.result.citations = Some(citations.to_vec());
        }
    }

    /// Text accumulated so far.
    pub fn text(&self) -> &str {
        &self.result.text
    }

    pub fn finish(self) -> AggregationResult {
        debug!(
            chunks_seen = self.result.chunks_seen,
            chunks_skipped = self.result.chunks_skipped,
            text_len = self.result.text.len(),
            citations = self.result.citations.as_ref().map_or(0, Vec::len),
            "chunk stream aggregated"
        );
        self.result
    }
}
