//! Streaming response aggregation.

pub mod aggregator;
pub mod formats;

pub use aggregator::{Accumulator, Aggregator};
pub use formats::{classify, ChunkDecoder, ChunkFormat};
