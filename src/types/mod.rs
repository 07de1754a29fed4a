//! Core types.

pub mod chunk;
pub mod message;
pub mod response;

pub use chunk::*;
pub use message::*;
pub use response::*;
