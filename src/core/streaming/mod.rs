//! Streaming support
//!
//! SSE framing for streamed responses, and aggregation of a chunk stream into
//! a single completion for callers that did not ask to stream.

pub mod aggregate;
pub mod handler;
pub mod types;

pub use aggregate::collect_completion;
pub use handler::sse_body;
pub use types::Event;
