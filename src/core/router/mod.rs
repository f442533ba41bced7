//! Completion router
//!
//! Resolves which upstream serves a chat completion request and walks the
//! provider failover chain until one succeeds.
//!
//! ## Module Structure
//!
//! - `model_spec` - `provider:model` parsing
//! - `router` - `CompletionRouter` and its failover loop

pub mod model_spec;
pub mod router;

#[cfg(test)]
mod tests;

pub use model_spec::RequestedModelSpec;
pub use router::{CompletionRouter, RouteBody, RouteContext, RouteResponse};
