//! Upstream providers
//!
//! Configured endpoints, the client factory that binds them to HTTP clients,
//! and the error taxonomy every upstream call collapses into.

pub mod client;
pub mod error;
pub mod registry;
pub mod sse;

#[cfg(test)]
pub(crate) mod testing;

pub use client::{
    ClientSpec, HttpClientFactory, OpenAiCompatibleClient, PLACEHOLDER_CREDENTIAL,
    UpstreamClient, UpstreamClientFactory,
};
pub use error::{UpstreamError, UpstreamErrorKind};
pub use registry::ProviderRegistry;
