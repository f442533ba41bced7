//! Common test utilities for prompt-gateway
//!
//! - Mock upstream servers speaking the OpenAI chat completions protocol
//! - Provider and gateway config fixtures
//! - Custom assertions

pub mod assertions;
pub mod fixtures;

// Re-export commonly used items
pub use fixtures::{ConfigFactory, MockUpstream};
