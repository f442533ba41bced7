//! Core error types for the Gateway

use crate::core::providers::error::UpstreamError;
use thiserror::Error;

/// Result type alias for the Gateway
pub type Result<T> = std::result::Result<T, GatewayError>;

/// Main error type for the Gateway
#[derive(Error, Debug)]
pub enum GatewayError {
    /// Configuration errors
    #[error("Configuration error: {0}")]
    Config(String),

    /// Neither the registry nor the request resolved any provider
    #[error("LLM backend not configured. Set PROVIDERS and {{PROVIDER}}_BASE_URL, or LLM_BACKEND_URL")]
    NoProviderConfigured,

    /// No usable credential for a provider that requires one
    #[error("Provider \"{provider}\" has no API key configured")]
    MissingCredential { provider: String },

    /// Model is not on the experimental allow-list
    #[error("Model {model} is not marked as experimental-chat")]
    IneligibleModel { provider: String, model: String },

    /// Experimental model is blocked by its circuit breaker
    #[error("Experimental model {model} is temporarily circuit-open, retry later")]
    CircuitOpen { provider: String, model: String },

    /// Single upstream failure surfaced as-is
    #[error("{source}")]
    Upstream {
        provider: String,
        #[source]
        source: UpstreamError,
    },

    /// Every provider in the failover chain failed; carries the last failure
    #[error("All providers failed: {0}")]
    AllProvidersFailed(UpstreamError),

    /// Bad request errors
    #[error("Bad request: {0}")]
    BadRequest(String),

    /// Serialization errors
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// YAML parsing errors
    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    /// IO errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// HTTP server errors
    #[error("Server error: {0}")]
    Server(String),
}
