//! # Prompt Gateway
//!
//! OpenAI-compatible chat completion gateway with multi-provider failover.
//!
//! ## Features
//!
//! - **Failover Routing**: Providers are tried in configured order until one succeeds
//! - **Fast-Fail Provider**: One provider is always streamed with a short timeout
//! - **Experimental Route**: Allow-listed models behind a per-model circuit breaker
//! - **Streaming Support**: Server-sent events relayed chunk by chunk
//!
//! ## Gateway Mode
//!
//! ```rust,no_run
//! use prompt_gateway::{Config, Gateway};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = Config::from_file("config/gateway.yaml").await?;
//!     let gateway = Gateway::new(config)?;
//!     gateway.run().await?;
//!     Ok(())
//! }
//! ```

#![allow(missing_docs)]
#![warn(clippy::all)]
#![allow(clippy::module_inception)]

pub mod config;
pub mod core;
pub mod server;
pub mod utils;

// Re-export main types
pub use config::Config;
pub use utils::error::{GatewayError, Result};

pub use core::circuit_breaker::{CircuitBreakerRegistry, CircuitState};
pub use core::experimental::ExperimentalAdapter;
pub use core::providers::{
    HttpClientFactory, ProviderRegistry, UpstreamClient, UpstreamClientFactory, UpstreamError,
};
pub use core::router::{CompletionRouter, RouteBody, RouteContext, RouteResponse};
pub use core::types::{ChatCompletionRequest, ChatMessage};

use tracing::info;

/// A configured gateway, ready to serve
pub struct Gateway {
    server: server::HttpServer,
}

impl Gateway {
    /// Create a new gateway instance
    pub fn new(config: Config) -> Result<Self> {
        info!("Creating new gateway instance");
        let server = server::HttpServer::new(&config)?;
        Ok(Self { server })
    }

    /// Run the gateway server
    pub async fn run(self) -> Result<()> {
        info!("Starting prompt gateway {}", VERSION);
        self.server.start().await
    }
}

// Version information
/// Current version of the crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
/// Name of the crate
pub const NAME: &str = env!("CARGO_PKG_NAME");
/// Description of the crate
pub const DESCRIPTION: &str = env!("CARGO_PKG_DESCRIPTION");

/// Gateway build information
#[derive(Debug, Clone)]
pub struct BuildInfo {
    /// Version number
    pub version: &'static str,
    /// Build time, seconds since the epoch
    pub build_time: &'static str,
    /// Git commit hash
    pub git_hash: &'static str,
}

impl Default for BuildInfo {
    fn default() -> Self {
        Self {
            version: VERSION,
            build_time: option_env!("GATEWAY_BUILD_TIME").unwrap_or("unknown"),
            git_hash: option_env!("GATEWAY_GIT_HASH").unwrap_or("unknown"),
        }
    }
}

/// Build information baked in at compile time
pub fn build_info() -> BuildInfo {
    BuildInfo::default()
}
