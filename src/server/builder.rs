//! Server builder and run_server function

use crate::config::Config;
use crate::server::server::HttpServer;
use crate::utils::error::{GatewayError, Result};
use std::path::{Path, PathBuf};
use tracing::info;

/// Configuration file picked up when none is given explicitly
pub const DEFAULT_CONFIG_PATH: &str = "config/gateway.yaml";

/// Server builder for easier configuration
pub struct ServerBuilder {
    config: Option<Config>,
}

impl ServerBuilder {
    /// Create a new server builder
    pub fn new() -> Self {
        Self { config: None }
    }

    /// Set configuration
    pub fn with_config(mut self, config: Config) -> Self {
        self.config = Some(config);
        self
    }

    /// Build the HTTP server
    pub fn build(self) -> Result<HttpServer> {
        let config = self
            .config
            .ok_or_else(|| GatewayError::Config("Configuration is required".to_string()))?;

        HttpServer::new(&config)
    }
}

impl Default for ServerBuilder {
    fn default() -> Self {
        Self::new()
    }
}

/// Resolve configuration: an explicit file, else the default file if it
/// exists, else the environment
pub async fn load_config(config_path: Option<&Path>) -> Result<Config> {
    match config_path {
        Some(path) => Config::from_file(path).await,
        None if Path::new(DEFAULT_CONFIG_PATH).exists() => {
            Config::from_file(DEFAULT_CONFIG_PATH).await
        }
        None => Config::from_env(),
    }
}

/// Run the server with automatic configuration loading
pub async fn run_server(config_path: Option<PathBuf>) -> Result<()> {
    info!("Starting prompt gateway");

    let config = load_config(config_path.as_deref()).await?;
    let server = ServerBuilder::new().with_config(config).build()?;

    info!("Server starting at: http://{}", server.config().address());
    info!("API Endpoints:");
    info!("   GET  /health - Health check");
    info!("   GET  /v1/models - Model list");
    info!("   POST /v1/chat/completions - Chat completions");

    server.start().await
}
