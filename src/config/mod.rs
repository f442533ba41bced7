//! Configuration management for the Gateway
//!
//! This module handles loading, validation, and management of all gateway configuration.

pub mod loader;
pub mod models;

pub use loader::load_providers;
pub use models::*;

use crate::utils::error::{GatewayError, Result};
use std::collections::HashMap;
use std::path::Path;
use tracing::{debug, info};
use url::Url;

/// Main configuration struct for the Gateway
#[derive(Debug, Clone, Default)]
pub struct Config {
    /// Gateway configuration
    pub gateway: GatewayConfig,
}

impl Config {
    /// Load configuration from a YAML file
    pub async fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        info!("Loading configuration from: {:?}", path);

        let content = tokio::fs::read_to_string(path)
            .await
            .map_err(|e| GatewayError::Config(format!("Failed to read config file: {}", e)))?;

        let mut gateway: GatewayConfig = serde_yaml::from_str(&content)
            .map_err(|e| GatewayError::Config(format!("Failed to parse config: {}", e)))?;
        gateway.providers = gateway
            .providers
            .into_iter()
            .map(ProviderConfig::normalized)
            .collect();
        gateway.experimental.base_url = normalize_base_url(&gateway.experimental.base_url);

        let config = Self { gateway };
        config.validate()?;

        debug!("Configuration loaded successfully");
        Ok(config)
    }

    /// Load configuration from the process environment (and `.env`, if present)
    pub fn from_env() -> Result<Self> {
        info!("Loading configuration from environment variables");

        if let Ok(path) = dotenvy::dotenv() {
            debug!("Loaded environment overrides from {:?}", path);
        }
        let vars: HashMap<String, String> = std::env::vars().collect();
        Self::from_vars(&vars)
    }

    /// Load configuration from an explicit key/value map
    pub fn from_vars(vars: &HashMap<String, String>) -> Result<Self> {
        let config = Self {
            gateway: GatewayConfig::from_vars(vars)?,
        };
        config.validate()?;
        Ok(config)
    }

    /// Get server configuration
    pub fn server(&self) -> &ServerConfig {
        &self.gateway.server
    }

    /// Get providers in failover order
    pub fn providers(&self) -> &[ProviderConfig] {
        &self.gateway.providers
    }

    /// Get routing settings
    pub fn routing(&self) -> &RoutingConfig {
        &self.gateway.routing
    }

    /// Get experimental route settings
    pub fn experimental(&self) -> &ExperimentalConfig {
        &self.gateway.experimental
    }

    /// Validate the entire configuration
    pub fn validate(&self) -> Result<()> {
        debug!("Validating configuration");

        self.gateway
            .server
            .validate()
            .map_err(|e| GatewayError::Config(format!("Server config error: {}", e)))?;

        self.gateway
            .routing
            .validate()
            .map_err(|e| GatewayError::Config(format!("Routing config error: {}", e)))?;

        self.gateway
            .experimental
            .validate()
            .map_err(|e| GatewayError::Config(format!("Experimental config error: {}", e)))?;
        validate_endpoint(&self.gateway.experimental.base_url, "experimental base_url")?;

        for provider in &self.gateway.providers {
            if provider.id.is_empty() {
                return Err(GatewayError::Config("Provider id cannot be empty".to_string()));
            }
            validate_endpoint(&provider.base_url, &format!("provider {} base_url", provider.id))?;
        }

        debug!("Configuration validation completed");
        Ok(())
    }

    /// Convert to YAML string
    pub fn to_yaml(&self) -> Result<String> {
        serde_yaml::to_string(&self.gateway)
            .map_err(|e| GatewayError::Config(format!("Failed to serialize config to YAML: {}", e)))
    }
}

/// Endpoints must be absolute http(s) URLs
fn validate_endpoint(url_str: &str, context: &str) -> Result<()> {
    let url = Url::parse(url_str)
        .map_err(|e| GatewayError::Config(format!("{} has invalid URL format: {}", context, e)))?;

    match url.scheme() {
        "http" | "https" => Ok(()),
        scheme => Err(GatewayError::Config(format!(
            "{} must use http:// or https:// scheme, got: {}",
            context, scheme
        ))),
    }
}
