//! Experimental model route configuration

use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Settings for the circuit-broken experimental upstream
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExperimentalConfig {
    /// Provider prefix that selects the experimental route
    #[serde(default = "default_route_id")]
    pub route_id: String,
    /// Fixed upstream endpoint
    #[serde(default = "default_base_url")]
    pub base_url: String,
    /// Credential used when the caller supplies none
    #[serde(default)]
    pub api_key: String,
    /// Model ids eligible for the experimental route
    #[serde(default = "default_models")]
    pub models: Vec<String>,
    /// Client timeout, in seconds
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

impl Default for ExperimentalConfig {
    fn default() -> Self {
        Self {
            route_id: default_route_id(),
            base_url: default_base_url(),
            api_key: String::new(),
            models: default_models(),
            timeout_secs: default_timeout_secs(),
        }
    }
}

impl ExperimentalConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    pub fn validate(&self) -> Result<(), String> {
        if self.route_id.trim().is_empty() {
            return Err("Experimental route id cannot be empty".to_string());
        }
        if self.timeout_secs == 0 {
            return Err("Experimental timeout cannot be 0".to_string());
        }
        Ok(())
    }
}

fn default_route_id() -> String {
    "volces-experimental".to_string()
}

fn default_base_url() -> String {
    "https://ark.cn-beijing.volces.com/api/v3".to_string()
}

fn default_models() -> Vec<String> {
    vec![
        "ep-m-20260104054639-v6dm6".to_string(),
        "ep-m-20260104055910-gtzqr".to_string(),
    ]
}

fn default_timeout_secs() -> u64 {
    120
}
