//! Routing configuration

use super::*;
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Failover routing settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RoutingConfig {
    /// Provider that is always streamed and gets the short timeout
    #[serde(default = "default_fast_fail_provider")]
    pub fast_fail_provider: String,
    /// Timeout for the fast-fail provider, in seconds
    #[serde(default = "default_fast_fail_timeout")]
    pub fast_fail_timeout_secs: u64,
    /// Timeout for every other provider, in seconds
    #[serde(default = "default_provider_timeout")]
    pub provider_timeout_secs: u64,
    /// Provider advertised as default by the model listing
    #[serde(default)]
    pub default_provider: Option<String>,
    /// Model advertised as default by the model listing
    #[serde(default)]
    pub default_model: Option<String>,
    /// Send a warmup request to the fast-fail provider on start
    #[serde(default = "default_true")]
    pub warmup_on_start: bool,
    /// Timeout for the warmup request, in seconds
    #[serde(default = "default_warmup_timeout")]
    pub warmup_timeout_secs: u64,
}

impl Default for RoutingConfig {
    fn default() -> Self {
        Self {
            fast_fail_provider: default_fast_fail_provider(),
            fast_fail_timeout_secs: default_fast_fail_timeout(),
            provider_timeout_secs: default_provider_timeout(),
            default_provider: None,
            default_model: None,
            warmup_on_start: true,
            warmup_timeout_secs: default_warmup_timeout(),
        }
    }
}

impl RoutingConfig {
    pub fn is_fast_fail(&self, provider_id: &str) -> bool {
        self.fast_fail_provider.eq_ignore_ascii_case(provider_id)
    }

    /// Client timeout for a provider
    pub fn timeout_for(&self, provider_id: &str) -> Duration {
        if self.is_fast_fail(provider_id) {
            Duration::from_secs(self.fast_fail_timeout_secs)
        } else {
            Duration::from_secs(self.provider_timeout_secs)
        }
    }

    pub fn validate(&self) -> Result<(), String> {
        if self.fast_fail_timeout_secs == 0 || self.provider_timeout_secs == 0 {
            return Err("Provider timeouts cannot be 0".to_string());
        }
        if self.warmup_timeout_secs == 0 {
            return Err("Warmup timeout cannot be 0".to_string());
        }
        Ok(())
    }
}

fn default_fast_fail_provider() -> String {
    "nvidia".to_string()
}

fn default_fast_fail_timeout() -> u64 {
    15
}

fn default_provider_timeout() -> u64 {
    180
}

fn default_warmup_timeout() -> u64 {
    120
}
