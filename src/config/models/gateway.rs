//! Main gateway configuration

use super::*;
use serde::{Deserialize, Serialize};

/// Main gateway configuration
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct GatewayConfig {
    /// Server configuration
    #[serde(default)]
    pub server: ServerConfig,
    /// Providers in failover order
    #[serde(default)]
    pub providers: Vec<ProviderConfig>,
    /// Failover routing settings
    #[serde(default)]
    pub routing: RoutingConfig,
    /// Experimental model route
    #[serde(default)]
    pub experimental: ExperimentalConfig,
}
