//! Configuration data models
//!
//! This module defines all configuration structures used throughout the gateway.

pub mod experimental;
pub mod gateway;
pub mod provider;
pub mod routing;
pub mod server;

pub use experimental::*;
pub use gateway::*;
pub use provider::*;
pub use routing::*;
pub use server::*;

/// Default values for configuration
pub fn default_host() -> String {
    "0.0.0.0".to_string()
}

/// Default server port
pub fn default_port() -> u16 {
    3000
}

pub fn default_true() -> bool {
    true
}
