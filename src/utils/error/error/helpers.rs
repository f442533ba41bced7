//! Helper functions for creating specific error types

use super::types::GatewayError;
use crate::core::providers::error::UpstreamError;

/// Helper functions for creating specific errors
impl GatewayError {
    pub fn config<S: Into<String>>(message: S) -> Self {
        Self::Config(message.into())
    }

    pub fn bad_request<S: Into<String>>(message: S) -> Self {
        Self::BadRequest(message.into())
    }

    pub fn server<S: Into<String>>(message: S) -> Self {
        Self::Server(message.into())
    }

    pub fn upstream<S: Into<String>>(provider: S, source: UpstreamError) -> Self {
        Self::Upstream {
            provider: provider.into(),
            source,
        }
    }

    /// Provider tag carried into the error envelope, if any
    pub fn provider_tag(&self) -> Option<&str> {
        match self {
            Self::MissingCredential { provider }
            | Self::IneligibleModel { provider, .. }
            | Self::CircuitOpen { provider, .. }
            | Self::Upstream { provider, .. } => Some(provider),
            Self::AllProvidersFailed(_) => Some(ALL_FAILED_TAG),
            _ => None,
        }
    }
}

/// Envelope tag for an exhausted failover chain
pub const ALL_FAILED_TAG: &str = "all_failed";
