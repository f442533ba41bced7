//! HTTP response handling for errors

use super::types::GatewayError;
use actix_web::http::StatusCode;
use actix_web::{HttpResponse, ResponseError};

impl GatewayError {
    /// Error type label used when the envelope carries no provider tag
    fn error_type(&self) -> &'static str {
        match self {
            GatewayError::Config(_) | GatewayError::NoProviderConfigured => "config_error",
            GatewayError::MissingCredential { .. } => "authentication_error",
            GatewayError::IneligibleModel { .. } | GatewayError::BadRequest(_) => {
                "invalid_request_error"
            }
            GatewayError::CircuitOpen { .. } => "circuit_open",
            GatewayError::Upstream { .. } | GatewayError::AllProvidersFailed(_) => "api_error",
            _ => "proxy_error",
        }
    }

    fn upstream_code(&self) -> Option<String> {
        match self {
            GatewayError::Upstream { source, .. } | GatewayError::AllProvidersFailed(source) => {
                source.code.clone()
            }
            _ => None,
        }
    }

    /// Body of the error envelope
    pub fn to_error_response(&self) -> ErrorResponse {
        let message = match self {
            GatewayError::Upstream { source, .. } | GatewayError::AllProvidersFailed(source) => {
                source.message.clone()
            }
            GatewayError::Io(_) | GatewayError::Server(_) => "Internal server error".to_string(),
            _ => self.to_string(),
        };

        let provider = self.provider_tag().map(str::to_string);
        let error_type = if provider.is_some() {
            None
        } else {
            Some(self.error_type().to_string())
        };

        ErrorResponse {
            error: ErrorDetail {
                message,
                error_type,
                provider,
                code: self.upstream_code(),
            },
        }
    }
}

impl ResponseError for GatewayError {
    fn status_code(&self) -> StatusCode {
        match self {
            GatewayError::MissingCredential { .. } => StatusCode::UNAUTHORIZED,
            GatewayError::IneligibleModel { .. } | GatewayError::BadRequest(_) => {
                StatusCode::BAD_REQUEST
            }
            GatewayError::CircuitOpen { .. } => StatusCode::SERVICE_UNAVAILABLE,
            GatewayError::Upstream { source, .. } | GatewayError::AllProvidersFailed(source) => {
                source
                    .status()
                    .and_then(|code| StatusCode::from_u16(code).ok())
                    .unwrap_or(StatusCode::INTERNAL_SERVER_ERROR)
            }
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        HttpResponse::build(self.status_code()).json(self.to_error_response())
    }
}

/// Standard error response format
#[derive(Debug, serde::Serialize, serde::Deserialize)]
pub struct ErrorResponse {
    pub error: ErrorDetail,
}

/// Error detail structure
#[derive(Debug, serde::Serialize, serde::Deserialize)]
pub struct ErrorDetail {
    pub message: String,
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub error_type: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub provider: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub code: Option<String>,
}
