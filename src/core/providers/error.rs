//! Upstream call errors
//!
//! Every failure of a single upstream call collapses into one closed set of
//! kinds so the router and the experimental adapter never inspect transport
//! error types directly.
//!
//! | Kind | Source | Surfaced status |
//! |------|--------|-----------------|
//! | Timeout | client timeout elapsed | 500 |
//! | HttpStatus(code) | non-2xx upstream response | code |
//! | ConnectionFailed | connect / transport failure | 500 |
//! | Unknown | decode failures, anything else | 500 |

use serde_json::Value;

/// Classification of an upstream failure
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UpstreamErrorKind {
    Timeout,
    HttpStatus(u16),
    ConnectionFailed,
    Unknown,
}

/// A failed upstream call
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
#[error("{message}")]
pub struct UpstreamError {
    pub kind: UpstreamErrorKind,
    pub message: String,
    /// Provider-supplied error code, when the upstream body carried one
    pub code: Option<String>,
}

impl UpstreamError {
    pub fn new(kind: UpstreamErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
            code: None,
        }
    }

    pub fn timeout(message: impl Into<String>) -> Self {
        Self::new(UpstreamErrorKind::Timeout, message)
    }

    pub fn http_status(status: u16, message: impl Into<String>) -> Self {
        Self::new(UpstreamErrorKind::HttpStatus(status), message)
    }

    pub fn connection_failed(message: impl Into<String>) -> Self {
        Self::new(UpstreamErrorKind::ConnectionFailed, message)
    }

    pub fn unknown(message: impl Into<String>) -> Self {
        Self::new(UpstreamErrorKind::Unknown, message)
    }

    pub fn with_code(mut self, code: impl Into<String>) -> Self {
        self.code = Some(code.into());
        self
    }

    /// HTTP status reported by the upstream, if the failure was a status error
    pub fn status(&self) -> Option<u16> {
        match self.kind {
            UpstreamErrorKind::HttpStatus(code) => Some(code),
            _ => None,
        }
    }

    /// Build an error from a non-2xx response body.
    ///
    /// OpenAI-compatible upstreams answer `{"error": {"message", "code"}}`; other
    /// bodies are kept verbatim as the message.
    pub fn from_response_body(status: u16, body: &str) -> Self {
        let parsed: Option<Value> = serde_json::from_str(body).ok();
        let detail = parsed.as_ref().and_then(|v| v.get("error"));

        let message = detail
            .and_then(|e| e.get("message").or(Some(e)))
            .and_then(Value::as_str)
            .map(str::to_string)
            .filter(|m| !m.is_empty())
            .unwrap_or_else(|| {
                if body.trim().is_empty() {
                    format!("upstream returned status {}", status)
                } else {
                    body.trim().to_string()
                }
            });

        let code = detail.and_then(|e| e.get("code")).and_then(|c| match c {
            Value::String(s) => Some(s.clone()),
            Value::Number(n) => Some(n.to_string()),
            _ => None,
        });

        let err = Self::http_status(status, message);
        match code {
            Some(code) => err.with_code(code),
            None => err,
        }
    }
}

impl From<reqwest::Error> for UpstreamError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            Self::timeout(format!("request timed out: {}", err))
        } else if let Some(status) = err.status() {
            Self::http_status(status.as_u16(), err.to_string())
        } else if err.is_connect() || err.is_request() || err.is_body() {
            Self::connection_failed(err.to_string())
        } else {
            Self::unknown(err.to_string())
        }
    }
}
