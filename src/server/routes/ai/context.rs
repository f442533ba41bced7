//! Per-request routing inputs taken from headers

use crate::core::router::RouteContext;
use crate::server::routes::PROVIDER_HEADER;
use actix_web::HttpRequest;
use actix_web::http::header::AUTHORIZATION;
use tracing::debug;

/// Bearer tokens with these prefixes are client placeholders, not credentials
const PLACEHOLDER_PREFIXES: [&str; 2] = ["dummy", "sk-placeholder"];

/// Caller credential from `Authorization: Bearer`, ignoring placeholders
pub fn caller_credential(req: &HttpRequest) -> Option<String> {
    let value = req.headers().get(AUTHORIZATION)?.to_str().ok()?;
    let token = value.strip_prefix("Bearer ")?.trim();

    if token.is_empty() || PLACEHOLDER_PREFIXES.iter().any(|p| token.starts_with(p)) {
        debug!("Ignoring placeholder bearer token");
        return None;
    }
    Some(token.to_string())
}

/// Build the routing context for one request
pub fn route_context(req: &HttpRequest) -> RouteContext {
    let provider_override = req
        .headers()
        .get(PROVIDER_HEADER)
        .and_then(|v| v.to_str().ok())
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(str::to_string);

    RouteContext {
        credential: caller_credential(req),
        provider_override,
    }
}
