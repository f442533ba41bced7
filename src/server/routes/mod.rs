//! HTTP route modules

pub mod ai;

use actix_web::web;

/// Header naming the provider: request override on the way in, serving
/// provider on the way out
pub const PROVIDER_HEADER: &str = "X-Provider-Id";

/// Configure all API routes
pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    ai::configure_routes(cfg);
}
