//! AI API endpoints (OpenAI compatible)

mod chat;
mod context;
mod models;

pub use chat::chat_completions;
pub use context::{caller_credential, route_context};
pub use models::{ModelsResponse, list_models};

use actix_web::web;

/// Configure AI API routes
pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/v1")
            .route("/chat/completions", web::post().to(chat_completions))
            .route("/models", web::get().to(list_models)),
    );
}
