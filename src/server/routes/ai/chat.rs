//! Chat completions endpoint

use super::context::route_context;
use crate::core::router::RouteBody;
use crate::core::streaming::sse_body;
use crate::core::types::ChatCompletionRequest;
use crate::server::routes::PROVIDER_HEADER;
use crate::server::state::AppState;
use crate::utils::error::GatewayError;
use actix_web::http::header::{CACHE_CONTROL, CONTENT_TYPE};
use actix_web::{HttpRequest, HttpResponse, web};
use tracing::{error, info, warn};

/// Chat completions endpoint
///
/// OpenAI-compatible chat completions API. Streams SSE when the body asks for
/// `stream: true`, otherwise returns the completion object. The serving
/// provider is named in the `X-Provider-Id` response header.
pub async fn chat_completions(
    state: web::Data<AppState>,
    req: HttpRequest,
    request: web::Json<ChatCompletionRequest>,
) -> Result<HttpResponse, GatewayError> {
    let request = request.into_inner();
    info!(model = %request.model, stream = request.wants_stream(), "Chat completion request");

    if let Err(e) = request.validate() {
        warn!("Invalid chat completion request: {}", e);
        return Err(GatewayError::bad_request(e));
    }

    let ctx = route_context(&req);
    let response = state.router.route(request, ctx).await.inspect_err(|e| {
        error!(error = %e, "Chat completion failed");
    })?;

    Ok(match response.body {
        RouteBody::Completion(body) => HttpResponse::Ok()
            .insert_header((PROVIDER_HEADER, response.provider))
            .json(body),
        RouteBody::Stream(chunks) => HttpResponse::Ok()
            .insert_header((PROVIDER_HEADER, response.provider))
            .insert_header((CONTENT_TYPE, "text/event-stream"))
            .insert_header((CACHE_CONTROL, "no-cache"))
            .insert_header(("Connection", "keep-alive"))
            .streaming(sse_body(chunks)),
    })
}
