//! Outbound SSE framing

use super::types::Event;
use crate::core::providers::UpstreamError;
use crate::core::types::CompletionStream;
use actix_web::web;
use futures::stream::{Stream, StreamExt};
use tracing::{debug, error};

/// Frame upstream chunks as an SSE body.
///
/// Each chunk becomes `data: <json>\n\n` in upstream order, followed by
/// `data: [DONE]\n\n`. An upstream error ends the body with that error, so
/// the connection is aborted and no terminator is sent.
pub fn sse_body(
    mut chunks: CompletionStream,
) -> impl Stream<Item = Result<web::Bytes, UpstreamError>> + Send + 'static {
    async_stream::stream! {
        while let Some(chunk) = chunks.next().await {
            match chunk {
                Ok(value) => yield Ok(Event::new().data(&value.to_string()).to_bytes()),
                Err(e) => {
                    error!(error = %e, "Upstream stream error");
                    yield Err(e);
                    return;
                }
            }
        }
        debug!("Stream completed");
        yield Ok(Event::done().to_bytes());
    }
}
