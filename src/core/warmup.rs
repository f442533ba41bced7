//! Fast-fail provider warmup
//!
//! Cold upstreams answer the first request slowly. One `ping` on startup, with
//! a generous timeout, absorbs that latency outside any user request.

use crate::config::RoutingConfig;
use crate::core::providers::{ClientSpec, ProviderRegistry, UpstreamClientFactory, UpstreamError};
use crate::core::types::{ChatCompletionRequest, ChatMessage};
use std::time::Duration;
use tracing::{debug, info, warn};

const WARMUP_PROMPT: &str = "ping";

/// Send one non-streaming request to the fast-fail provider.
///
/// Returns `Ok(false)` when that provider is not configured. Failures are
/// returned for the caller to log; they never affect routing.
pub async fn warmup_fast_fail_provider(
    registry: &ProviderRegistry,
    factory: &dyn UpstreamClientFactory,
    routing: &RoutingConfig,
) -> Result<bool, UpstreamError> {
    let Some(provider) = registry.get(&routing.fast_fail_provider) else {
        debug!(provider = %routing.fast_fail_provider, "No fast-fail provider configured, skipping warmup");
        return Ok(false);
    };

    info!(provider = %provider.id, "Starting warmup");
    let mut spec = ClientSpec::for_provider(provider, None, routing);
    spec.timeout = Duration::from_secs(routing.warmup_timeout_secs);

    let client = factory.create_client(&spec)?;
    let request = ChatCompletionRequest::new(
        provider.default_model.clone().unwrap_or_default(),
        vec![ChatMessage::user(WARMUP_PROMPT)],
    )
    .with_stream(false);

    client.chat_completion(&request).await?;
    info!(provider = %provider.id, "Warmup succeeded");
    Ok(true)
}

/// Fire-and-forget variant used at server start
pub async fn run_warmup(
    registry: &ProviderRegistry,
    factory: &dyn UpstreamClientFactory,
    routing: &RoutingConfig,
) {
    if let Err(e) = warmup_fast_fail_provider(registry, factory, routing).await {
        warn!(provider = %routing.fast_fail_provider, error = %e, "Warmup failed (ignored)");
    }
}
