//! Experimental model route
//!
//! Calls a single fixed upstream for allow-listed model ids, gated by the
//! per-model circuit breaker. There is no failover: every failure here is
//! final for the request.
//!
//! Streaming outcomes are recorded only when the stream settles. A stream that
//! drains to the end counts as a success; an upstream error mid-stream, or the
//! caller dropping the stream early, counts as one failure. A call abandoned
//! before the upstream answers also counts as one failure.

use crate::config::ExperimentalConfig;
use crate::core::circuit_breaker::CircuitBreakerRegistry;
use crate::core::providers::{ClientSpec, UpstreamClientFactory, UpstreamError};
use crate::core::types::{ChatCompletionRequest, ChatMessage, CompletionStream};
use crate::utils::error::{GatewayError, Result};
use futures::StreamExt;
use serde_json::Value;
use std::sync::Arc;
use tracing::{debug, info, warn};

/// One call to the experimental route
#[derive(Debug, Clone)]
pub struct ExperimentalCall {
    pub model: String,
    pub messages: Vec<ChatMessage>,
    pub stream: bool,
    /// Caller-supplied credential; the configured one is used when absent
    pub credential: Option<String>,
}

/// Result of an experimental call
pub enum ExperimentalResponse {
    Completion(Value),
    Stream(CompletionStream),
}

pub struct ExperimentalAdapter {
    config: ExperimentalConfig,
    breaker: Arc<CircuitBreakerRegistry>,
    factory: Arc<dyn UpstreamClientFactory>,
}

impl ExperimentalAdapter {
    pub fn new(
        config: ExperimentalConfig,
        breaker: Arc<CircuitBreakerRegistry>,
        factory: Arc<dyn UpstreamClientFactory>,
    ) -> Self {
        Self {
            config,
            breaker,
            factory,
        }
    }

    /// Provider id reserved for this route
    pub fn route_id(&self) -> &str {
        &self.config.route_id
    }

    pub fn is_route(&self, provider_id: &str) -> bool {
        self.config.route_id.eq_ignore_ascii_case(provider_id)
    }

    pub fn is_eligible(&self, model: &str) -> bool {
        self.config.models.iter().any(|m| m == model)
    }

    pub fn breaker(&self) -> &Arc<CircuitBreakerRegistry> {
        &self.breaker
    }

    /// Call the experimental upstream.
    ///
    /// Checks run in order and fail without contacting the upstream:
    /// allow-list, circuit permission, credential.
    pub async fn call(&self, call: ExperimentalCall) -> Result<ExperimentalResponse> {
        let provider = self.config.route_id.clone();

        if !self.is_eligible(&call.model) {
            return Err(GatewayError::IneligibleModel {
                provider,
                model: call.model,
            });
        }

        if !self.breaker.can_call(&call.model) {
            warn!(model = %call.model, "Experimental call rejected, circuit open");
            return Err(GatewayError::CircuitOpen {
                provider,
                model: call.model,
            });
        }

        let credential = call
            .credential
            .as_deref()
            .map(str::trim)
            .filter(|c| !c.is_empty())
            .or_else(|| Some(self.config.api_key.trim()).filter(|c| !c.is_empty()));
        let Some(credential) = credential else {
            // No call is attempted, so no outcome; hand back a half-open trial slot
            self.breaker.release_trial(&call.model);
            return Err(GatewayError::MissingCredential { provider });
        };

        // From here on exactly one outcome is recorded, including when the
        // caller abandons this future before the upstream answers
        let mut guard = OutcomeGuard {
            breaker: Arc::clone(&self.breaker),
            model: call.model.clone(),
            settled: false,
        };

        let spec = ClientSpec {
            provider_id: provider.clone(),
            base_url: self.config.base_url.clone(),
            api_key: credential.to_string(),
            timeout: self.config.timeout(),
        };
        let client = match self.factory.create_client(&spec) {
            Ok(client) => client,
            Err(e) => {
                guard.settle(false);
                return Err(GatewayError::upstream(provider, e));
            }
        };

        let request = ChatCompletionRequest::new(call.model.clone(), call.messages)
            .with_stream(call.stream);
        debug!(model = %call.model, stream = call.stream, "Calling experimental upstream");

        if !call.stream {
            let result = client.chat_completion(&request).await;
            guard.settle(result.is_ok());
            return match result {
                Ok(body) => Ok(ExperimentalResponse::Completion(body)),
                Err(e) => {
                    warn!(model = %call.model, error = %e, "Experimental call failed");
                    Err(GatewayError::upstream(provider, e))
                }
            };
        }

        let upstream = match client.chat_completion_stream(&request).await {
            Ok(stream) => stream,
            Err(e) => {
                warn!(model = %call.model, error = %e, "Experimental stream failed to open");
                guard.settle(false);
                return Err(GatewayError::upstream(provider, e));
            }
        };

        Ok(ExperimentalResponse::Stream(settle_on_completion(upstream, guard)))
    }
}

/// Records exactly one outcome per call; failure unless settled first
struct OutcomeGuard {
    breaker: Arc<CircuitBreakerRegistry>,
    model: String,
    settled: bool,
}

impl OutcomeGuard {
    fn settle(&mut self, success: bool) {
        if !self.settled {
            self.settled = true;
            self.breaker.record_outcome(&self.model, success);
        }
    }
}

impl Drop for OutcomeGuard {
    fn drop(&mut self) {
        if !self.settled {
            debug!(model = %self.model, "Experimental call dropped before completion");
            self.settle(false);
        }
    }
}

fn settle_on_completion(mut upstream: CompletionStream, mut guard: OutcomeGuard) -> CompletionStream {
    Box::pin(async_stream::stream! {
        while let Some(item) = upstream.next().await {
            match item {
                Ok(chunk) => yield Ok::<Value, UpstreamError>(chunk),
                Err(e) => {
                    warn!(model = %guard.model, error = %e, "Experimental stream failed mid-transmission");
                    guard.settle(false);
                    yield Err(e);
                    return;
                }
            }
        }
        info!(model = %guard.model, "Experimental stream completed");
        guard.settle(true);
    })
}
