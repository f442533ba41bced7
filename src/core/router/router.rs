//! Core router structure and the failover loop

use super::model_spec::RequestedModelSpec;
use crate::config::{ProviderConfig, RoutingConfig};
use crate::core::experimental::{ExperimentalAdapter, ExperimentalCall, ExperimentalResponse};
use crate::core::providers::{
    ClientSpec, ProviderRegistry, UpstreamClientFactory, UpstreamError,
};
use crate::core::streaming::collect_completion;
use crate::core::types::{ChatCompletionRequest, CompletionStream};
use crate::utils::error::{GatewayError, Result};
use serde_json::Value;
use std::sync::Arc;
use tracing::{debug, info, warn};

/// Per-request inputs that do not live in the body
#[derive(Debug, Clone, Default)]
pub struct RouteContext {
    /// Caller credential overriding the configured one for this request only
    pub credential: Option<String>,
    /// Explicit provider selection; wins over the model prefix
    pub provider_override: Option<String>,
}

impl RouteContext {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_credential(mut self, credential: impl Into<String>) -> Self {
        self.credential = Some(credential.into());
        self
    }

    pub fn with_provider(mut self, provider: impl Into<String>) -> Self {
        self.provider_override = Some(provider.into());
        self
    }
}

/// Completion or chunk stream
pub enum RouteBody {
    Completion(Value),
    Stream(CompletionStream),
}

impl std::fmt::Debug for RouteBody {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Completion(v) => f.debug_tuple("Completion").field(v).finish(),
            Self::Stream(_) => f.write_str("Stream(..)"),
        }
    }
}

/// Successful routing outcome
#[derive(Debug)]
pub struct RouteResponse {
    /// Provider that actually served the request
    pub provider: String,
    pub body: RouteBody,
}

/// Orchestrates the experimental route and the provider failover chain
pub struct CompletionRouter {
    registry: Arc<ProviderRegistry>,
    factory: Arc<dyn UpstreamClientFactory>,
    experimental: Arc<ExperimentalAdapter>,
    routing: RoutingConfig,
}

impl CompletionRouter {
    pub fn new(
        registry: Arc<ProviderRegistry>,
        factory: Arc<dyn UpstreamClientFactory>,
        experimental: Arc<ExperimentalAdapter>,
        routing: RoutingConfig,
    ) -> Self {
        Self {
            registry,
            factory,
            experimental,
            routing,
        }
    }

    pub fn registry(&self) -> &Arc<ProviderRegistry> {
        &self.registry
    }

    pub fn experimental(&self) -> &Arc<ExperimentalAdapter> {
        &self.experimental
    }

    /// Route one chat completion request.
    ///
    /// The experimental route is terminal. Otherwise providers are tried one
    /// at a time, in chain order, and the first success is returned. When all
    /// fail, the last failure is surfaced.
    pub async fn route(
        &self,
        request: ChatCompletionRequest,
        ctx: RouteContext,
    ) -> Result<RouteResponse> {
        let spec = RequestedModelSpec::parse(&request.model);
        let pinned = ctx
            .provider_override
            .as_deref()
            .map(|p| p.trim().to_lowercase())
            .filter(|p| !p.is_empty())
            .or(spec.provider_id);
        let credential = ctx
            .credential
            .filter(|c| !c.trim().is_empty());

        if let Some(id) = pinned.as_deref().filter(|id| self.experimental.is_route(id)) {
            debug!(provider = %id, model = %spec.model_id, "Routing to experimental adapter");
            let stream = request.wants_stream();
            let response = self
                .experimental
                .call(ExperimentalCall {
                    model: spec.model_id,
                    messages: request.messages,
                    stream,
                    credential,
                })
                .await?;

            let body = match response {
                ExperimentalResponse::Completion(v) => RouteBody::Completion(v),
                ExperimentalResponse::Stream(s) => RouteBody::Stream(s),
            };
            return Ok(RouteResponse {
                provider: self.experimental.route_id().to_string(),
                body,
            });
        }

        let chain = self.registry.failover_chain(pinned.as_deref());
        if chain.is_empty() {
            return Err(GatewayError::NoProviderConfigured);
        }

        let wants_stream = request.wants_stream();
        let mut last_error = None;

        for provider in chain {
            let mut attempt = request.clone();
            attempt.model = if spec.model_id.is_empty() {
                provider.default_model.clone().unwrap_or_default()
            } else {
                spec.model_id.clone()
            };

            match self
                .attempt(provider, attempt, wants_stream, credential.as_deref())
                .await
            {
                Ok(body) => {
                    info!(provider = %provider.id, "Request served");
                    return Ok(RouteResponse {
                        provider: provider.id.clone(),
                        body,
                    });
                }
                Err(e) => {
                    warn!(provider = %provider.id, error = %e, "Provider failed, trying next");
                    last_error = Some(e);
                }
            }
        }

        Err(GatewayError::AllProvidersFailed(last_error.unwrap_or_else(
            || UpstreamError::unknown("no provider attempted"),
        )))
    }

    /// One call against one provider
    async fn attempt(
        &self,
        provider: &ProviderConfig,
        mut request: ChatCompletionRequest,
        wants_stream: bool,
        credential: Option<&str>,
    ) -> std::result::Result<RouteBody, UpstreamError> {
        let spec = ClientSpec::for_provider(provider, credential, &self.routing);
        let client = self.factory.create_client(&spec)?;

        // The fast-fail provider is always streamed so a stalled upstream
        // surfaces within its short timeout
        let stream = wants_stream || self.routing.is_fast_fail(&provider.id);
        request.stream = Some(stream);
        debug!(provider = %provider.id, model = %request.model, stream, "Attempting provider");

        if !stream {
            return client.chat_completion(&request).await.map(RouteBody::Completion);
        }

        let chunks = client.chat_completion_stream(&request).await?;
        if wants_stream {
            Ok(RouteBody::Stream(chunks))
        } else {
            collect_completion(chunks).await.map(RouteBody::Completion)
        }
    }
}
