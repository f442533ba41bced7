//! Upstream client factory and the OpenAI-compatible HTTP client

use super::error::UpstreamError;
use super::sse::{SseDecoder, SseFrame};
use crate::config::{ProviderConfig, RoutingConfig};
use crate::core::types::{ChatCompletionRequest, CompletionStream};
use async_trait::async_trait;
use futures::StreamExt;
use reqwest::Client;
use serde_json::Value;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, error};

/// Credential sent when neither the caller nor the provider supplies one.
/// Calls made with it fail upstream, never locally.
pub const PLACEHOLDER_CREDENTIAL: &str = "dummy";

/// A client bound to one upstream endpoint
#[async_trait]
pub trait UpstreamClient: Send + Sync {
    /// Single non-streaming completion
    async fn chat_completion(&self, request: &ChatCompletionRequest) -> Result<Value, UpstreamError>;

    /// Streaming completion; the stream yields chunk objects in upstream order
    async fn chat_completion_stream(
        &self,
        request: &ChatCompletionRequest,
    ) -> Result<CompletionStream, UpstreamError>;
}

/// Everything needed to build a client for one call
#[derive(Debug, Clone, PartialEq)]
pub struct ClientSpec {
    pub provider_id: String,
    pub base_url: String,
    pub api_key: String,
    pub timeout: Duration,
}

impl ClientSpec {
    /// Bind a provider, preferring a non-empty caller credential over the
    /// configured one, then the placeholder.
    pub fn for_provider(
        provider: &ProviderConfig,
        override_credential: Option<&str>,
        routing: &RoutingConfig,
    ) -> Self {
        let api_key = override_credential
            .filter(|c| !c.trim().is_empty())
            .or_else(|| Some(provider.api_key.as_str()).filter(|c| !c.trim().is_empty()))
            .unwrap_or(PLACEHOLDER_CREDENTIAL)
            .to_string();

        Self {
            provider_id: provider.id.clone(),
            base_url: provider.base_url.clone(),
            api_key,
            timeout: routing.timeout_for(&provider.id),
        }
    }

    pub fn completions_url(&self) -> String {
        format!("{}/chat/completions", self.base_url.trim_end_matches('/'))
    }
}

/// Produces upstream clients
#[cfg_attr(test, mockall::automock)]
pub trait UpstreamClientFactory: Send + Sync {
    fn create_client(&self, spec: &ClientSpec) -> Result<Arc<dyn UpstreamClient>, UpstreamError>;
}

/// Connection pool settings shared by every upstream
pub struct PoolConfig;
impl PoolConfig {
    pub const POOL_SIZE: usize = 80;
    pub const KEEPALIVE_SECS: u64 = 90;
}

/// Build the pooled HTTP client. Timeouts are applied per request, since
/// they differ between providers.
fn pooled_client() -> Result<Client, UpstreamError> {
    Client::builder()
        .pool_idle_timeout(Duration::from_secs(PoolConfig::KEEPALIVE_SECS))
        .pool_max_idle_per_host(PoolConfig::POOL_SIZE)
        .build()
        .map_err(|e| UpstreamError::unknown(format!("Failed to create HTTP client: {}", e)))
}

/// Factory for real HTTP clients.
///
/// Every client it hands out shares one connection pool, so failover steps
/// and repeated calls reuse open connections.
#[derive(Debug, Clone)]
pub struct HttpClientFactory {
    http: Client,
}

impl HttpClientFactory {
    pub fn try_new() -> Result<Self, UpstreamError> {
        Ok(Self {
            http: pooled_client()?,
        })
    }

    /// Like `try_new`, falling back to a client with default pool settings
    pub fn new() -> Self {
        Self::try_new().unwrap_or_else(|e| {
            error!("{}, using default client", e);
            Self { http: Client::new() }
        })
    }
}

impl Default for HttpClientFactory {
    fn default() -> Self {
        Self::new()
    }
}

impl UpstreamClientFactory for HttpClientFactory {
    fn create_client(&self, spec: &ClientSpec) -> Result<Arc<dyn UpstreamClient>, UpstreamError> {
        Ok(Arc::new(OpenAiCompatibleClient::with_client(
            spec.clone(),
            self.http.clone(),
        )))
    }
}

/// Client for any `/chat/completions` endpoint speaking the OpenAI protocol.
///
/// reqwest never retries on its own, so each call is exactly one request.
#[derive(Debug, Clone)]
pub struct OpenAiCompatibleClient {
    spec: ClientSpec,
    http: Client,
}

impl OpenAiCompatibleClient {
    /// Standalone client with its own pool
    pub fn new(spec: ClientSpec) -> Result<Self, UpstreamError> {
        Ok(Self::with_client(spec, pooled_client()?))
    }

    /// Client on an existing pool; `spec.timeout` bounds each request
    pub fn with_client(spec: ClientSpec, http: Client) -> Self {
        Self { spec, http }
    }

    pub fn spec(&self) -> &ClientSpec {
        &self.spec
    }

    async fn send(&self, body: &ChatCompletionRequest) -> Result<reqwest::Response, UpstreamError> {
        let url = self.spec.completions_url();
        debug!(provider = %self.spec.provider_id, url = %url, stream = body.wants_stream(), "Sending upstream request");

        let response = self
            .http
            .post(&url)
            .timeout(self.spec.timeout)
            .bearer_auth(&self.spec.api_key)
            .json(body)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let text = response.text().await.unwrap_or_default();
            return Err(UpstreamError::from_response_body(status.as_u16(), &text));
        }
        Ok(response)
    }
}

#[async_trait]
impl UpstreamClient for OpenAiCompatibleClient {
    async fn chat_completion(&self, request: &ChatCompletionRequest) -> Result<Value, UpstreamError> {
        let body = request.clone().with_stream(false);
        let response = self.send(&body).await?;
        response
            .json::<Value>()
            .await
            .map_err(|e| UpstreamError::unknown(format!("invalid completion body: {}", e)))
    }

    async fn chat_completion_stream(
        &self,
        request: &ChatCompletionRequest,
    ) -> Result<CompletionStream, UpstreamError> {
        let body = request.clone().with_stream(true);
        let response = self.send(&body).await?;
        let mut bytes = response.bytes_stream();

        let stream = async_stream::stream! {
            let mut decoder = SseDecoder::new();
            'read: while let Some(chunk) = bytes.next().await {
                let frames = match chunk {
                    Ok(chunk) => decoder.push(&chunk),
                    Err(e) => Err(UpstreamError::from(e)),
                };
                let frames = match frames {
                    Ok(frames) => frames,
                    Err(e) => {
                        yield Err::<Value, UpstreamError>(e);
                        return;
                    }
                };
                for frame in frames {
                    match frame {
                        SseFrame::Chunk(value) => yield Ok(value),
                        SseFrame::Done => break 'read,
                    }
                }
            }
            if !decoder.is_done() {
                match decoder.finish() {
                    Ok(frames) => {
                        for frame in frames {
                            if let SseFrame::Chunk(value) = frame {
                                yield Ok(value);
                            }
                        }
                    }
                    Err(e) => yield Err(e),
                }
            }
        };

        Ok(Box::pin(stream))
    }
}
