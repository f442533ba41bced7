//! Test fixtures and data factories
//!
//! Upstreams are real HTTP servers (wiremock); nothing in the gateway is mocked.

use prompt_gateway::Config;
use prompt_gateway::config::{ExperimentalConfig, GatewayConfig, ProviderConfig, RoutingConfig};
use serde_json::{Value, json};
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

pub const COMPLETIONS_PATH: &str = "/v1/chat/completions";

/// A mock OpenAI-compatible upstream
pub struct MockUpstream {
    pub server: MockServer,
}

impl MockUpstream {
    pub async fn start() -> Self {
        Self {
            server: MockServer::start().await,
        }
    }

    /// Base URL as a provider would be configured with it
    pub fn base_url(&self) -> String {
        format!("{}/v1", self.server.uri())
    }

    /// Provider config pointing at this upstream
    pub fn provider(&self, id: &str) -> ProviderConfig {
        ProviderConfig::new(id, self.base_url()).with_api_key(format!("{}-key", id))
    }

    /// Answer every completion with a JSON body whose content is `content`
    pub async fn respond_with_completion(&self, content: &str) {
        Mock::given(method("POST"))
            .and(path(COMPLETIONS_PATH))
            .respond_with(ResponseTemplate::new(200).set_body_json(completion_body(content)))
            .mount(&self.server)
            .await;
    }

    /// Answer every completion with an SSE body streaming `parts`
    pub async fn respond_with_stream(&self, parts: &[&str]) {
        Mock::given(method("POST"))
            .and(path(COMPLETIONS_PATH))
            .respond_with(ResponseTemplate::new(200).set_body_raw(sse_body(parts), "text/event-stream"))
            .mount(&self.server)
            .await;
    }

    /// Answer every completion with an error status and OpenAI-style body
    pub async fn respond_with_error(&self, status: u16, message: &str) {
        Mock::given(method("POST"))
            .and(path(COMPLETIONS_PATH))
            .respond_with(ResponseTemplate::new(status).set_body_json(json!({
                "error": {"message": message, "type": "upstream_error"}
            })))
            .mount(&self.server)
            .await;
    }

    /// Bodies of every request received so far
    pub async fn received_bodies(&self) -> Vec<Value> {
        self.server
            .received_requests()
            .await
            .unwrap_or_default()
            .iter()
            .filter_map(|r| serde_json::from_slice(&r.body).ok())
            .collect()
    }
}

pub fn completion_body(content: &str) -> Value {
    json!({
        "id": "cmpl-mock",
        "object": "chat.completion",
        "model": "mock-model",
        "choices": [{
            "index": 0,
            "message": {"role": "assistant", "content": content},
            "finish_reason": "stop"
        }]
    })
}

pub fn sse_body(parts: &[&str]) -> String {
    let mut body = String::new();
    for part in parts {
        let chunk = json!({
            "id": "cmpl-mock",
            "object": "chat.completion.chunk",
            "choices": [{"index": 0, "delta": {"content": part}}]
        });
        body.push_str(&format!("data: {}\n\n", chunk));
    }
    body.push_str("data: [DONE]\n\n");
    body
}

/// Factory for gateway configurations
pub struct ConfigFactory;

impl ConfigFactory {
    /// Providers in failover order, warmup off
    pub fn with_providers(providers: Vec<ProviderConfig>) -> Config {
        Config {
            gateway: GatewayConfig {
                providers,
                routing: RoutingConfig {
                    warmup_on_start: false,
                    ..RoutingConfig::default()
                },
                ..GatewayConfig::default()
            },
        }
    }

    /// Same, with the experimental route pointed at `base_url`
    pub fn with_experimental(providers: Vec<ProviderConfig>, base_url: String) -> Config {
        let mut config = Self::with_providers(providers);
        config.gateway.experimental = ExperimentalConfig {
            base_url,
            api_key: "volc-key".to_string(),
            ..ExperimentalConfig::default()
        };
        config
    }
}

pub fn chat_request(model: &str, stream: bool) -> Value {
    json!({
        "model": model,
        "messages": [{"role": "user", "content": "Improve this prompt"}],
        "stream": stream
    })
}
