//! Scripted upstream clients for router and adapter tests

use super::client::{ClientSpec, UpstreamClient, UpstreamClientFactory};
use super::error::UpstreamError;
use crate::core::types::{ChatCompletionRequest, CompletionStream};
use async_trait::async_trait;
use parking_lot::Mutex;
use serde_json::{Value, json};
use std::collections::HashMap;
use std::sync::Arc;

/// How a scripted provider answers
#[derive(Debug, Clone)]
pub enum Script {
    /// Succeeds with a completion whose content names the provider
    Succeed,
    /// Fails the call itself
    Fail(UpstreamError),
    /// Streams the given chunk results in order
    Chunks(Vec<Result<Value, UpstreamError>>),
    /// Never answers, neither the call nor the stream open
    Hang,
}

/// One call observed by the factory
#[derive(Debug, Clone, PartialEq)]
pub struct RecordedCall {
    pub provider_id: String,
    pub api_key: String,
    pub model: String,
    pub stream: bool,
}

/// Factory whose clients follow a per-provider script and record every call
#[derive(Default)]
pub struct ScriptedFactory {
    scripts: Mutex<HashMap<String, Script>>,
    calls: Arc<Mutex<Vec<RecordedCall>>>,
}

impl ScriptedFactory {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn script(self, provider_id: &str, script: Script) -> Self {
        self.scripts.lock().insert(provider_id.to_string(), script);
        self
    }

    pub fn calls(&self) -> Vec<RecordedCall> {
        self.calls.lock().clone()
    }
}

impl UpstreamClientFactory for ScriptedFactory {
    fn create_client(&self, spec: &ClientSpec) -> Result<Arc<dyn UpstreamClient>, UpstreamError> {
        let script = self
            .scripts
            .lock()
            .get(&spec.provider_id)
            .cloned()
            .unwrap_or(Script::Succeed);

        Ok(Arc::new(ScriptedClient {
            spec: spec.clone(),
            script,
            calls: Arc::clone(&self.calls),
        }))
    }
}

struct ScriptedClient {
    spec: ClientSpec,
    script: Script,
    calls: Arc<Mutex<Vec<RecordedCall>>>,
}

impl ScriptedClient {
    fn record(&self, request: &ChatCompletionRequest, stream: bool) {
        self.calls.lock().push(RecordedCall {
            provider_id: self.spec.provider_id.clone(),
            api_key: self.spec.api_key.clone(),
            model: request.model.clone(),
            stream,
        });
    }
}

pub fn completion(content: &str) -> Value {
    json!({
        "id": "cmpl-test",
        "object": "chat.completion",
        "choices": [{"index": 0, "message": {"role": "assistant", "content": content}, "finish_reason": "stop"}]
    })
}

pub fn chunk(content: &str) -> Value {
    json!({
        "id": "cmpl-test",
        "object": "chat.completion.chunk",
        "choices": [{"index": 0, "delta": {"content": content}}]
    })
}

#[async_trait]
impl UpstreamClient for ScriptedClient {
    async fn chat_completion(&self, request: &ChatCompletionRequest) -> Result<Value, UpstreamError> {
        self.record(request, false);
        match &self.script {
            Script::Succeed => Ok(completion(&self.spec.provider_id)),
            Script::Fail(err) => Err(err.clone()),
            Script::Chunks(_) => Ok(completion(&self.spec.provider_id)),
            Script::Hang => futures::future::pending().await,
        }
    }

    async fn chat_completion_stream(
        &self,
        request: &ChatCompletionRequest,
    ) -> Result<CompletionStream, UpstreamError> {
        self.record(request, true);
        let chunks = match &self.script {
            Script::Succeed => vec![Ok(chunk(&self.spec.provider_id))],
            Script::Fail(err) => return Err(err.clone()),
            Script::Chunks(chunks) => chunks.clone(),
            Script::Hang => return futures::future::pending().await,
        };
        Ok(Box::pin(futures::stream::iter(chunks)))
    }
}
