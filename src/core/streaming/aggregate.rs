//! Chunk-to-completion aggregation
//!
//! Used when a provider is streamed on the router's behalf but the caller
//! asked for a single `chat.completion` object.

use crate::core::providers::UpstreamError;
use crate::core::types::CompletionStream;
use futures::StreamExt;
use serde_json::{Map, Value, json};
use std::collections::BTreeMap;

#[derive(Debug, Default)]
struct ChoiceAccumulator {
    role: Option<String>,
    content: String,
    reasoning_content: String,
    finish_reason: Option<Value>,
}

/// Drain a chunk stream into one completion.
///
/// Content deltas are concatenated per choice index; the last finish reason
/// and the last usage block win. Any stream error fails the whole collection.
pub async fn collect_completion(mut stream: CompletionStream) -> Result<Value, UpstreamError> {
    let mut header = Map::new();
    let mut usage: Option<Value> = None;
    let mut choices: BTreeMap<u64, ChoiceAccumulator> = BTreeMap::new();

    while let Some(chunk) = stream.next().await {
        let chunk = chunk?;

        for key in ["id", "created", "model", "system_fingerprint"] {
            if !header.contains_key(key) {
                if let Some(v) = chunk.get(key).filter(|v| !v.is_null()) {
                    header.insert(key.to_string(), v.clone());
                }
            }
        }
        if let Some(u) = chunk.get("usage").filter(|u| !u.is_null()) {
            usage = Some(u.clone());
        }

        for choice in chunk
            .get("choices")
            .and_then(Value::as_array)
            .into_iter()
            .flatten()
        {
            let index = choice.get("index").and_then(Value::as_u64).unwrap_or(0);
            let acc = choices.entry(index).or_default();

            if let Some(delta) = choice.get("delta") {
                if let Some(role) = delta.get("role").and_then(Value::as_str) {
                    acc.role = Some(role.to_string());
                }
                if let Some(content) = delta.get("content").and_then(Value::as_str) {
                    acc.content.push_str(content);
                }
                if let Some(reasoning) = delta.get("reasoning_content").and_then(Value::as_str) {
                    acc.reasoning_content.push_str(reasoning);
                }
            }
            if let Some(reason) = choice.get("finish_reason").filter(|r| !r.is_null()) {
                acc.finish_reason = Some(reason.clone());
            }
        }
    }

    let choices: Vec<Value> = choices
        .into_iter()
        .map(|(index, acc)| {
            let mut message = json!({
                "role": acc.role.unwrap_or_else(|| "assistant".to_string()),
                "content": acc.content,
            });
            if !acc.reasoning_content.is_empty() {
                message["reasoning_content"] = Value::String(acc.reasoning_content);
            }
            json!({
                "index": index,
                "message": message,
                "finish_reason": acc.finish_reason.unwrap_or(Value::Null),
            })
        })
        .collect();

    let mut completion = header;
    completion.insert("object".to_string(), json!("chat.completion"));
    completion.insert("choices".to_string(), Value::Array(choices));
    if let Some(usage) = usage {
        completion.insert("usage".to_string(), usage);
    }
    Ok(Value::Object(completion))
}
