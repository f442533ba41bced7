//! Custom test assertions

use serde_json::Value;

/// Assert a completion body carries the expected assistant content
pub fn assert_completion_content(body: &Value, expected: &str) {
    let content = body["choices"][0]["message"]["content"].as_str();
    assert_eq!(
        content,
        Some(expected),
        "Unexpected completion content in {}",
        body
    );
}

/// Assert an error envelope names the provider and message
pub fn assert_error_envelope(body: &Value, provider: &str, message: &str) {
    assert_eq!(body["error"]["provider"], provider, "Unexpected envelope {}", body);
    assert_eq!(body["error"]["message"], message, "Unexpected envelope {}", body);
}

/// Split an SSE body into its `data:` payloads
pub fn sse_payloads(body: &str) -> Vec<&str> {
    body.split("\n\n")
        .filter_map(|frame| frame.strip_prefix("data: "))
        .collect()
}
