//! Requested model parsing

/// Provider and model named by a request's `model` field
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RequestedModelSpec {
    /// Lowercased provider prefix, if any
    pub provider_id: Option<String>,
    pub model_id: String,
}

impl RequestedModelSpec {
    /// Split `provider:model` on the first colon.
    ///
    /// Without a colon the whole string is the model id. Later colons stay in
    /// the model id, so `p:m:n` yields provider `p` and model `m:n`.
    pub fn parse(model: &str) -> Self {
        match model.split_once(':') {
            Some((provider, model_id)) => Self {
                provider_id: Some(provider.trim().to_lowercase()),
                model_id: model_id.to_string(),
            },
            None => Self {
                provider_id: None,
                model_id: model.to_string(),
            },
        }
    }
}
