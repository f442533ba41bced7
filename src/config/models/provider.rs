//! Provider configuration

use serde::{Deserialize, Serialize};

const CHAT_COMPLETIONS_SUFFIX: &str = "/chat/completions";

/// One upstream LLM endpoint
///
/// Built once at startup and shared read-only by every request.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProviderConfig {
    /// Canonical lowercase provider id
    pub id: String,
    /// Display name for model listings
    #[serde(default)]
    pub name: String,
    /// Base endpoint, without trailing slashes or `/chat/completions`
    pub base_url: String,
    /// API key; may be empty
    #[serde(default)]
    pub api_key: String,
    /// Model used when a request names none
    #[serde(default)]
    pub default_model: Option<String>,
    /// Advertised models
    #[serde(default)]
    pub models: Vec<ModelEntry>,
}

/// Model advertised by a provider
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModelEntry {
    pub id: String,
    pub label: String,
}

impl ProviderConfig {
    pub fn new(id: impl Into<String>, base_url: impl Into<String>) -> Self {
        let id = id.into().trim().to_lowercase();
        Self {
            name: id.clone(),
            id,
            base_url: normalize_base_url(&base_url.into()),
            api_key: String::new(),
            default_model: None,
            models: Vec::new(),
        }
    }

    pub fn with_api_key(mut self, api_key: impl Into<String>) -> Self {
        self.api_key = api_key.into();
        self
    }

    pub fn with_default_model(mut self, model: impl Into<String>) -> Self {
        self.default_model = Some(model.into());
        self
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    pub fn with_models(mut self, models: Vec<ModelEntry>) -> Self {
        self.models = models;
        self
    }

    /// Canonical form: lowercase id, normalized endpoint, name defaulted to id
    pub fn normalized(mut self) -> Self {
        self.id = self.id.trim().to_lowercase();
        self.base_url = normalize_base_url(&self.base_url);
        if self.name.trim().is_empty() {
            self.name = self.id.clone();
        }
        self.default_model = self.default_model.filter(|m| !m.trim().is_empty());
        self
    }

    /// Whether a non-empty API key is configured
    pub fn has_api_key(&self) -> bool {
        !self.api_key.trim().is_empty()
    }
}

/// Strip trailing slashes, then a trailing `/chat/completions`
pub fn normalize_base_url(url: &str) -> String {
    let trimmed = url.trim().trim_end_matches('/');
    let trimmed = trimmed
        .strip_suffix(CHAT_COMPLETIONS_SUFFIX)
        .unwrap_or(trimmed);
    trimmed.trim_end_matches('/').to_string()
}

/// Parse `id:Label,id2:Label 2`; entries without a label reuse the id
pub fn parse_model_entries(raw: &str) -> Vec<ModelEntry> {
    raw.split(',')
        .map(str::trim)
        .filter(|entry| !entry.is_empty())
        .map(|entry| match entry.split_once(':') {
            Some((id, label)) => {
                let id = id.trim();
                let label = label.trim();
                ModelEntry {
                    id: id.to_string(),
                    label: if label.is_empty() { id } else { label }.to_string(),
                }
            }
            None => ModelEntry {
                id: entry.to_string(),
                label: entry.to_string(),
            },
        })
        .collect()
}
