//! Configuration loading from a flat key/value namespace
//!
//! The process environment is read once into a map; everything here is pure
//! over that map so it can be exercised without touching `std::env`.

use super::models::*;
use crate::utils::error::{GatewayError, Result};
use std::collections::HashMap;
use tracing::{debug, warn};

/// Look up a key, treating blank values as absent
fn var<'a>(vars: &'a HashMap<String, String>, key: &str) -> Option<&'a str> {
    vars.get(key).map(|v| v.trim()).filter(|v| !v.is_empty())
}

fn parse_var<T: std::str::FromStr>(vars: &HashMap<String, String>, key: &str) -> Result<Option<T>>
where
    T::Err: std::fmt::Display,
{
    var(vars, key)
        .map(|v| {
            v.parse::<T>()
                .map_err(|e| GatewayError::Config(format!("Invalid {}: {}", key, e)))
        })
        .transpose()
}

fn parse_flag(vars: &HashMap<String, String>, key: &str) -> Result<Option<bool>> {
    match var(vars, key).map(|v| v.to_lowercase()) {
        None => Ok(None),
        Some(v) if v == "true" || v == "1" || v == "yes" => Ok(Some(true)),
        Some(v) if v == "false" || v == "0" || v == "no" => Ok(Some(false)),
        Some(v) => Err(GatewayError::Config(format!("Invalid {}: {}", key, v))),
    }
}

fn split_list(raw: &str) -> impl Iterator<Item = &str> {
    raw.split(',').map(str::trim).filter(|s| !s.is_empty())
}

/// Key prefix for a provider id: uppercased, `-` mapped to `_`
fn env_prefix(id: &str) -> String {
    id.to_uppercase().replace('-', "_")
}

/// Load providers listed in `PROVIDERS`, in list order.
///
/// A provider is kept only if its `{ID}_BASE_URL` is present and non-empty;
/// missing API keys and default models are tolerated. When nothing is loaded
/// and `LLM_BACKEND_URL` is set, a single `default` provider is built from the
/// legacy keys.
pub fn load_providers(vars: &HashMap<String, String>) -> Vec<ProviderConfig> {
    let mut providers: Vec<ProviderConfig> = Vec::new();

    for id in var(vars, "PROVIDERS").map(split_list).into_iter().flatten() {
        let prefix = env_prefix(id);
        let Some(base_url) = var(vars, &format!("{}_BASE_URL", prefix)) else {
            warn!(provider = %id, "Skipping provider without {}_BASE_URL", prefix);
            continue;
        };

        let mut provider = ProviderConfig::new(id, base_url)
            .with_api_key(var(vars, &format!("{}_API_KEY", prefix)).unwrap_or_default());
        if let Some(model) = var(vars, &format!("{}_DEFAULT_MODEL", prefix)) {
            provider = provider.with_default_model(model);
        }
        if let Some(name) = var(vars, &format!("{}_NAME", prefix)) {
            provider = provider.with_name(name);
        }
        if let Some(models) = var(vars, &format!("{}_MODELS", prefix)) {
            provider = provider.with_models(parse_model_entries(models));
        }

        if providers.iter().any(|p| p.id == provider.id) {
            debug!(provider = %provider.id, "Ignoring duplicate provider id");
            continue;
        }
        providers.push(provider);
    }

    if providers.is_empty() {
        if let Some(base_url) = var(vars, "LLM_BACKEND_URL") {
            debug!("Using legacy LLM_BACKEND_URL provider");
            let mut provider = ProviderConfig::new("default", base_url)
                .with_api_key(var(vars, "LLM_API_KEY").unwrap_or_default())
                .with_name("Default");
            if let Some(model) = var(vars, "DEFAULT_MODEL") {
                provider = provider.with_default_model(model);
            }
            if let Some(models) = var(vars, "FREE_MODELS") {
                provider = provider.with_models(parse_model_entries(models));
            }
            providers.push(provider);
        }
    }

    if providers.is_empty() {
        warn!("No providers configured in environment variables");
    } else {
        debug!("Loaded {} providers from environment", providers.len());
    }

    providers
}

impl GatewayConfig {
    /// Build the gateway configuration from a flat key/value namespace
    pub fn from_vars(vars: &HashMap<String, String>) -> Result<Self> {
        let mut config = Self::default();

        // Server configuration
        if let Some(host) = var(vars, "GATEWAY_HOST") {
            config.server.host = host.to_string();
        }
        if let Some(port) = parse_var(vars, "GATEWAY_PORT")? {
            config.server.port = port;
        }
        if let Some(workers) = parse_var(vars, "GATEWAY_WORKERS")? {
            config.server.workers = Some(workers);
        }
        if let Some(origin) = var(vars, "ALLOWED_ORIGIN") {
            config.server.cors.allow_origin(origin);
        }

        // Routing configuration
        if let Some(id) = var(vars, "FAST_FAIL_PROVIDER") {
            config.routing.fast_fail_provider = id.to_lowercase();
        }
        if let Some(secs) = parse_var(vars, "FAST_FAIL_TIMEOUT_SECS")? {
            config.routing.fast_fail_timeout_secs = secs;
        }
        if let Some(secs) = parse_var(vars, "PROVIDER_TIMEOUT_SECS")? {
            config.routing.provider_timeout_secs = secs;
        }
        if let Some(enabled) = parse_flag(vars, "WARMUP_ON_START")? {
            config.routing.warmup_on_start = enabled;
        }
        config.routing.default_provider = var(vars, "DEFAULT_PROVIDER").map(str::to_lowercase);
        config.routing.default_model = var(vars, "DEFAULT_MODEL").map(str::to_string);

        // Experimental route
        if let Some(route_id) = var(vars, "EXPERIMENTAL_ROUTE_ID") {
            config.experimental.route_id = route_id.to_lowercase();
        }
        if let Some(base_url) = var(vars, "VOLCES_BASE_URL") {
            config.experimental.base_url = normalize_base_url(base_url);
        }
        if let Some(api_key) = var(vars, "VOLCES_API_KEY") {
            config.experimental.api_key = api_key.to_string();
        }
        if let Some(models) = var(vars, "VOLCES_EXPERIMENTAL_MODELS") {
            config.experimental.models = split_list(models).map(str::to_string).collect();
        }
        if let Some(secs) = parse_var(vars, "EXPERIMENTAL_TIMEOUT_SECS")? {
            config.experimental.timeout_secs = secs;
        }

        config.providers = load_providers(vars);

        debug!("Configuration loaded from environment variables");
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn vars(pairs: &[(&str, &str)]) -> HashMap<String, String> {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn test_load_providers_in_list_order() {
        let vars = vars(&[
            ("PROVIDERS", "nvidia, DeepSeek ,openrouter"),
            ("NVIDIA_BASE_URL", "https://integrate.api.nvidia.com/v1/"),
            ("NVIDIA_API_KEY", "nv-key"),
            ("NVIDIA_DEFAULT_MODEL", "meta/llama-3.1-70b-instruct"),
            ("DEEPSEEK_BASE_URL", "https://api.deepseek.com/chat/completions"),
            ("OPENROUTER_BASE_URL", "https://openrouter.ai/api/v1"),
            ("OPENROUTER_MODELS", "qwen/qwen3:Qwen 3"),
        ]);

        let providers = load_providers(&vars);
        let ids: Vec<_> = providers.iter().map(|p| p.id.as_str()).collect();
        assert_eq!(ids, vec!["nvidia", "deepseek", "openrouter"]);

        assert_eq!(providers[0].base_url, "https://integrate.api.nvidia.com/v1");
        assert_eq!(providers[0].api_key, "nv-key");
        assert_eq!(
            providers[0].default_model.as_deref(),
            Some("meta/llama-3.1-70b-instruct")
        );

        assert_eq!(providers[1].base_url, "https://api.deepseek.com");
        assert_eq!(providers[1].api_key, "");
        assert!(providers[1].default_model.is_none());

        assert_eq!(providers[2].models[0].label, "Qwen 3");
    }

    #[test]
    fn test_provider_without_base_url_is_skipped() {
        let vars = vars(&[
            ("PROVIDERS", "nvidia,deepseek"),
            ("NVIDIA_API_KEY", "nv-key"),
            ("DEEPSEEK_BASE_URL", "https://api.deepseek.com"),
        ]);

        let providers = load_providers(&vars);
        assert_eq!(providers.len(), 1);
        assert_eq!(providers[0].id, "deepseek");
    }

    #[test]
    fn test_hyphenated_ids_use_underscored_keys() {
        let vars = vars(&[
            ("PROVIDERS", "silicon-flow"),
            ("SILICON_FLOW_BASE_URL", "https://api.siliconflow.cn/v1"),
        ]);

        let providers = load_providers(&vars);
        assert_eq!(providers[0].id, "silicon-flow");
    }

    #[test]
    fn test_duplicate_ids_keep_first() {
        let vars = vars(&[
            ("PROVIDERS", "deepseek,DEEPSEEK"),
            ("DEEPSEEK_BASE_URL", "https://api.deepseek.com"),
        ]);
        assert_eq!(load_providers(&vars).len(), 1);
    }

    #[test]
    fn test_legacy_backend_fallback() {
        let vars = vars(&[
            ("LLM_BACKEND_URL", "https://legacy.example.com/v1/"),
            ("LLM_API_KEY", "legacy-key"),
            ("DEFAULT_MODEL", "deepseek"),
        ]);

        let providers = load_providers(&vars);
        assert_eq!(providers.len(), 1);
        assert_eq!(providers[0].id, "default");
        assert_eq!(providers[0].base_url, "https://legacy.example.com/v1");
        assert_eq!(providers[0].default_model.as_deref(), Some("deepseek"));
    }

    #[test]
    fn test_no_providers() {
        assert!(load_providers(&HashMap::new()).is_empty());
    }

    #[test]
    fn test_gateway_config_from_vars() {
        let vars = vars(&[
            ("GATEWAY_PORT", "8080"),
            ("ALLOWED_ORIGIN", "https://prompt.example.com"),
            ("FAST_FAIL_PROVIDER", "NVIDIA"),
            ("WARMUP_ON_START", "false"),
            ("VOLCES_EXPERIMENTAL_MODELS", "ep-a, ep-b,"),
            ("VOLCES_API_KEY", "volc-key"),
            ("DEFAULT_PROVIDER", "DeepSeek"),
        ]);

        let config = GatewayConfig::from_vars(&vars).unwrap();
        assert_eq!(config.server.port, 8080);
        assert!(
            config
                .server
                .cors
                .allowed_origins
                .contains(&"https://prompt.example.com".to_string())
        );
        assert_eq!(config.routing.fast_fail_provider, "nvidia");
        assert!(!config.routing.warmup_on_start);
        assert_eq!(config.experimental.models, vec!["ep-a", "ep-b"]);
        assert_eq!(config.experimental.api_key, "volc-key");
        assert_eq!(config.routing.default_provider.as_deref(), Some("deepseek"));
    }

    #[test]
    fn test_invalid_port_is_config_error() {
        let vars = vars(&[("GATEWAY_PORT", "not-a-port")]);
        let err = GatewayConfig::from_vars(&vars).unwrap_err();
        assert!(matches!(err, GatewayError::Config(_)));
    }

    #[test]
    fn test_invalid_flag_is_config_error() {
        let vars = vars(&[("WARMUP_ON_START", "sometimes")]);
        assert!(GatewayConfig::from_vars(&vars).is_err());
    }
}
