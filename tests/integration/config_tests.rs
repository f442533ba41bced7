//! Configuration loading integration tests

#[cfg(test)]
mod tests {
    use prompt_gateway::Config;
    use prompt_gateway::server::builder::load_config;
    use std::collections::HashMap;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn vars(pairs: &[(&str, &str)]) -> HashMap<String, String> {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn test_environment_namespace_builds_full_config() {
        let config = Config::from_vars(&vars(&[
            ("PROVIDERS", "nvidia,deepseek"),
            ("NVIDIA_BASE_URL", "https://integrate.api.nvidia.com/v1"),
            ("NVIDIA_API_KEY", "nv-key"),
            ("DEEPSEEK_BASE_URL", "https://api.deepseek.com"),
            ("DEEPSEEK_DEFAULT_MODEL", "deepseek-chat"),
            ("GATEWAY_PORT", "8088"),
            ("FAST_FAIL_TIMEOUT_SECS", "10"),
        ]))
        .unwrap();

        assert_eq!(config.server().port, 8088);
        assert_eq!(config.providers().len(), 2);
        assert_eq!(config.providers()[0].id, "nvidia");
        assert_eq!(config.routing().fast_fail_timeout_secs, 10);
        assert_eq!(
            config.providers()[1].default_model.as_deref(),
            Some("deepseek-chat")
        );
    }

    #[test]
    fn test_bad_url_scheme_fails_validation() {
        let err = Config::from_vars(&vars(&[
            ("PROVIDERS", "deepseek"),
            ("DEEPSEEK_BASE_URL", "file:///etc/passwd"),
        ]))
        .unwrap_err();
        assert!(err.to_string().contains("http:// or https://"));
    }

    #[tokio::test]
    async fn test_explicit_config_file_wins() {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(
            br#"
server:
  port: 9090
providers:
  - id: openrouter
    base_url: https://openrouter.ai/api/v1
"#,
        )
        .unwrap();

        let config = load_config(Some(file.path())).await.unwrap();
        assert_eq!(config.server().port, 9090);
        assert_eq!(config.providers()[0].id, "openrouter");
    }

    #[tokio::test]
    async fn test_unparseable_config_file_is_rejected() {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(b"server: [not, a, map").unwrap();

        assert!(load_config(Some(file.path())).await.is_err());
    }
}
