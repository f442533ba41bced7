//! Failover routing over real HTTP
//!
//! The router is built with the production client factory and pointed at
//! wiremock upstreams.

#[cfg(test)]
mod tests {
    use crate::common::assertions::assert_completion_content;
    use crate::common::fixtures::{ConfigFactory, MockUpstream};
    use futures::TryStreamExt;
    use prompt_gateway::core::warmup::warmup_fast_fail_provider;
    use prompt_gateway::server::AppState;
    use prompt_gateway::{
        ChatCompletionRequest, ChatMessage, GatewayError, HttpClientFactory, RouteBody,
        RouteContext,
    };
    use serde_json::Value;

    fn request(model: &str, stream: bool) -> ChatCompletionRequest {
        ChatCompletionRequest::new(model, vec![ChatMessage::user("Improve this prompt")])
            .with_stream(stream)
    }

    fn completion(body: RouteBody) -> Value {
        match body {
            RouteBody::Completion(v) => v,
            RouteBody::Stream(_) => panic!("expected a completion"),
        }
    }

    #[tokio::test]
    async fn test_second_provider_serves_after_upstream_error() {
        let broken = MockUpstream::start().await;
        broken.respond_with_error(503, "overloaded").await;
        let healthy = MockUpstream::start().await;
        healthy.respond_with_completion("rewritten").await;

        let state = AppState::new(ConfigFactory::with_providers(vec![
            broken.provider("deepseek"),
            healthy.provider("openrouter"),
        ]));
        let response = state
            .router
            .route(request("", false), RouteContext::new())
            .await
            .unwrap();

        assert_eq!(response.provider, "openrouter");
        assert_completion_content(&completion(response.body), "rewritten");
        assert_eq!(broken.received_bodies().await.len(), 1);
    }

    #[tokio::test]
    async fn test_all_failed_surfaces_last_upstream_error() {
        let first = MockUpstream::start().await;
        first.respond_with_error(500, "first broke").await;
        let second = MockUpstream::start().await;
        second.respond_with_error(429, "second throttled").await;

        let state = AppState::new(ConfigFactory::with_providers(vec![
            first.provider("a"),
            second.provider("b"),
        ]));
        let err = state
            .router
            .route(request("", false), RouteContext::new())
            .await
            .unwrap_err();

        match err {
            GatewayError::AllProvidersFailed(last) => {
                assert_eq!(last.status(), Some(429));
                assert_eq!(last.message, "second throttled");
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_fast_fail_provider_is_streamed_and_aggregated() {
        let nvidia = MockUpstream::start().await;
        nvidia.respond_with_stream(&["Be ", "specific."]).await;

        let state = AppState::new(ConfigFactory::with_providers(vec![
            nvidia.provider("nvidia").with_default_model("meta/llama-3.1-70b-instruct"),
        ]));
        let response = state
            .router
            .route(request("", false), RouteContext::new())
            .await
            .unwrap();

        assert_completion_content(&completion(response.body), "Be specific.");

        let bodies = nvidia.received_bodies().await;
        assert_eq!(bodies[0]["stream"], true);
        assert_eq!(bodies[0]["model"], "meta/llama-3.1-70b-instruct");
    }

    #[tokio::test]
    async fn test_streaming_caller_gets_chunks() {
        let upstream = MockUpstream::start().await;
        upstream.respond_with_stream(&["one", "two"]).await;

        let state = AppState::new(ConfigFactory::with_providers(vec![
            upstream.provider("deepseek"),
        ]));
        let response = state
            .router
            .route(request("deepseek:deepseek-chat", true), RouteContext::new())
            .await
            .unwrap();

        let RouteBody::Stream(stream) = response.body else {
            panic!("expected a stream");
        };
        let chunks: Vec<Value> = stream.try_collect().await.unwrap();
        assert_eq!(chunks.len(), 2);
        assert_eq!(chunks[1]["choices"][0]["delta"]["content"], "two");
    }

    #[tokio::test]
    async fn test_caller_credential_reaches_upstream() {
        let upstream = MockUpstream::start().await;
        upstream.respond_with_completion("ok").await;

        let state = AppState::new(ConfigFactory::with_providers(vec![
            upstream.provider("deepseek"),
        ]));
        state
            .router
            .route(
                request("", false),
                RouteContext::new().with_credential("sk-caller"),
            )
            .await
            .unwrap();

        let received = upstream.server.received_requests().await.unwrap();
        assert_eq!(
            received[0].headers.get("authorization").unwrap(),
            "Bearer sk-caller"
        );
    }

    #[tokio::test]
    async fn test_warmup_pings_fast_fail_provider() {
        let nvidia = MockUpstream::start().await;
        nvidia.respond_with_completion("pong").await;

        let config = ConfigFactory::with_providers(vec![nvidia.provider("nvidia")]);
        let state = AppState::new(config.clone());
        let warmed = warmup_fast_fail_provider(
            state.registry(),
            &HttpClientFactory::new(),
            config.routing(),
        )
        .await
        .unwrap();

        assert!(warmed);
        let bodies = nvidia.received_bodies().await;
        assert_eq!(bodies[0]["stream"], false);
        assert_eq!(bodies[0]["messages"][0]["content"], "ping");
    }
}
