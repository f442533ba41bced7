//! End-to-end HTTP tests through the actix application
//!
//! Requests enter through the real app and leave through the real client
//! factory to wiremock upstreams.

#[cfg(test)]
mod tests {
    use crate::common::assertions::{assert_completion_content, assert_error_envelope, sse_payloads};
    use crate::common::fixtures::{ConfigFactory, MockUpstream, chat_request};
    use actix_web::http::StatusCode;
    use actix_web::http::header::AUTHORIZATION;
    use actix_web::test as actix_test;
    use actix_web::web;
    use prompt_gateway::server::{AppState, HttpServer};
    use serde_json::Value;

    const EXPERIMENTAL_MODEL: &str = "ep-m-20260104054639-v6dm6";

    #[actix_web::test]
    async fn test_chat_completion_fails_over_and_names_provider() {
        let broken = MockUpstream::start().await;
        broken.respond_with_error(502, "bad gateway").await;
        let healthy = MockUpstream::start().await;
        healthy.respond_with_completion("improved prompt").await;

        let state = web::Data::new(AppState::new(ConfigFactory::with_providers(vec![
            broken.provider("deepseek"),
            healthy.provider("openrouter"),
        ])));
        let app = actix_test::init_service(HttpServer::create_app(state)).await;

        let req = actix_test::TestRequest::post()
            .uri("/v1/chat/completions")
            .set_json(chat_request("", false))
            .to_request();
        let resp = actix_test::call_service(&app, req).await;

        assert_eq!(resp.status(), StatusCode::OK);
        assert_eq!(resp.headers().get("X-Provider-Id").unwrap(), "openrouter");
        let body: Value = actix_test::read_body_json(resp).await;
        assert_completion_content(&body, "improved prompt");
    }

    #[actix_web::test]
    async fn test_stream_is_relayed_as_sse() {
        let upstream = MockUpstream::start().await;
        upstream.respond_with_stream(&["Hello", " world"]).await;

        let state = web::Data::new(AppState::new(ConfigFactory::with_providers(vec![
            upstream.provider("deepseek"),
        ])));
        let app = actix_test::init_service(HttpServer::create_app(state)).await;

        let req = actix_test::TestRequest::post()
            .uri("/v1/chat/completions")
            .set_json(chat_request("deepseek:deepseek-chat", true))
            .to_request();
        let resp = actix_test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::OK);

        let body = actix_test::read_body(resp).await;
        let text = std::str::from_utf8(&body).unwrap();
        let payloads = sse_payloads(text);

        assert_eq!(payloads.len(), 3);
        let second: Value = serde_json::from_str(payloads[1]).unwrap();
        assert_eq!(second["choices"][0]["delta"]["content"], " world");
        assert_eq!(payloads[2], "[DONE]");
    }

    #[actix_web::test]
    async fn test_all_failed_returns_envelope() {
        let only = MockUpstream::start().await;
        only.respond_with_error(401, "invalid api key").await;

        let state = web::Data::new(AppState::new(ConfigFactory::with_providers(vec![
            only.provider("deepseek"),
        ])));
        let app = actix_test::init_service(HttpServer::create_app(state)).await;

        let req = actix_test::TestRequest::post()
            .uri("/v1/chat/completions")
            .set_json(chat_request("", false))
            .to_request();
        let resp = actix_test::call_service(&app, req).await;

        assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
        let body: Value = actix_test::read_body_json(resp).await;
        assert_error_envelope(&body, "all_failed", "invalid api key");
    }

    #[actix_web::test]
    async fn test_experimental_route_uses_caller_credential() {
        let ark = MockUpstream::start().await;
        ark.respond_with_completion("from ark").await;
        let fallback = MockUpstream::start().await;
        fallback.respond_with_completion("from fallback").await;

        let state = web::Data::new(AppState::new(ConfigFactory::with_experimental(
            vec![fallback.provider("deepseek")],
            ark.base_url(),
        )));
        let app = actix_test::init_service(HttpServer::create_app(state)).await;

        let req = actix_test::TestRequest::post()
            .uri("/v1/chat/completions")
            .insert_header((AUTHORIZATION, "Bearer ark-caller-key"))
            .set_json(chat_request(
                &format!("volces-experimental:{}", EXPERIMENTAL_MODEL),
                false,
            ))
            .to_request();
        let resp = actix_test::call_service(&app, req).await;

        assert_eq!(resp.status(), StatusCode::OK);
        assert_eq!(
            resp.headers().get("X-Provider-Id").unwrap(),
            "volces-experimental"
        );
        let body: Value = actix_test::read_body_json(resp).await;
        assert_completion_content(&body, "from ark");

        let received = ark.server.received_requests().await.unwrap();
        assert_eq!(
            received[0].headers.get("authorization").unwrap(),
            "Bearer ark-caller-key"
        );
        assert!(fallback.received_bodies().await.is_empty());
    }

    #[actix_web::test]
    async fn test_experimental_failure_does_not_fail_over() {
        let ark = MockUpstream::start().await;
        ark.respond_with_error(500, "ark overloaded").await;
        let fallback = MockUpstream::start().await;
        fallback.respond_with_completion("from fallback").await;

        let state = web::Data::new(AppState::new(ConfigFactory::with_experimental(
            vec![fallback.provider("deepseek")],
            ark.base_url(),
        )));
        let app = actix_test::init_service(HttpServer::create_app(state.clone())).await;

        let req = actix_test::TestRequest::post()
            .uri("/v1/chat/completions")
            .set_json(chat_request(
                &format!("volces-experimental:{}", EXPERIMENTAL_MODEL),
                false,
            ))
            .to_request();
        let resp = actix_test::call_service(&app, req).await;

        assert_eq!(resp.status(), StatusCode::INTERNAL_SERVER_ERROR);
        let body: Value = actix_test::read_body_json(resp).await;
        assert_error_envelope(&body, "volces-experimental", "ark overloaded");
        assert!(fallback.received_bodies().await.is_empty());

        let snapshot = state.router.experimental().breaker().state(EXPERIMENTAL_MODEL);
        assert_eq!(snapshot.window_size, 1);
    }
}
