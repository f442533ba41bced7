//! HTTP server core implementation

use crate::config::{Config, ServerConfig};
use crate::core::warmup::run_warmup;
use crate::server::handlers::health_check;
use crate::server::routes;
use crate::server::state::AppState;
use crate::utils::error::{GatewayError, Result};
use actix_cors::Cors;
use actix_web::{
    App, HttpServer as ActixHttpServer,
    middleware::{DefaultHeaders, Logger},
    web,
};
use tracing::{info, warn};

/// HTTP server
pub struct HttpServer {
    /// Server configuration
    config: ServerConfig,
    /// Application state
    state: AppState,
}

impl HttpServer {
    /// Create a new HTTP server
    pub fn new(config: &Config) -> Result<Self> {
        info!("Creating HTTP server");
        config.validate()?;

        if config.providers().is_empty() {
            warn!("No providers configured; chat completions will fail until one is added");
        }
        for provider in config.providers() {
            info!(
                provider = %provider.id,
                has_key = provider.has_api_key(),
                "Registered provider"
            );
        }

        Ok(Self {
            config: config.server().clone(),
            state: AppState::new(config.clone()),
        })
    }

    /// Create a server over prepared state
    pub fn with_state(config: ServerConfig, state: AppState) -> Self {
        Self { config, state }
    }

    /// Create the Actix-web application
    pub fn create_app(
        state: web::Data<AppState>,
    ) -> App<
        impl actix_web::dev::ServiceFactory<
            actix_web::dev::ServiceRequest,
            Config = (),
            Response = actix_web::dev::ServiceResponse<impl actix_web::body::MessageBody>,
            Error = actix_web::Error,
            InitError = (),
        >,
    > {
        let cors = Self::build_cors(&state.config.gateway.server);

        App::new()
            .app_data(state)
            .app_data(web::JsonConfig::default().error_handler(|err, _req| {
                GatewayError::bad_request(err.to_string()).into()
            }))
            .wrap(cors)
            .wrap(Logger::default())
            .wrap(DefaultHeaders::new().add(("Server", "Prompt-Gateway")))
            .route("/health", web::get().to(health_check))
            .configure(routes::configure_routes)
    }

    fn build_cors(server: &ServerConfig) -> Cors {
        let cors_config = &server.cors;
        let mut cors = Cors::default();
        if !cors_config.enabled {
            return cors;
        }

        if cors_config.allows_all_origins() {
            cors = cors.allow_any_origin();
        } else {
            for origin in &cors_config.allowed_origins {
                cors = cors.allowed_origin(origin);
            }
        }

        let methods: Vec<actix_web::http::Method> = cors_config
            .allowed_methods
            .iter()
            .filter_map(|m| m.parse().ok())
            .collect();
        if !methods.is_empty() {
            cors = cors.allowed_methods(methods);
        }

        let headers: Vec<actix_web::http::header::HeaderName> = cors_config
            .allowed_headers
            .iter()
            .filter_map(|h| h.parse().ok())
            .collect();
        if !headers.is_empty() {
            cors = cors.allowed_headers(headers);
        }

        cors.expose_headers(vec![routes::PROVIDER_HEADER])
            .max_age(cors_config.max_age as usize)
    }

    /// Spawn the fast-fail provider warmup in the background
    fn spawn_warmup(&self) {
        let routing = self.state.config.routing().clone();
        if !routing.warmup_on_start {
            return;
        }

        let router = self.state.router.clone();
        let factory = self.state.factory.clone();
        tokio::spawn(async move {
            run_warmup(router.registry(), factory.as_ref(), &routing).await;
        });
    }

    /// Start the HTTP server
    pub async fn start(self) -> Result<()> {
        let bind_addr = self.config.address();
        let port = self.config.port;

        info!("Starting HTTP server on {}", bind_addr);
        self.spawn_warmup();

        let state = web::Data::new(self.state);
        let mut server = ActixHttpServer::new(move || Self::create_app(state.clone()));
        if let Some(workers) = self.config.workers {
            server = server.workers(workers);
        }

        let server = server
            .bind(&bind_addr)
            .map_err(|e| Self::format_bind_error(e, &bind_addr, port))?
            .run();

        info!("HTTP server listening on {}", bind_addr);

        server
            .await
            .map_err(|e| GatewayError::server(format!("Server error: {}", e)))?;

        info!("HTTP server stopped");
        Ok(())
    }

    /// Get server configuration
    pub fn config(&self) -> &ServerConfig {
        &self.config
    }

    /// Get application state
    pub fn state(&self) -> &AppState {
        &self.state
    }
}
