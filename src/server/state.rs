//! Application state shared across HTTP handlers

use crate::config::Config;
use crate::core::circuit_breaker::CircuitBreakerRegistry;
use crate::core::experimental::ExperimentalAdapter;
use crate::core::providers::{HttpClientFactory, ProviderRegistry, UpstreamClientFactory};
use crate::core::router::CompletionRouter;
use std::sync::Arc;

/// HTTP server state shared across handlers
///
/// Everything is built once at startup. The circuit breaker table is the only
/// mutable piece and it synchronizes itself.
#[derive(Clone)]
pub struct AppState {
    /// Gateway configuration (shared read-only)
    pub config: Arc<Config>,
    /// Completion router
    pub router: Arc<CompletionRouter>,
    /// Client factory, shared with the warmup task
    pub factory: Arc<dyn UpstreamClientFactory>,
}

impl AppState {
    /// Create a new AppState backed by real HTTP clients
    pub fn new(config: Config) -> Self {
        Self::with_factory(config, Arc::new(HttpClientFactory::new()))
    }

    /// Create a new AppState with a specific client factory
    pub fn with_factory(config: Config, factory: Arc<dyn UpstreamClientFactory>) -> Self {
        let registry = Arc::new(ProviderRegistry::new(config.providers().to_vec()));
        let breaker = Arc::new(CircuitBreakerRegistry::default());
        let experimental = Arc::new(ExperimentalAdapter::new(
            config.experimental().clone(),
            breaker,
            Arc::clone(&factory),
        ));
        let router = Arc::new(CompletionRouter::new(
            registry,
            Arc::clone(&factory),
            experimental,
            config.routing().clone(),
        ));

        Self {
            config: Arc::new(config),
            router,
            factory,
        }
    }

    /// Get gateway configuration
    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn registry(&self) -> &ProviderRegistry {
        self.router.registry()
    }
}
