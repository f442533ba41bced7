//! Model listing endpoint

use crate::config::{ProviderConfig, RoutingConfig};
use crate::server::state::AppState;
use actix_web::{HttpResponse, web};
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Fallbacks used when nothing is configured
const FALLBACK_PROVIDER: &str = "default";
const FALLBACK_MODEL: &str = "deepseek";

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ModelsResponse {
    pub providers: Vec<ProviderListing>,
    pub default_provider: String,
    pub default_model: String,
    /// Every model flattened as `provider:model`
    pub models: Vec<FlatModel>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProviderListing {
    pub id: String,
    pub name: String,
    pub is_configured: bool,
    pub default_model: String,
    pub models: Vec<ModelListing>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ModelListing {
    pub id: String,
    pub label: String,
    pub provider_id: String,
    pub is_default: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FlatModel {
    pub id: String,
    pub label: String,
    pub provider_id: String,
    pub model_id: String,
    pub is_default: bool,
}

/// A provider's default: configured, else its first advertised model
fn provider_default_model(provider: &ProviderConfig) -> String {
    provider
        .default_model
        .clone()
        .or_else(|| provider.models.first().map(|m| m.id.clone()))
        .unwrap_or_default()
}

impl ModelsResponse {
    pub fn build<'a>(
        providers: impl IntoIterator<Item = &'a ProviderConfig>,
        routing: &RoutingConfig,
    ) -> Self {
        let providers: Vec<&ProviderConfig> = providers.into_iter().collect();

        let default_provider = routing
            .default_provider
            .clone()
            .or_else(|| providers.first().map(|p| p.id.clone()))
            .unwrap_or_else(|| FALLBACK_PROVIDER.to_string());
        let default_model = routing
            .default_model
            .clone()
            .or_else(|| {
                providers
                    .first()
                    .map(|p| provider_default_model(p))
                    .filter(|m| !m.is_empty())
            })
            .unwrap_or_else(|| FALLBACK_MODEL.to_string());

        let listings = providers
            .iter()
            .map(|p| {
                let provider_default = provider_default_model(p);
                ProviderListing {
                    id: p.id.clone(),
                    name: p.name.clone(),
                    is_configured: p.has_api_key(),
                    models: p
                        .models
                        .iter()
                        .map(|m| ModelListing {
                            id: m.id.clone(),
                            label: m.label.clone(),
                            provider_id: p.id.clone(),
                            is_default: m.id == provider_default,
                        })
                        .collect(),
                    default_model: provider_default,
                }
            })
            .collect();

        let models = providers
            .iter()
            .flat_map(|p| {
                let provider_default = provider_default_model(p);
                let is_default_provider = p.id == default_provider;
                p.models.iter().map(move |m| FlatModel {
                    id: format!("{}:{}", p.id, m.id),
                    label: format!("{} ({})", m.label, p.name),
                    provider_id: p.id.clone(),
                    model_id: m.id.clone(),
                    is_default: is_default_provider && m.id == provider_default,
                })
            })
            .collect();

        Self {
            providers: listings,
            default_provider,
            default_model,
            models,
        }
    }
}

/// List configured providers and their advertised models
pub async fn list_models(state: web::Data<AppState>) -> HttpResponse {
    debug!("Listing available models");
    let response = ModelsResponse::build(state.registry().iter(), state.config().routing());
    HttpResponse::Ok().json(response)
}
