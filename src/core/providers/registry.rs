//! Provider registry
//!
//! Read-only table of configured upstream providers, built once at startup and
//! shared by every request. Load order is preserved; it is the failover order.

use crate::config::ProviderConfig;
use std::collections::HashMap;
use tracing::debug;

/// Configured providers, in load order
#[derive(Debug, Clone, Default)]
pub struct ProviderRegistry {
    providers: Vec<ProviderConfig>,
    index: HashMap<String, usize>,
}

impl ProviderRegistry {
    /// Build a registry; ids are lowercased and duplicates keep the first entry
    pub fn new(providers: impl IntoIterator<Item = ProviderConfig>) -> Self {
        let mut registry = Self::default();
        for provider in providers.into_iter().map(ProviderConfig::normalized) {
            if registry.index.contains_key(&provider.id) {
                debug!(provider = %provider.id, "Duplicate provider ignored");
                continue;
            }
            registry
                .index
                .insert(provider.id.clone(), registry.providers.len());
            registry.providers.push(provider);
        }
        registry
    }

    /// Look up a provider by id (case-insensitive)
    pub fn get(&self, id: &str) -> Option<&ProviderConfig> {
        self.index
            .get(&id.trim().to_lowercase())
            .map(|&i| &self.providers[i])
    }

    pub fn contains(&self, id: &str) -> bool {
        self.get(id).is_some()
    }

    /// Providers in load order
    pub fn iter(&self) -> impl Iterator<Item = &ProviderConfig> {
        self.providers.iter()
    }

    pub fn len(&self) -> usize {
        self.providers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.providers.is_empty()
    }

    /// Ordered providers to attempt for one request.
    ///
    /// A known pinned provider goes first, followed by every other provider
    /// in load order. An unknown or absent pin yields the full registry.
    pub fn failover_chain(&self, pinned: Option<&str>) -> Vec<&ProviderConfig> {
        let first = pinned.and_then(|id| self.get(id));

        let mut chain = Vec::with_capacity(self.providers.len());
        if let Some(first) = first {
            chain.push(first);
        }
        chain.extend(
            self.providers
                .iter()
                .filter(|p| first.is_none_or(|f| f.id != p.id)),
        );
        chain
    }
}
