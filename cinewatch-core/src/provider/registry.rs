// Provider Registry
//
// Factory-based registry producing the ordered list of secondary providers

use std::collections::HashMap;
use std::sync::Arc;

use cinewatch_media_providers::{
    EmbedUrlBuilder, RivestreamEmbed, VidLinkEmbed, VidSrcEmbed, VidjoyEmbed,
};

use super::{EmbedProvider, ProviderError, SourceProvider};
use crate::config::EmbedProviderConfig;

/// Provider factory function type
pub type ProviderFactory =
    Box<dyn Fn(&EmbedProviderConfig) -> Result<Arc<dyn SourceProvider>, ProviderError> + Send + Sync>;

/// Registry of secondary providers
///
/// Factories are keyed by provider kind. Instances keep registration order,
/// which is also the order their results are merged in.
pub struct ProviderRegistry {
    factories: HashMap<String, ProviderFactory>,
    instances: Vec<Arc<dyn SourceProvider>>,
}

impl ProviderRegistry {
    /// Create new empty registry
    #[must_use]
    pub fn new() -> Self {
        Self {
            factories: HashMap::new(),
            instances: Vec::new(),
        }
    }

    /// Registry with factories for every built-in embed player
    #[must_use]
    pub fn with_builtin_factories() -> Self {
        let mut registry = Self::new();
        registry.register_factory(
            "vidsrc",
            embed_factory(|cfg| Ok(cfg.base_url.as_ref().map_or_else(VidSrcEmbed::default, VidSrcEmbed::new))),
        );
        registry.register_factory(
            "vidlink",
            embed_factory(|cfg| Ok(cfg.base_url.as_ref().map_or_else(VidLinkEmbed::default, VidLinkEmbed::new))),
        );
        registry.register_factory(
            "vidjoy",
            embed_factory(|cfg| Ok(cfg.base_url.as_ref().map_or_else(VidjoyEmbed::default, VidjoyEmbed::new))),
        );
        registry.register_factory(
            "rivestream",
            embed_factory(|cfg| {
                let builder = cfg
                    .base_url
                    .as_ref()
                    .map_or_else(RivestreamEmbed::default, RivestreamEmbed::new);
                match cfg.server {
                    Some(0) => Err(ProviderError::InvalidConfig(
                        "rivestream server index starts at 1".to_string(),
                    )),
                    Some(server) => Ok(builder.with_server(server)),
                    None => Ok(builder),
                }
            }),
        );
        registry
    }

    /// Register a provider factory
    pub fn register_factory(&mut self, kind: &str, factory: ProviderFactory) {
        self.factories.insert(kind.to_string(), factory);
    }

    /// Create a provider from configuration and append it
    ///
    /// Disabled entries are skipped and return `Ok(false)`.
    pub fn create_instance(&mut self, config: &EmbedProviderConfig) -> Result<bool, ProviderError> {
        if !config.enabled {
            tracing::debug!(kind = %config.kind, "Skipping disabled provider");
            return Ok(false);
        }

        let factory = self
            .factories
            .get(&config.kind)
            .ok_or_else(|| ProviderError::UnknownProvider(config.kind.clone()))?;

        let instance = factory(config)?;
        self.instances.push(instance);

        Ok(true)
    }

    /// Append an already built provider
    pub fn register_instance(&mut self, provider: Arc<dyn SourceProvider>) {
        self.instances.push(provider);
    }

    /// Providers in registration order
    #[must_use]
    pub fn instances(&self) -> &[Arc<dyn SourceProvider>] {
        &self.instances
    }

    #[must_use]
    pub fn into_instances(self) -> Vec<Arc<dyn SourceProvider>> {
        self.instances
    }

    /// Names of all registered instances, in order
    #[must_use]
    pub fn list_instances(&self) -> Vec<&'static str> {
        self.instances.iter().map(|p| p.name()).collect()
    }

    /// Remove every instance with the given name
    pub fn remove_instance(&mut self, name: &str) -> bool {
        let before = self.instances.len();
        self.instances.retain(|p| p.name() != name);
        self.instances.len() != before
    }

    /// Build a registry from the configured embed list
    pub fn from_config(embeds: &[EmbedProviderConfig]) -> Result<Self, ProviderError> {
        let mut registry = Self::with_builtin_factories();
        for embed in embeds {
            registry.create_instance(embed)?;
        }
        Ok(registry)
    }
}

impl Default for ProviderRegistry {
    fn default() -> Self {
        Self::new()
    }
}

fn embed_factory<B, F>(build: F) -> ProviderFactory
where
    B: EmbedUrlBuilder + 'static,
    F: Fn(&EmbedProviderConfig) -> Result<B, ProviderError> + Send + Sync + 'static,
{
    Box::new(move |config| {
        let builder = build(config)?;
        Ok(Arc::new(EmbedProvider::new(Arc::new(builder))) as Arc<dyn SourceProvider>)
    })
}
