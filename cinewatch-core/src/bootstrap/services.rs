//! Service initialization and dependency injection

use std::sync::Arc;
use std::time::Duration;

use cinewatch_media_providers::{RivestreamEmbed, SourceApiClient, TmdbClient, VidjoyEmbed};
use tracing::info;

use crate::{
    models::ContentRequest,
    provider::{FallbackProvider, PrimaryProvider, ProviderRegistry},
    repository::{JsonFileStore, KeyValueStore, MemoryStore},
    service::{
        ContentLoader, LibraryService, PlayerSettings, ProgressStore, SourceAggregator,
        StoreProgressSink, WatchSession,
    },
    Config,
};

/// Container for all initialized services
#[derive(Clone)]
pub struct Services {
    /// Primary API, embed providers and fallback
    pub aggregator: Arc<SourceAggregator>,
    /// TMDB metadata (optional, requires an API key)
    pub content_loader: Option<Arc<ContentLoader>>,
    /// Liked and "My List" membership
    pub library: LibraryService,
    /// Watch progress and ratings
    pub progress: ProgressStore,
    /// Throttled progress writer handed to players
    pub progress_sink: Arc<StoreProgressSink>,
    /// Seek and volume steps
    pub player_settings: PlayerSettings,
}

impl Services {
    /// Start a watch page session for one title
    #[must_use]
    pub fn watch_session(&self, request: ContentRequest) -> WatchSession {
        WatchSession::new(
            request,
            self.aggregator.clone(),
            self.content_loader.clone(),
            self.library.clone(),
            self.progress.clone(),
        )
    }
}

/// Initialize all core services
pub fn init_services(config: &Config) -> Result<Services, anyhow::Error> {
    info!("Initializing services...");

    let providers = &config.providers;
    let client = SourceApiClient::with_timeout(
        providers.source_api_url.clone(),
        Duration::from_secs(providers.timeout_seconds),
    )?;
    let primary = Arc::new(PrimaryProvider::new(client));

    let registry = ProviderRegistry::from_config(&providers.embeds)?;
    info!(providers = ?registry.list_instances(), "Embed providers registered");

    let fallback = FallbackProvider::new(
        VidjoyEmbed::new(providers.fallback.vidjoy_base_url.clone()),
        RivestreamEmbed::new(providers.fallback.rivestream_base_url.clone()),
    );
    let aggregator = Arc::new(SourceAggregator::new(
        primary,
        registry.into_instances(),
        fallback,
    ));

    let content_loader = if config.has_tmdb_key() {
        let tmdb = TmdbClient::new(config.tmdb.base_url.clone(), config.tmdb.api_key.clone())
            .with_language(config.tmdb.language.clone());
        info!("TMDB metadata enabled");
        Some(Arc::new(ContentLoader::new(Arc::new(tmdb))))
    } else {
        info!("TMDB metadata not configured (set CINEWATCH_TMDB__API_KEY)");
        None
    };

    let store: Arc<dyn KeyValueStore> = if config.storage.in_memory {
        info!("Using in-memory state store");
        Arc::new(MemoryStore::new())
    } else {
        info!(path = %config.storage.state_file, "Using file state store");
        Arc::new(JsonFileStore::open(&config.storage.state_file)?)
    };

    let progress = ProgressStore::new(store.clone());
    let progress_sink = Arc::new(StoreProgressSink::new(
        progress.clone(),
        config.player.progress_interval,
    ));

    info!("Services initialized");

    Ok(Services {
        aggregator,
        content_loader,
        library: LibraryService::new(store),
        progress,
        progress_sink,
        player_settings: PlayerSettings::from(&config.player),
    })
}
