//! Watch page session
//!
//! Ties the content loader, the aggregator and the default selector to one
//! mounted watch page. Results arriving after `unmount` are dropped, since
//! in-flight provider calls are never cancelled.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use parking_lot::Mutex;
use serde::Serialize;
use tracing::{debug, info, warn};

use super::aggregator::SourceAggregator;
use super::content_loader::{ContentDetails, ContentLoader};
use super::library::{LibraryEntry, LibraryItem, LibraryService};
use super::media_element::MediaElement;
use super::playback::{PlaybackOrchestrator, PlayerSettings};
use super::progress::{ProgressSink, ProgressStore};
use super::selector::select_default;
use crate::models::{ContentRequest, ContentSources, PlaybackTarget, StreamSource, WatchProgress};
use crate::{Error, Result};

/// What the watch page renders
#[derive(Debug, Clone, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct WatchPageState {
    pub loading: bool,
    pub details: Option<ContentDetails>,
    pub sources: ContentSources,
    pub selected_source: Option<StreamSource>,
    /// Viewer-facing message; the page offers a retry when set
    pub error: Option<String>,
    pub is_liked: bool,
    pub is_in_list: bool,
    pub rating: Option<u8>,
    pub saved_progress: Option<WatchProgress>,
}

struct SessionInner {
    request: ContentRequest,
    aggregator: Arc<SourceAggregator>,
    loader: Option<Arc<ContentLoader>>,
    library: LibraryService,
    progress: ProgressStore,
    state: Mutex<WatchPageState>,
    mounted: AtomicBool,
}

/// One mounted watch page. Clones share the same session.
#[derive(Clone)]
pub struct WatchSession {
    inner: Arc<SessionInner>,
}

impl WatchSession {
    pub fn new(
        request: ContentRequest,
        aggregator: Arc<SourceAggregator>,
        loader: Option<Arc<ContentLoader>>,
        library: LibraryService,
        progress: ProgressStore,
    ) -> Self {
        let target = target_of(&request);
        let state = WatchPageState {
            loading: true,
            is_liked: library.is_liked(target.content_id, target.content_type),
            is_in_list: library.is_in_list(target.content_id, target.content_type),
            rating: progress.load_rating(target),
            saved_progress: progress.load_progress(target),
            ..WatchPageState::default()
        };

        Self {
            inner: Arc::new(SessionInner {
                request,
                aggregator,
                loader,
                library,
                progress,
                state: Mutex::new(state),
                mounted: AtomicBool::new(true),
            }),
        }
    }

    pub fn request(&self) -> &ContentRequest {
        &self.inner.request
    }

    pub fn target(&self) -> PlaybackTarget {
        target_of(&self.inner.request)
    }

    /// Snapshot of the page state
    pub fn state(&self) -> WatchPageState {
        self.inner.state.lock().clone()
    }

    pub fn is_mounted(&self) -> bool {
        self.inner.mounted.load(Ordering::Acquire)
    }

    /// Stop applying results; in-flight loads finish and are discarded
    pub fn unmount(&self) {
        self.inner.mounted.store(false, Ordering::Release);
        debug!(request = %self.inner.request, "Watch session unmounted");
    }

    /// Load details and sources, then pick the default source
    pub async fn load(&self) {
        let inner = &self.inner;
        if !self.is_mounted() {
            return;
        }
        {
            let mut state = inner.state.lock();
            state.loading = true;
            state.error = None;
        }

        let details = async {
            match &inner.loader {
                Some(loader) => Some(
                    loader
                        .fetch(inner.request.content_type, inner.request.content_id)
                        .await,
                ),
                None => None,
            }
        };
        let (details, sources) =
            futures::join!(details, inner.aggregator.load_sources_request(&inner.request));

        if !self.is_mounted() {
            debug!(request = %inner.request, "Discarding results for unmounted session");
            return;
        }

        let mut state = inner.state.lock();
        state.loading = false;

        match details {
            Some(Ok(details)) => state.details = Some(details),
            Some(Err(e)) => {
                warn!(request = %inner.request, error = %e, "Failed to load content details");
                state.error = Some(e.user_message().to_string());
            }
            None => {}
        }

        match sources {
            Ok(sources) => {
                state.selected_source = select_default(&sources.stream_sources).cloned();
                info!(
                    request = %inner.request,
                    streams = sources.stream_sources.len(),
                    selected = state.selected_source.as_ref().map(|s| s.id.as_str()),
                    "Watch page sources ready"
                );
                state.sources = sources;
            }
            Err(e) => {
                let e = Error::from(e);
                warn!(request = %inner.request, error = %e, "Failed to load sources");
                state.error = Some(e.user_message().to_string());
            }
        }
    }

    /// User-triggered retry: re-run the whole load path
    pub async fn retry(&self) {
        info!(request = %self.inner.request, "Retrying watch page load");
        self.load().await;
    }

    /// Switch the active source
    pub fn select_source(&self, source_id: &str) -> Result<StreamSource> {
        let mut state = self.inner.state.lock();
        let source = state
            .sources
            .find_stream(source_id)
            .cloned()
            .ok_or_else(|| Error::NotFound(format!("stream source {source_id}")))?;

        info!(
            target: "analytics",
            event = "source_change",
            content_id = self.inner.request.content_id,
            source = %source.id,
            "Source changed"
        );
        state.selected_source = Some(source.clone());
        Ok(source)
    }

    /// Returns the new membership
    pub fn toggle_like(&self) -> Result<bool> {
        let target = self.target();
        let library = &self.inner.library;

        let liked = if library.is_liked(target.content_id, target.content_type) {
            library.unlike(target.content_id, target.content_type)?;
            false
        } else {
            library.like(&self.library_item(), target.content_type)?;
            true
        };
        self.inner.state.lock().is_liked = liked;
        Ok(liked)
    }

    /// Returns the new membership
    pub fn toggle_my_list(&self) -> Result<bool> {
        let target = self.target();
        let library = &self.inner.library;

        let listed = if library.is_in_list(target.content_id, target.content_type) {
            library.remove(&LibraryEntry::entry_id(target.content_id, target.content_type))?;
            false
        } else {
            library.add(&self.library_item(), target.content_type)?;
            true
        };
        self.inner.state.lock().is_in_list = listed;
        Ok(listed)
    }

    /// Persist a 1-10 rating
    pub fn rate(&self, rating: u8) -> Result<()> {
        self.inner.progress.save_rating(self.target(), rating)?;
        self.inner.state.lock().rating = Some(rating);
        Ok(())
    }

    /// Player for the trailer, resuming from saved progress
    pub fn open_player<E: MediaElement>(
        &self,
        element: E,
        settings: PlayerSettings,
        sink: Arc<dyn ProgressSink>,
    ) -> PlaybackOrchestrator<E> {
        let target = self.target();
        PlaybackOrchestrator::new(element, target, settings)
            .with_progress_sink(sink)
            .with_saved_progress(self.inner.progress.load_progress(target))
    }

    fn library_item(&self) -> LibraryItem {
        let state = self.inner.state.lock();
        let record = state.details.as_ref().map(|d| &d.record);
        LibraryItem {
            content_id: self.inner.request.content_id,
            title: record
                .map_or_else(|| self.inner.request.to_string(), |r| r.display_title().to_string()),
            poster_path: record.and_then(|r| r.poster_path.clone()),
        }
    }
}

fn target_of(request: &ContentRequest) -> PlaybackTarget {
    PlaybackTarget {
        content_id: request.content_id,
        content_type: request.content_type,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::provider::{FallbackProvider, MockSourceProvider, ProviderError, VIDJOY_PLAYER_ID};
    use crate::repository::MemoryStore;
    use crate::test_helpers::{stream_source, FakeMediaElement, RecordingSink};
    use cinewatch_media_providers::ProviderClientError;

    fn provider(name: &'static str, ids: &'static [&'static str]) -> MockSourceProvider {
        let mut mock = MockSourceProvider::new();
        mock.expect_name().return_const(name);
        mock.expect_fetch().returning(move |_| {
            Ok(ContentSources::streams(ids.iter().map(|id| stream_source(id)).collect()))
        });
        mock
    }

    fn failing(name: &'static str) -> MockSourceProvider {
        let mut mock = MockSourceProvider::new();
        mock.expect_name().return_const(name);
        mock.expect_fetch().returning(|_| {
            Err(ProviderError::Client(ProviderClientError::Api("down".to_string())))
        });
        mock
    }

    fn session(primary: MockSourceProvider, secondary: MockSourceProvider) -> (WatchSession, Arc<MemoryStore>) {
        let store = Arc::new(MemoryStore::new());
        let aggregator = SourceAggregator::new(
            Arc::new(primary),
            vec![Arc::new(secondary)],
            FallbackProvider::default(),
        );
        let session = WatchSession::new(
            ContentRequest::movie(550),
            Arc::new(aggregator),
            None,
            LibraryService::new(store.clone()),
            ProgressStore::new(store.clone()),
        );
        (session, store)
    }

    #[tokio::test]
    async fn test_load_selects_default() {
        let (session, _) = session(failing("primary"), provider("vidsrc", &["vidsrc_550", "vidsrc_550_alt"]));
        assert!(session.state().loading);

        session.load().await;
        let state = session.state();
        assert!(!state.loading);
        assert_eq!(state.sources.stream_sources.len(), 2);
        assert_eq!(state.selected_source.unwrap().id, "vidsrc_550");
        assert!(state.error.is_none());
    }

    #[tokio::test]
    async fn test_load_falls_back() {
        let (session, _) = session(failing("primary"), failing("vidsrc"));
        session.load().await;

        let state = session.state();
        assert_eq!(state.sources.stream_sources.len(), 2);
        assert_eq!(state.selected_source.unwrap().id, VIDJOY_PLAYER_ID);
    }

    #[tokio::test]
    async fn test_unmounted_session_ignores_results() {
        let (session, _) = session(failing("primary"), provider("vidsrc", &["vidsrc_550"]));
        session.unmount();
        session.load().await;

        let state = session.state();
        assert!(state.loading);
        assert!(state.sources.stream_sources.is_empty());
    }

    #[tokio::test]
    async fn test_select_source() {
        let (session, _) = session(failing("primary"), provider("vidsrc", &["a", "b"]));
        session.load().await;

        assert_eq!(session.select_source("b").unwrap().id, "b");
        assert_eq!(session.state().selected_source.unwrap().id, "b");
        assert!(matches!(session.select_source("zzz"), Err(Error::NotFound(_))));
        assert_eq!(session.state().selected_source.unwrap().id, "b");
    }

    #[tokio::test]
    async fn test_toggles_and_rating_persist() {
        let (session, store) = session(failing("primary"), provider("vidsrc", &["a"]));

        assert!(session.toggle_like().unwrap());
        assert!(session.toggle_my_list().unwrap());
        session.rate(9).unwrap();
        assert!(session.rate(0).is_err());

        let state = session.state();
        assert!(state.is_liked && state.is_in_list);
        assert_eq!(state.rating, Some(9));

        // a fresh session over the same store sees the saved state
        let aggregator = SourceAggregator::new(
            Arc::new(failing("primary")),
            Vec::new(),
            FallbackProvider::default(),
        );
        let again = WatchSession::new(
            ContentRequest::movie(550),
            Arc::new(aggregator),
            None,
            LibraryService::new(store.clone()),
            ProgressStore::new(store),
        );
        let state = again.state();
        assert!(state.is_liked && state.is_in_list);
        assert_eq!(state.rating, Some(9));

        assert!(!again.toggle_like().unwrap());
        assert!(!again.toggle_my_list().unwrap());
    }

    #[tokio::test]
    async fn test_open_player_resumes_progress() {
        let (session, store) = session(failing("primary"), provider("vidsrc", &["a"]));
        let progress = ProgressStore::new(store);
        progress
            .save_progress(&WatchProgress::snapshot(session.target(), 20.0, 100.0, chrono::Utc::now()).unwrap())
            .unwrap();

        let element = FakeMediaElement::new();
        let handle = element.clone();
        let mut player = session.open_player(
            element,
            PlayerSettings::default(),
            Arc::new(RecordingSink::default()),
        );
        player
            .handle_event(crate::service::media_element::MediaEvent::LoadedMetadata { duration: 100.0 })
            .await;
        assert_eq!(handle.state().current_time, 20.0);
    }
}
