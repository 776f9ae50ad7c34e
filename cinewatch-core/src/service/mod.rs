pub mod aggregator;
pub mod content_loader;
pub mod keyboard;
pub mod library;
pub mod media_element;
pub mod playback;
pub mod progress;
pub mod selector;
pub mod watch_session;

pub use aggregator::{merge_outcomes, AggregateError, ProviderOutcome, SourceAggregator};
pub use content_loader::{ContentDetails, ContentLoader, MetadataClient, Trailer};
pub use keyboard::{drain_keyboard, drive_keyboard, Key, KeyboardHub, KeyboardTarget, PlayerMount};
pub use library::{LibraryEntry, LibraryItem, LibraryService};
pub use media_element::{MediaElement, MediaError, MediaErrorDetail, MediaEvent};
pub use playback::{seek_fraction, KeyOutcome, PlaybackObserver, PlaybackOrchestrator, PlayerSettings};
pub use progress::{ProgressSink, ProgressStore, StoreProgressSink};
pub use selector::select_default;
pub use watch_session::{WatchPageState, WatchSession};
