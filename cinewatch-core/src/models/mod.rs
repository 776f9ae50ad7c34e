pub mod content;
pub mod playback;
pub mod source;

pub use content::{ContentRequest, ContentType, InvalidArgument};
pub use playback::{PlaybackTarget, SubtitleSettings, VideoPlayerState, WatchProgress};
pub use source::{
    ContentSources, DownloadOption, Quality, Reliability, SourceType, StreamSource,
    TorrentHealth, TorrentSource,
};
