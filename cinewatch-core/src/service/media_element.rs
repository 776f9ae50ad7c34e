//! Media element abstraction
//!
//! The orchestrator drives playback through this trait and reacts to the
//! `MediaEvent`s the element dispatches. A browser binding implements it in
//! production; tests use an in-memory fake.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Native error detail reported by the element's `error` event
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MediaErrorDetail {
    pub code: u16,
    pub message: String,
}

impl MediaErrorDetail {
    pub const ABORTED: u16 = 1;
    pub const NETWORK: u16 = 2;
    pub const DECODE: u16 = 3;
    pub const SRC_NOT_SUPPORTED: u16 = 4;

    #[must_use]
    pub fn new(code: u16, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
        }
    }
}

/// Failure of a single element call
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum MediaError {
    /// Rejected by user-agent policy (autoplay, fullscreen permission)
    #[error("Not allowed: {0}")]
    NotAllowed(String),

    #[error("Not supported: {0}")]
    NotSupported(String),

    #[error("Request aborted")]
    Aborted,

    #[error("Media error {code}: {message}")]
    Native { code: u16, message: String },
}

impl From<MediaErrorDetail> for MediaError {
    fn from(detail: MediaErrorDetail) -> Self {
        Self::Native {
            code: detail.code,
            message: detail.message,
        }
    }
}

/// Events dispatched by the element
#[derive(Debug, Clone, PartialEq)]
pub enum MediaEvent {
    /// Playback actually started
    Play,
    Pause,
    Ended,
    LoadedMetadata { duration: f64 },
    TimeUpdate { current_time: f64, duration: f64 },
    /// Buffered ranges changed
    Progress,
    Error(MediaErrorDetail),
    FullscreenChange(bool),
    PictureInPictureChange(bool),
}

/// Playable media element
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait MediaElement: Send {
    /// Request playback. Resolves once the request is accepted; the `Play`
    /// event confirms it.
    async fn play(&mut self) -> Result<(), MediaError>;

    fn pause(&mut self);

    /// Reset the element and reload its source
    fn load(&mut self);

    fn set_current_time(&mut self, seconds: f64);

    fn set_volume(&mut self, volume: f64);

    fn set_muted(&mut self, muted: bool);

    fn set_playback_rate(&mut self, rate: f64);

    /// Number of buffered time ranges
    fn buffered_len(&self) -> usize;

    /// End of the buffered range at `index`
    fn buffered_end(&self, index: usize) -> Result<f64, MediaError>;

    async fn request_fullscreen(&mut self) -> Result<(), MediaError>;

    async fn exit_fullscreen(&mut self) -> Result<(), MediaError>;

    async fn request_picture_in_picture(&mut self) -> Result<(), MediaError>;

    async fn exit_picture_in_picture(&mut self) -> Result<(), MediaError>;
}
