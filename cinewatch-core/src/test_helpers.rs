//! Test helpers and fixtures for cinewatch-core tests
//!
//! Source fixtures plus in-memory stand-ins for the media element, progress
//! sink and playback observer.

use std::sync::Arc;

use parking_lot::{Mutex, MutexGuard};

use crate::models::{PlaybackTarget, Quality, Reliability, SourceType, StreamSource, WatchProgress};
use crate::service::media_element::{MediaElement, MediaError};
use crate::service::playback::PlaybackObserver;
use crate::service::progress::ProgressSink;

/// Plain `Stable` HD source
pub fn stream_source(id: &str) -> StreamSource {
    stream_source_with(id, Reliability::Stable)
}

pub fn stream_source_with(id: &str, reliability: Reliability) -> StreamSource {
    StreamSource {
        id: id.to_string(),
        name: id.to_string(),
        url: format!("https://player.test/{id}"),
        source_type: SourceType::Direct,
        quality: Quality::Hd,
        reliability,
        is_ad_free: false,
        language: None,
        subtitles: Vec::new(),
        file_size: None,
    }
}

/// What the fake element was asked to do, and how it should answer
#[derive(Debug, Default)]
pub struct FakeElementState {
    pub play_calls: usize,
    pub pause_calls: usize,
    pub load_calls: usize,
    pub current_time: f64,
    pub volume: f64,
    pub muted: bool,
    pub playback_rate: f64,
    pub fullscreen_requests: usize,
    pub fullscreen_exits: usize,
    pub pip_requests: usize,
    pub pip_exits: usize,

    pub reject_play: Option<MediaError>,
    pub reject_fullscreen: Option<MediaError>,
    pub reject_pip: Option<MediaError>,
    pub buffered: Vec<f64>,
    pub buffered_error: Option<MediaError>,
}

/// In-memory `MediaElement`; clones share state
#[derive(Clone, Default)]
pub struct FakeMediaElement {
    state: Arc<Mutex<FakeElementState>>,
}

impl FakeMediaElement {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> MutexGuard<'_, FakeElementState> {
        self.state.lock()
    }
}

#[async_trait::async_trait]
impl MediaElement for FakeMediaElement {
    async fn play(&mut self) -> Result<(), MediaError> {
        let mut state = self.state.lock();
        state.play_calls += 1;
        state.reject_play.clone().map_or(Ok(()), Err)
    }

    fn pause(&mut self) {
        self.state.lock().pause_calls += 1;
    }

    fn load(&mut self) {
        self.state.lock().load_calls += 1;
    }

    fn set_current_time(&mut self, seconds: f64) {
        self.state.lock().current_time = seconds;
    }

    fn set_volume(&mut self, volume: f64) {
        self.state.lock().volume = volume;
    }

    fn set_muted(&mut self, muted: bool) {
        self.state.lock().muted = muted;
    }

    fn set_playback_rate(&mut self, rate: f64) {
        self.state.lock().playback_rate = rate;
    }

    fn buffered_len(&self) -> usize {
        self.state.lock().buffered.len()
    }

    fn buffered_end(&self, index: usize) -> Result<f64, MediaError> {
        let state = self.state.lock();
        if let Some(err) = &state.buffered_error {
            return Err(err.clone());
        }
        state
            .buffered
            .get(index)
            .copied()
            .ok_or_else(|| MediaError::NotSupported(format!("no buffered range {index}")))
    }

    async fn request_fullscreen(&mut self) -> Result<(), MediaError> {
        let mut state = self.state.lock();
        state.fullscreen_requests += 1;
        state.reject_fullscreen.clone().map_or(Ok(()), Err)
    }

    async fn exit_fullscreen(&mut self) -> Result<(), MediaError> {
        self.state.lock().fullscreen_exits += 1;
        Ok(())
    }

    async fn request_picture_in_picture(&mut self) -> Result<(), MediaError> {
        let mut state = self.state.lock();
        state.pip_requests += 1;
        state.reject_pip.clone().map_or(Ok(()), Err)
    }

    async fn exit_picture_in_picture(&mut self) -> Result<(), MediaError> {
        self.state.lock().pip_exits += 1;
        Ok(())
    }
}

/// Collects every progress snapshot
#[derive(Default)]
pub struct RecordingSink {
    pub records: Mutex<Vec<WatchProgress>>,
}

impl ProgressSink for RecordingSink {
    fn record(&self, progress: &WatchProgress) {
        self.records.lock().push(progress.clone());
    }
}

/// Collects play/pause notifications as "play"/"pause" strings
#[derive(Default)]
pub struct RecordingObserver {
    pub events: Mutex<Vec<&'static str>>,
}

impl PlaybackObserver for RecordingObserver {
    fn on_play(&self, _target: PlaybackTarget) {
        self.events.lock().push("play");
    }

    fn on_pause(&self, _target: PlaybackTarget) {
        self.events.lock().push("pause");
    }
}
