//! Playback orchestration
//!
//! `PlaybackOrchestrator` owns one media element and the `VideoPlayerState`
//! describing it. User actions go through its methods, element events
//! through `handle_event`. The play/pause and loading axes change only in
//! the `enter_*`/`*_loading` transitions below.

use std::sync::Arc;

use chrono::Utc;
use tracing::{debug, error, info, warn};

use super::keyboard::Key;
use super::media_element::{MediaElement, MediaErrorDetail, MediaEvent};
use super::progress::ProgressSink;
use crate::config::PlayerConfig;
use crate::models::{PlaybackTarget, VideoPlayerState, WatchProgress};
use crate::models::playback::is_valid_duration;

pub const MIN_PLAYBACK_RATE: f64 = 0.25;
pub const MAX_PLAYBACK_RATE: f64 = 4.0;

/// Play/pause notifications (fire-and-forget)
pub trait PlaybackObserver: Send + Sync {
    fn on_play(&self, _target: PlaybackTarget) {}

    fn on_pause(&self, _target: PlaybackTarget) {}
}

/// Step sizes for keyboard control
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PlayerSettings {
    pub seek_step: f64,
    pub volume_step: f64,
}

impl Default for PlayerSettings {
    fn default() -> Self {
        Self {
            seek_step: 10.0,
            volume_step: 0.1,
        }
    }
}

impl From<&PlayerConfig> for PlayerSettings {
    fn from(config: &PlayerConfig) -> Self {
        Self {
            seek_step: config.seek_step,
            volume_step: config.volume_step,
        }
    }
}

/// What the key handler asks of its caller
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct KeyOutcome {
    /// Suppress the browser's default action (scrolling, find, ...)
    pub prevent_default: bool,
    /// Close the player
    pub close: bool,
}

/// Fraction of a progress bar under a click, always within `[0, 1]`.
///
/// A zero or negative bar width is treated as one pixel.
#[must_use]
pub fn seek_fraction(click_x: f64, bar_left: f64, bar_width: f64) -> f64 {
    let fraction = (click_x - bar_left) / bar_width.max(1.0);
    if fraction.is_nan() {
        0.0
    } else {
        fraction.clamp(0.0, 1.0)
    }
}

pub struct PlaybackOrchestrator<E: MediaElement> {
    element: E,
    state: VideoPlayerState,
    target: PlaybackTarget,
    settings: PlayerSettings,
    observer: Option<Arc<dyn PlaybackObserver>>,
    progress_sink: Option<Arc<dyn ProgressSink>>,
    saved_progress: Option<WatchProgress>,
}

impl<E: MediaElement> PlaybackOrchestrator<E> {
    pub fn new(element: E, target: PlaybackTarget, settings: PlayerSettings) -> Self {
        Self {
            element,
            state: VideoPlayerState::new(),
            target,
            settings,
            observer: None,
            progress_sink: None,
            saved_progress: None,
        }
    }

    #[must_use]
    pub fn with_observer(mut self, observer: Arc<dyn PlaybackObserver>) -> Self {
        self.observer = Some(observer);
        self
    }

    #[must_use]
    pub fn with_progress_sink(mut self, sink: Arc<dyn ProgressSink>) -> Self {
        self.progress_sink = Some(sink);
        self
    }

    /// Progress to resume from once metadata is known
    #[must_use]
    pub fn with_saved_progress(mut self, progress: Option<WatchProgress>) -> Self {
        self.saved_progress = progress;
        self
    }

    pub fn state(&self) -> &VideoPlayerState {
        &self.state
    }

    pub fn target(&self) -> PlaybackTarget {
        self.target
    }

    pub fn element(&self) -> &E {
        &self.element
    }

    /// Release the element
    pub fn into_element(self) -> E {
        self.element
    }

    // Transitions

    fn enter_playing(&mut self) {
        if self.state.play() {
            debug!(content = ?self.target, "Playing");
            if let Some(observer) = &self.observer {
                observer.on_play(self.target);
            }
        }
    }

    fn enter_paused(&mut self) {
        if self.state.pause() {
            debug!(content = ?self.target, "Paused");
            if let Some(observer) = &self.observer {
                observer.on_pause(self.target);
            }
        }
    }

    fn start_loading(&mut self) {
        self.state.loading = true;
    }

    fn finish_loading(&mut self) {
        if self.state.loading {
            self.state.loading = false;
            debug!(content = ?self.target, duration = self.state.duration, "Loading finished");
        }
    }

    // Element events

    pub async fn handle_event(&mut self, event: MediaEvent) {
        match event {
            MediaEvent::Play => self.enter_playing(),
            MediaEvent::Pause | MediaEvent::Ended => self.enter_paused(),
            MediaEvent::LoadedMetadata { duration } => self.on_loaded_metadata(duration).await,
            MediaEvent::TimeUpdate {
                current_time,
                duration,
            } => self.on_time_update(current_time, duration),
            MediaEvent::Progress => self.on_buffering_progress(),
            MediaEvent::Error(detail) => self.on_error(detail),
            MediaEvent::FullscreenChange(active) => self.state.is_fullscreen = active,
            MediaEvent::PictureInPictureChange(active) => self.state.is_picture_in_picture = active,
        }
    }

    async fn on_loaded_metadata(&mut self, duration: f64) {
        if is_valid_duration(duration) {
            self.state.duration = duration;
        } else {
            warn!(content = ?self.target, duration, "Metadata reported no usable duration");
        }
        self.finish_loading();

        let resume = self
            .saved_progress
            .take()
            .and_then(|progress| progress.resume_position(self.state.duration));
        if let Some(position) = resume {
            info!(content = ?self.target, position, "Resuming from saved progress");
            self.element.set_current_time(position);
            self.state.seek(position);
            self.request_play().await;
        }
    }

    fn on_time_update(&mut self, current_time: f64, duration: f64) {
        if current_time.is_finite() {
            self.state.current_time = current_time.max(0.0);
        }
        if is_valid_duration(duration) {
            self.state.duration = duration;
        }

        let Some(sink) = &self.progress_sink else {
            return;
        };
        // snapshot() refuses zero, negative and NaN durations
        if let Some(progress) =
            WatchProgress::snapshot(self.target, self.state.current_time, duration, Utc::now())
        {
            sink.record(&progress);
        }
    }

    fn on_buffering_progress(&mut self) {
        if !self.state.has_valid_duration() {
            return;
        }
        let ranges = self.element.buffered_len();
        if ranges == 0 {
            return;
        }

        match self.element.buffered_end(ranges - 1) {
            Ok(end) if end.is_finite() => {
                self.state.buffered = (end / self.state.duration * 100.0).clamp(0.0, 100.0);
            }
            Ok(end) => debug!(end, "Ignoring non-finite buffered range"),
            Err(e) => warn!(error = %e, "Failed to read buffered ranges"),
        }
    }

    fn on_error(&mut self, detail: MediaErrorDetail) {
        error!(
            content = ?self.target,
            code = detail.code,
            message = %detail.message,
            "Media element error"
        );
        self.finish_loading();
        self.enter_paused();
        self.state.error = Some(detail);
    }

    // User actions

    /// Ask the element to play; `MediaEvent::Play` confirms.
    async fn request_play(&mut self) -> bool {
        match self.element.play().await {
            Ok(()) => true,
            Err(e) => {
                warn!(content = ?self.target, error = %e, "Play request rejected");
                false
            }
        }
    }

    pub async fn toggle_play_pause(&mut self) {
        if self.state.is_playing {
            self.element.pause();
            self.enter_paused();
        } else {
            self.request_play().await;
        }
    }

    /// Relative seek. Clamped to `[0, duration]`; without a known duration
    /// only the lower bound applies.
    pub fn seek_by(&mut self, delta: f64) {
        if !delta.is_finite() {
            return;
        }
        self.seek_to_time(self.state.current_time + delta);
    }

    /// Absolute seek to a fraction of the duration
    pub fn seek_to(&mut self, fraction: f64) {
        if !fraction.is_finite() || !self.state.has_valid_duration() {
            return;
        }
        self.seek_to_time(fraction.clamp(0.0, 1.0) * self.state.duration);
    }

    /// Seek to the position under a click on the progress bar
    pub fn seek_to_click(&mut self, click_x: f64, bar_left: f64, bar_width: f64) {
        self.seek_to(seek_fraction(click_x, bar_left, bar_width));
    }

    fn seek_to_time(&mut self, time: f64) {
        let upper = if self.state.has_valid_duration() {
            self.state.duration
        } else {
            f64::INFINITY
        };
        let time = time.clamp(0.0, upper);
        self.element.set_current_time(time);
        self.state.seek(time);
    }

    /// Set the volume, clamped to `[0, 1]`. Zero also mutes; non-zero never
    /// unmutes.
    pub fn set_volume(&mut self, volume: f64) {
        if !volume.is_finite() {
            return;
        }
        let volume = volume.clamp(0.0, 1.0);
        self.element.set_volume(volume);
        self.state.volume = volume;

        if volume == 0.0 && !self.state.is_muted {
            self.element.set_muted(true);
            self.state.is_muted = true;
        }
    }

    pub fn change_volume_by(&mut self, delta: f64) {
        if !delta.is_finite() {
            return;
        }
        // hundredths, so repeated 0.1 steps land exactly on 0 and 1
        let volume = ((self.state.volume + delta) * 100.0).round() / 100.0;
        self.set_volume(volume);
    }

    pub fn toggle_mute(&mut self) {
        let muted = !self.state.is_muted;
        self.element.set_muted(muted);
        self.state.is_muted = muted;
    }

    /// Enter or leave fullscreen. The flag is set once the request resolves
    /// and corrected by `MediaEvent::FullscreenChange`; a rejected request
    /// leaves the state untouched.
    pub async fn toggle_fullscreen(&mut self) {
        let result = if self.state.is_fullscreen {
            self.element.exit_fullscreen().await.map(|()| false)
        } else {
            self.element.request_fullscreen().await.map(|()| true)
        };

        match result {
            Ok(active) => self.state.is_fullscreen = active,
            Err(e) => warn!(content = ?self.target, error = %e, "Fullscreen request failed"),
        }
    }

    /// Same contract as `toggle_fullscreen`, for picture-in-picture
    pub async fn toggle_picture_in_picture(&mut self) {
        let result = if self.state.is_picture_in_picture {
            self.element.exit_picture_in_picture().await.map(|()| false)
        } else {
            self.element.request_picture_in_picture().await.map(|()| true)
        };

        match result {
            Ok(active) => self.state.is_picture_in_picture = active,
            Err(e) => warn!(content = ?self.target, error = %e, "Picture-in-picture request failed"),
        }
    }

    /// Display quality label. Does not change the media source.
    pub fn set_quality(&mut self, quality: &str) {
        self.state.quality = quality.to_string();
        info!(
            target: "analytics",
            event = "quality_change",
            content_id = self.target.content_id,
            content_type = %self.target.content_type,
            quality,
            "Quality changed"
        );
    }

    pub fn set_subtitles(&mut self, enabled: bool, language: &str) {
        self.state.subtitles.enabled = enabled;
        self.state.subtitles.language = language.to_string();
        info!(
            target: "analytics",
            event = "subtitle_change",
            content_id = self.target.content_id,
            content_type = %self.target.content_type,
            enabled,
            language,
            "Subtitles changed"
        );
    }

    /// Playback speed, clamped to `[0.25, 4.0]`
    pub fn set_playback_rate(&mut self, rate: f64) {
        if !rate.is_finite() {
            return;
        }
        let rate = rate.clamp(MIN_PLAYBACK_RATE, MAX_PLAYBACK_RATE);
        self.element.set_playback_rate(rate);
        self.state.change_speed(rate);
        info!(
            target: "analytics",
            event = "playback_rate_change",
            content_id = self.target.content_id,
            content_type = %self.target.content_type,
            rate,
            "Playback rate changed"
        );
    }

    /// Clear a playback error and reload the element
    pub fn retry(&mut self) {
        info!(content = ?self.target, "Retrying playback");
        self.state.error = None;
        self.start_loading();
        self.element.load();
    }

    pub async fn handle_key(&mut self, key: Key) -> KeyOutcome {
        let mut outcome = KeyOutcome {
            prevent_default: true,
            close: false,
        };

        match key {
            Key::Space => self.toggle_play_pause().await,
            Key::ArrowLeft => self.seek_by(-self.settings.seek_step),
            Key::ArrowRight => self.seek_by(self.settings.seek_step),
            Key::ArrowUp => self.change_volume_by(self.settings.volume_step),
            Key::ArrowDown => self.change_volume_by(-self.settings.volume_step),
            Key::M => self.toggle_mute(),
            Key::F => self.toggle_fullscreen().await,
            Key::Escape => {
                if self.state.is_fullscreen {
                    self.toggle_fullscreen().await;
                } else {
                    outcome.close = true;
                }
            }
        }

        outcome
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::ContentType;
    use crate::service::media_element::MediaError;
    use crate::test_helpers::{FakeMediaElement, RecordingObserver, RecordingSink};

    const TARGET: PlaybackTarget = PlaybackTarget {
        content_id: 550,
        content_type: ContentType::Movie,
    };

    fn player() -> (PlaybackOrchestrator<FakeMediaElement>, FakeMediaElement) {
        let element = FakeMediaElement::new();
        let handle = element.clone();
        (
            PlaybackOrchestrator::new(element, TARGET, PlayerSettings::default()),
            handle,
        )
    }

    async fn loaded(duration: f64) -> (PlaybackOrchestrator<FakeMediaElement>, FakeMediaElement) {
        let (mut player, handle) = player();
        player
            .handle_event(MediaEvent::LoadedMetadata { duration })
            .await;
        (player, handle)
    }

    #[test]
    fn test_seek_fraction_bounds() {
        assert_eq!(seek_fraction(150.0, 100.0, 200.0), 0.25);
        assert_eq!(seek_fraction(50.0, 100.0, 200.0), 0.0);
        assert_eq!(seek_fraction(400.0, 100.0, 200.0), 1.0);
        assert_eq!(seek_fraction(150.0, 100.0, 0.0), 1.0);
        assert_eq!(seek_fraction(f64::NAN, 100.0, 200.0), 0.0);
        assert_eq!(seek_fraction(150.0, 100.0, f64::NAN), 1.0);
    }

    #[tokio::test]
    async fn test_play_waits_for_confirmation() {
        let observer = Arc::new(RecordingObserver::default());
        let (player, handle) = player();
        let mut player = player.with_observer(observer.clone());

        player.toggle_play_pause().await;
        assert_eq!(handle.state().play_calls, 1);
        assert!(!player.state().is_playing);

        player.handle_event(MediaEvent::Play).await;
        player.handle_event(MediaEvent::Play).await;
        assert!(player.state().is_playing);

        player.toggle_play_pause().await;
        assert!(!player.state().is_playing);
        assert_eq!(handle.state().pause_calls, 1);

        // a late pause event is not a second transition
        player.handle_event(MediaEvent::Pause).await;
        assert_eq!(*observer.events.lock(), vec!["play", "pause"]);
    }

    #[tokio::test]
    async fn test_autoplay_rejection_is_absorbed() {
        let (mut player, handle) = player();
        handle.state().reject_play = Some(MediaError::NotAllowed("autoplay".to_string()));

        player.toggle_play_pause().await;
        assert!(!player.state().is_playing);
        assert!(player.state().error.is_none());
    }

    #[tokio::test]
    async fn test_loaded_metadata_resumes_saved_progress() {
        let saved = WatchProgress::snapshot(TARGET, 42.0, 100.0, Utc::now());
        let (player, handle) = player();
        let mut player = player.with_saved_progress(saved);
        assert!(player.state().loading);

        player
            .handle_event(MediaEvent::LoadedMetadata { duration: 100.0 })
            .await;
        assert!(!player.state().loading);
        assert_eq!(player.state().current_time, 42.0);
        assert_eq!(handle.state().current_time, 42.0);
        assert_eq!(handle.state().play_calls, 1);

        // resume happens once
        player
            .handle_event(MediaEvent::LoadedMetadata { duration: 100.0 })
            .await;
        assert_eq!(handle.state().play_calls, 1);
    }

    #[tokio::test]
    async fn test_saved_progress_past_end_is_ignored() {
        let saved = WatchProgress::snapshot(TARGET, 90.0, 100.0, Utc::now());
        let (player, handle) = player();
        let mut player = player.with_saved_progress(saved);

        player
            .handle_event(MediaEvent::LoadedMetadata { duration: 60.0 })
            .await;
        assert_eq!(player.state().current_time, 0.0);
        assert_eq!(handle.state().play_calls, 0);
    }

    #[tokio::test]
    async fn test_seek_clamps_to_duration() {
        let (mut player, handle) = loaded(120.0).await;

        player.seek_by(-30.0);
        assert_eq!(player.state().current_time, 0.0);
        player.seek_by(500.0);
        assert_eq!(player.state().current_time, 120.0);
        player.seek_to(0.5);
        assert_eq!(player.state().current_time, 60.0);
        player.seek_by(f64::NAN);
        assert_eq!(player.state().current_time, 60.0);
        assert_eq!(handle.state().current_time, 60.0);
    }

    #[tokio::test]
    async fn test_click_seek_on_zero_width_bar() {
        let (mut player, _) = loaded(120.0).await;
        player.seek_to_click(150.0, 100.0, 0.0);
        assert!(player.state().current_time.is_finite());
        assert_eq!(player.state().current_time, 120.0);
    }

    #[tokio::test]
    async fn test_seek_without_duration_only_clamps_below() {
        let (mut player, _) = player();
        player.seek_by(25.0);
        assert_eq!(player.state().current_time, 25.0);
        player.seek_by(-40.0);
        assert_eq!(player.state().current_time, 0.0);
        // absolute seeks need a duration
        player.seek_to(0.5);
        assert_eq!(player.state().current_time, 0.0);
    }

    #[tokio::test]
    async fn test_volume_zero_mutes_and_stays_muted() {
        let (mut player, handle) = player();

        player.set_volume(0.0);
        assert!(player.state().is_muted);
        assert!(handle.state().muted);

        player.set_volume(0.5);
        assert_eq!(player.state().volume, 0.5);
        assert!(player.state().is_muted);

        player.toggle_mute();
        assert!(!player.state().is_muted);

        player.set_volume(7.0);
        assert_eq!(player.state().volume, 1.0);
        player.set_volume(-1.0);
        assert_eq!(player.state().volume, 0.0);
    }

    #[tokio::test]
    async fn test_volume_steps_reach_zero() {
        let (mut player, _) = player();
        for _ in 0..10 {
            player.change_volume_by(-0.1);
        }
        assert_eq!(player.state().volume, 0.0);
        assert!(player.state().is_muted);

        player.change_volume_by(0.3);
        assert_eq!(player.state().volume, 0.3);
    }

    #[tokio::test]
    async fn test_rejected_fullscreen_leaves_state() {
        let (mut player, handle) = player();
        handle.state().reject_fullscreen = Some(MediaError::NotAllowed("denied".to_string()));

        player.toggle_fullscreen().await;
        assert!(!player.state().is_fullscreen);
        assert_eq!(handle.state().fullscreen_requests, 1);
    }

    #[tokio::test]
    async fn test_fullscreen_flag_follows_change_event() {
        let (mut player, _) = player();

        player.toggle_fullscreen().await;
        assert!(player.state().is_fullscreen);

        // user left fullscreen through the browser UI
        player.handle_event(MediaEvent::FullscreenChange(false)).await;
        assert!(!player.state().is_fullscreen);
    }

    #[tokio::test]
    async fn test_unsupported_pip_leaves_state() {
        let (mut player, handle) = player();
        handle.state().reject_pip = Some(MediaError::NotSupported("pip".to_string()));

        player.toggle_picture_in_picture().await;
        assert!(!player.state().is_picture_in_picture);

        handle.state().reject_pip = None;
        player.toggle_picture_in_picture().await;
        assert!(player.state().is_picture_in_picture);
        player.handle_event(MediaEvent::PictureInPictureChange(false)).await;
        assert!(!player.state().is_picture_in_picture);
    }

    #[tokio::test]
    async fn test_time_update_emits_bounded_progress() {
        let sink = Arc::new(RecordingSink::default());
        let (player, _) = player();
        let mut player = player.with_progress_sink(sink.clone());

        for duration in [0.0, -10.0, f64::NAN, f64::INFINITY] {
            player
                .handle_event(MediaEvent::TimeUpdate { current_time: 5.0, duration })
                .await;
        }
        assert!(sink.records.lock().is_empty());

        player
            .handle_event(MediaEvent::TimeUpdate { current_time: 30.0, duration: 120.0 })
            .await;
        player
            .handle_event(MediaEvent::TimeUpdate { current_time: 150.0, duration: 120.0 })
            .await;

        let records = sink.records.lock();
        assert_eq!(records.len(), 2);
        assert_eq!(records[0].percentage, 25.0);
        assert!(records.iter().all(|p| (0.0..=100.0).contains(&p.percentage)));
    }

    #[tokio::test]
    async fn test_buffering_progress_ignores_bad_ranges() {
        let (mut player, handle) = player();

        // no duration yet
        handle.state().buffered = vec![30.0];
        player.handle_event(MediaEvent::Progress).await;
        assert_eq!(player.state().buffered, 0.0);

        player
            .handle_event(MediaEvent::LoadedMetadata { duration: 120.0 })
            .await;
        handle.state().buffered = vec![10.0, 60.0];
        player.handle_event(MediaEvent::Progress).await;
        assert_eq!(player.state().buffered, 50.0);

        handle.state().buffered_error = Some(MediaError::Aborted);
        player.handle_event(MediaEvent::Progress).await;
        assert_eq!(player.state().buffered, 50.0);

        handle.state().buffered.clear();
        handle.state().buffered_error = None;
        player.handle_event(MediaEvent::Progress).await;
        assert_eq!(player.state().buffered, 50.0);
    }

    #[tokio::test]
    async fn test_error_event_and_retry() {
        let observer = Arc::new(RecordingObserver::default());
        let (player, handle) = player();
        let mut player = player.with_observer(observer.clone());

        player.handle_event(MediaEvent::Play).await;
        let detail = MediaErrorDetail::new(MediaErrorDetail::NETWORK, "connection reset");
        player.handle_event(MediaEvent::Error(detail.clone())).await;

        assert!(!player.state().loading);
        assert!(!player.state().is_playing);
        assert_eq!(player.state().error, Some(detail));
        assert_eq!(handle.state().load_calls, 0);
        assert_eq!(*observer.events.lock(), vec!["play", "pause"]);

        player.retry();
        assert!(player.state().error.is_none());
        assert!(player.state().loading);
        assert_eq!(handle.state().load_calls, 1);
    }

    #[tokio::test]
    async fn test_local_only_settings() {
        let (mut player, handle) = player();

        player.set_quality("1080p");
        player.set_subtitles(true, "es");
        player.set_playback_rate(10.0);

        let state = player.state();
        assert_eq!(state.quality, "1080p");
        assert!(state.subtitles.enabled);
        assert_eq!(state.subtitles.language, "es");
        assert_eq!(state.playback_rate, MAX_PLAYBACK_RATE);
        assert_eq!(handle.state().playback_rate, MAX_PLAYBACK_RATE);
        assert_eq!(handle.state().load_calls, 0);
    }

    #[tokio::test]
    async fn test_arrow_right_clamps_to_duration() {
        let (mut player, _) = loaded(40.0).await;
        player
            .handle_event(MediaEvent::TimeUpdate { current_time: 50.0, duration: 40.0 })
            .await;

        let outcome = player.handle_key(Key::ArrowRight).await;
        assert!(outcome.prevent_default);
        assert_eq!(player.state().current_time, 40.0);
    }

    #[tokio::test]
    async fn test_key_bindings() {
        let (mut player, handle) = loaded(120.0).await;
        player.seek_to(0.5);

        player.handle_key(Key::ArrowLeft).await;
        assert_eq!(player.state().current_time, 50.0);
        player.handle_key(Key::ArrowDown).await;
        assert_eq!(player.state().volume, 0.9);
        player.handle_key(Key::ArrowUp).await;
        assert_eq!(player.state().volume, 1.0);
        player.handle_key(Key::M).await;
        assert!(player.state().is_muted);
        player.handle_key(Key::Space).await;
        assert_eq!(handle.state().play_calls, 1);

        player.handle_key(Key::F).await;
        assert!(player.state().is_fullscreen);
        let outcome = player.handle_key(Key::Escape).await;
        assert!(!outcome.close);
        assert!(!player.state().is_fullscreen);
        assert_eq!(handle.state().fullscreen_exits, 1);

        let outcome = player.handle_key(Key::Escape).await;
        assert!(outcome.close);
        assert!(outcome.prevent_default);
    }
}
