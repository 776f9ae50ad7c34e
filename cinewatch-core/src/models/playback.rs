use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::content::ContentType;
use crate::service::media_element::MediaErrorDetail;

/// Title a player instance is attached to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PlaybackTarget {
    pub content_id: u64,
    pub content_type: ContentType,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SubtitleSettings {
    pub enabled: bool,
    pub language: String,
}

impl Default for SubtitleSettings {
    fn default() -> Self {
        Self {
            enabled: false,
            language: "en".to_string(),
        }
    }
}

/// Session-scoped state of one mounted player
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VideoPlayerState {
    pub is_playing: bool,
    pub current_time: f64, // seconds
    pub duration: f64,     // seconds, 0 until metadata is known
    pub volume: f64,       // 0.0 ..= 1.0
    pub is_muted: bool,
    pub is_fullscreen: bool,
    pub is_picture_in_picture: bool,
    pub playback_rate: f64,
    pub quality: String,
    pub subtitles: SubtitleSettings,
    pub buffered: f64, // percent of duration
    pub loading: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<MediaErrorDetail>,
}

impl Default for VideoPlayerState {
    fn default() -> Self {
        Self {
            is_playing: false,
            current_time: 0.0,
            duration: 0.0,
            volume: 1.0,
            is_muted: false,
            is_fullscreen: false,
            is_picture_in_picture: false,
            playback_rate: 1.0,
            quality: "auto".to_string(),
            subtitles: SubtitleSettings::default(),
            buffered: 0.0,
            loading: true,
            error: None,
        }
    }
}

impl VideoPlayerState {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns true when the state actually changed
    pub fn play(&mut self) -> bool {
        let changed = !self.is_playing;
        self.is_playing = true;
        changed
    }

    /// Returns true when the state actually changed
    pub fn pause(&mut self) -> bool {
        let changed = self.is_playing;
        self.is_playing = false;
        changed
    }

    pub fn seek(&mut self, current_time: f64) {
        self.current_time = current_time;
    }

    pub fn change_speed(&mut self, speed: f64) {
        self.playback_rate = speed;
    }

    /// Duration is usable as a bound only once metadata reported a finite positive value
    #[must_use]
    pub fn has_valid_duration(&self) -> bool {
        is_valid_duration(self.duration)
    }
}

pub(crate) fn is_valid_duration(duration: f64) -> bool {
    duration.is_finite() && duration > 0.0
}

/// Periodic snapshot of playback position
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WatchProgress {
    pub content_id: u64,
    pub content_type: ContentType,
    pub current_time: f64,
    pub duration: f64,
    pub percentage: f64,
    pub last_watched: DateTime<Utc>,
}

impl WatchProgress {
    /// Snapshot for one playback tick.
    ///
    /// Returns `None` unless `duration` is finite and positive and
    /// `current_time` is finite; the position is clamped to `[0, duration]` so
    /// `percentage` always lands in `[0, 100]`.
    #[must_use]
    pub fn snapshot(
        target: PlaybackTarget,
        current_time: f64,
        duration: f64,
        now: DateTime<Utc>,
    ) -> Option<Self> {
        if !is_valid_duration(duration) || !current_time.is_finite() {
            return None;
        }

        let current_time = current_time.clamp(0.0, duration);
        let percentage = (current_time / duration * 100.0).clamp(0.0, 100.0);

        Some(Self {
            content_id: target.content_id,
            content_type: target.content_type,
            current_time,
            duration,
            percentage,
            last_watched: now,
        })
    }

    /// Resume position worth seeking to: strictly inside `(0, duration)`
    #[must_use]
    pub fn resume_position(&self, duration: f64) -> Option<f64> {
        (is_valid_duration(duration)
            && self.current_time.is_finite()
            && self.current_time > 0.0
            && self.current_time < duration)
            .then_some(self.current_time)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const TARGET: PlaybackTarget = PlaybackTarget {
        content_id: 550,
        content_type: ContentType::Movie,
    };

    #[test]
    fn test_initial_state() {
        let state = VideoPlayerState::new();
        assert!(!state.is_playing);
        assert!(state.loading);
        assert_eq!(state.volume, 1.0);
        assert_eq!(state.quality, "auto");
        assert!(!state.has_valid_duration());
    }

    #[test]
    fn test_play_pause_report_changes() {
        let mut state = VideoPlayerState::new();
        assert!(state.play());
        assert!(!state.play());
        assert!(state.pause());
        assert!(!state.pause());
    }

    #[test]
    fn test_snapshot_rejects_invalid_duration() {
        let now = Utc::now();
        assert!(WatchProgress::snapshot(TARGET, 10.0, 0.0, now).is_none());
        assert!(WatchProgress::snapshot(TARGET, 10.0, -5.0, now).is_none());
        assert!(WatchProgress::snapshot(TARGET, 10.0, f64::NAN, now).is_none());
        assert!(WatchProgress::snapshot(TARGET, 10.0, f64::INFINITY, now).is_none());
        assert!(WatchProgress::snapshot(TARGET, f64::NAN, 100.0, now).is_none());
    }

    #[test]
    fn test_snapshot_percentage_bounds() {
        let now = Utc::now();
        let p = WatchProgress::snapshot(TARGET, 30.0, 120.0, now).unwrap();
        assert_eq!(p.percentage, 25.0);

        let over = WatchProgress::snapshot(TARGET, 500.0, 120.0, now).unwrap();
        assert_eq!(over.percentage, 100.0);
        assert_eq!(over.current_time, 120.0);

        let under = WatchProgress::snapshot(TARGET, -3.0, 120.0, now).unwrap();
        assert_eq!(under.percentage, 0.0);
    }

    #[test]
    fn test_resume_position() {
        let p = WatchProgress::snapshot(TARGET, 30.0, 120.0, Utc::now()).unwrap();
        assert_eq!(p.resume_position(120.0), Some(30.0));
        assert_eq!(p.resume_position(20.0), None);
        assert_eq!(p.resume_position(0.0), None);
    }

    #[test]
    fn test_progress_json_roundtrip_field_names() {
        let p = WatchProgress::snapshot(TARGET, 30.0, 120.0, Utc::now()).unwrap();
        let json = serde_json::to_value(&p).unwrap();
        assert_eq!(json["contentId"], 550);
        assert_eq!(json["contentType"], "movie");
        assert!(json.get("lastWatched").is_some());
    }
}
