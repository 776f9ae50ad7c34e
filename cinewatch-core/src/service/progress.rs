//! Watch progress and rating persistence
//!
//! Values live in a `KeyValueStore` under `progress_<type>_<id>` and
//! `rating_<type>_<id>`. Writers are last-write-wins; two players on the same
//! title overwrite each other.

use std::sync::Arc;

use dashmap::DashMap;
use tracing::{debug, warn};

use crate::models::{PlaybackTarget, WatchProgress};
use crate::repository::{KeyValueStore, PersistenceError};
use crate::{Error, Result};

/// Receives progress snapshots from a playing orchestrator.
///
/// Fire-and-forget: implementations must not fail the caller.
pub trait ProgressSink: Send + Sync {
    fn record(&self, progress: &WatchProgress);
}

pub const MIN_RATING: u8 = 1;
pub const MAX_RATING: u8 = 10;

#[derive(Clone)]
pub struct ProgressStore {
    store: Arc<dyn KeyValueStore>,
}

impl ProgressStore {
    pub fn new(store: Arc<dyn KeyValueStore>) -> Self {
        Self { store }
    }

    #[must_use]
    pub fn progress_key(target: PlaybackTarget) -> String {
        format!("progress_{}_{}", target.content_type, target.content_id)
    }

    #[must_use]
    pub fn rating_key(target: PlaybackTarget) -> String {
        format!("rating_{}_{}", target.content_type, target.content_id)
    }

    /// Saved progress; unreadable or corrupt entries count as none
    #[must_use]
    pub fn load_progress(&self, target: PlaybackTarget) -> Option<WatchProgress> {
        let key = Self::progress_key(target);
        match self.read_json(&key) {
            Ok(progress) => progress,
            Err(e) => {
                warn!(key = %key, error = %e, "Ignoring unreadable watch progress");
                None
            }
        }
    }

    pub fn save_progress(&self, progress: &WatchProgress) -> std::result::Result<(), PersistenceError> {
        let target = PlaybackTarget {
            content_id: progress.content_id,
            content_type: progress.content_type,
        };
        let value = serde_json::to_string(progress)?;
        self.store.set(&Self::progress_key(target), &value)
    }

    /// Saved rating; out-of-range or corrupt entries count as none
    #[must_use]
    pub fn load_rating(&self, target: PlaybackTarget) -> Option<u8> {
        let key = Self::rating_key(target);
        match self.read_json::<u8>(&key) {
            Ok(Some(rating)) if (MIN_RATING..=MAX_RATING).contains(&rating) => Some(rating),
            Ok(Some(rating)) => {
                warn!(key = %key, rating, "Ignoring out-of-range rating");
                None
            }
            Ok(None) => None,
            Err(e) => {
                warn!(key = %key, error = %e, "Ignoring unreadable rating");
                None
            }
        }
    }

    pub fn save_rating(&self, target: PlaybackTarget, rating: u8) -> Result<()> {
        if !(MIN_RATING..=MAX_RATING).contains(&rating) {
            return Err(Error::InvalidInput(format!(
                "rating must be between {MIN_RATING} and {MAX_RATING}, got {rating}"
            )));
        }
        self.store
            .set(&Self::rating_key(target), &rating.to_string())?;
        debug!(content = ?target, rating, "Rating saved");
        Ok(())
    }

    fn read_json<T: serde::de::DeserializeOwned>(
        &self,
        key: &str,
    ) -> std::result::Result<Option<T>, PersistenceError> {
        match self.store.get(key)? {
            Some(raw) => Ok(Some(serde_json::from_str(&raw)?)),
            None => Ok(None),
        }
    }
}

/// `ProgressSink` writing into a `ProgressStore`
///
/// With a non-zero `interval`, a title is written again only once playback
/// moved at least `interval` seconds of media time since the last write.
/// The first snapshot of each title is always written.
pub struct StoreProgressSink {
    store: ProgressStore,
    interval: f64,
    last_written: DashMap<PlaybackTarget, f64>,
}

impl StoreProgressSink {
    #[must_use]
    pub fn new(store: ProgressStore, interval: f64) -> Self {
        Self {
            store,
            interval: if interval.is_finite() { interval.max(0.0) } else { 0.0 },
            last_written: DashMap::new(),
        }
    }
}

impl ProgressSink for StoreProgressSink {
    fn record(&self, progress: &WatchProgress) {
        let target = PlaybackTarget {
            content_id: progress.content_id,
            content_type: progress.content_type,
        };

        if self.interval > 0.0 {
            if let Some(last) = self.last_written.get(&target) {
                if (progress.current_time - *last).abs() < self.interval {
                    return;
                }
            }
        }

        match self.store.save_progress(progress) {
            Ok(()) => {
                self.last_written.insert(target, progress.current_time);
            }
            Err(e) => warn!(content = ?target, error = %e, "Failed to save watch progress"),
        }
    }
}
