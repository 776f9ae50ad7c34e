//! Global keyboard shortcuts for a mounted player
//!
//! A player listens for keys through a `PlayerMount`. The listener is removed
//! when the mount is dropped, so an unmounted player never receives keys.

use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Weak};

use parking_lot::Mutex;
use tokio::sync::mpsc;
use tracing::debug;

use super::media_element::MediaElement;
use super::playback::PlaybackOrchestrator;

/// Keys the player reacts to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Key {
    Space,
    ArrowLeft,
    ArrowRight,
    ArrowUp,
    ArrowDown,
    M,
    F,
    Escape,
}

impl Key {
    /// Map a DOM `KeyboardEvent.key`/`code` value; `None` for keys the player ignores
    #[must_use]
    pub fn from_code(code: &str) -> Option<Self> {
        match code {
            " " | "Space" | "Spacebar" => Some(Self::Space),
            "ArrowLeft" | "Left" => Some(Self::ArrowLeft),
            "ArrowRight" | "Right" => Some(Self::ArrowRight),
            "ArrowUp" | "Up" => Some(Self::ArrowUp),
            "ArrowDown" | "Down" => Some(Self::ArrowDown),
            "m" | "M" | "KeyM" => Some(Self::M),
            "f" | "F" | "KeyF" => Some(Self::F),
            "Escape" | "Esc" => Some(Self::Escape),
            _ => None,
        }
    }
}

/// Source of keyboard listeners
pub trait KeyboardTarget {
    /// Register a listener; it stays registered until the mount is dropped
    fn listen(&self) -> PlayerMount;
}

type Listeners = Mutex<HashMap<u64, mpsc::UnboundedSender<Key>>>;

/// In-process keyboard event hub
///
/// Stands in for the document: `dispatch` delivers a key to every live
/// listener. Clones share the same listener set.
#[derive(Clone, Default)]
pub struct KeyboardHub {
    listeners: Arc<Listeners>,
    next_id: Arc<AtomicU64>,
}

impl KeyboardHub {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Deliver a key press. Returns true when the default action must be
    /// suppressed, i.e. the key is a player shortcut and a player is listening.
    pub fn dispatch(&self, code: &str) -> bool {
        let Some(key) = Key::from_code(code) else {
            return false;
        };

        let mut listeners = self.listeners.lock();
        // drop listeners whose receiving side is gone
        listeners.retain(|_, tx| tx.send(key).is_ok());
        !listeners.is_empty()
    }

    /// Number of live listeners
    #[must_use]
    pub fn listener_count(&self) -> usize {
        self.listeners.lock().len()
    }
}

impl KeyboardTarget for KeyboardHub {
    fn listen(&self) -> PlayerMount {
        let id = self.next_id.fetch_add(1, Ordering::Relaxed);
        let (tx, rx) = mpsc::unbounded_channel();
        self.listeners.lock().insert(id, tx);
        debug!(listener = id, "Keyboard listener added");

        PlayerMount {
            id,
            listeners: Arc::downgrade(&self.listeners),
            keys: rx,
        }
    }
}

/// Keyboard listener guard held by a mounted player
pub struct PlayerMount {
    id: u64,
    listeners: Weak<Listeners>,
    keys: mpsc::UnboundedReceiver<Key>,
}

impl PlayerMount {
    /// Next key press, or `None` once the hub is gone
    pub async fn next_key(&mut self) -> Option<Key> {
        self.keys.recv().await
    }

    /// Key press already queued, without waiting
    pub fn try_next_key(&mut self) -> Option<Key> {
        self.keys.try_recv().ok()
    }
}

impl Drop for PlayerMount {
    fn drop(&mut self) {
        if let Some(listeners) = self.listeners.upgrade() {
            listeners.lock().remove(&self.id);
            debug!(listener = self.id, "Keyboard listener removed");
        }
    }
}

/// Feed key presses from `mount` to `player` until a key asks to close the
/// player or the hub goes away.
pub async fn drive_keyboard<E: MediaElement>(
    player: &mut PlaybackOrchestrator<E>,
    mount: &mut PlayerMount,
) {
    while let Some(key) = mount.next_key().await {
        if player.handle_key(key).await.close {
            debug!("Player close requested from keyboard");
            break;
        }
    }
}

/// Handle every key press already queued on `mount`. Returns true when one
/// of them asked to close the player.
pub async fn drain_keyboard<E: MediaElement>(
    player: &mut PlaybackOrchestrator<E>,
    mount: &mut PlayerMount,
) -> bool {
    while let Some(key) = mount.try_next_key() {
        if player.handle_key(key).await.close {
            return true;
        }
    }
    false
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_key_codes() {
        assert_eq!(Key::from_code(" "), Some(Key::Space));
        assert_eq!(Key::from_code("ArrowRight"), Some(Key::ArrowRight));
        assert_eq!(Key::from_code("M"), Some(Key::M));
        assert_eq!(Key::from_code("KeyF"), Some(Key::F));
        assert_eq!(Key::from_code("Esc"), Some(Key::Escape));
        assert_eq!(Key::from_code("Tab"), None);
        assert_eq!(Key::from_code("k"), None);
    }

    #[tokio::test]
    async fn test_mount_receives_keys() {
        let hub = KeyboardHub::new();
        let mut mount = hub.listen();

        assert!(hub.dispatch("ArrowUp"));
        assert!(!hub.dispatch("Tab"));
        assert_eq!(mount.next_key().await, Some(Key::ArrowUp));
        assert_eq!(mount.try_next_key(), None);
    }

    #[test]
    fn test_no_listener_means_no_prevent_default() {
        let hub = KeyboardHub::new();
        assert!(!hub.dispatch(" "));
    }

    #[test]
    fn test_repeated_mounts_do_not_leak() {
        let hub = KeyboardHub::new();
        for _ in 0..100 {
            let first = hub.listen();
            let second = hub.listen();
            assert_eq!(hub.listener_count(), 2);
            drop(first);
            assert_eq!(hub.listener_count(), 1);
            drop(second);
        }
        assert_eq!(hub.listener_count(), 0);
        assert!(!hub.dispatch("f"));
    }

    #[tokio::test]
    async fn test_next_key_ends_when_hub_dropped() {
        let hub = KeyboardHub::new();
        let mut mount = hub.listen();
        hub.dispatch("m");
        drop(hub);

        assert_eq!(mount.next_key().await, Some(Key::M));
        assert_eq!(mount.next_key().await, None);
    }
}
