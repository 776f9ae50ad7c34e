//! "Liked" and "My List" membership
//!
//! Each list is one JSON array in the key/value store. The watch page only
//! toggles membership; list pages read the arrays directly.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::models::ContentType;
use crate::repository::KeyValueStore;
use crate::Result;

pub const LIKED_KEY: &str = "liked_list";
pub const MY_LIST_KEY: &str = "my_list";

/// Minimal description of a title, as shown on list pages
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LibraryItem {
    pub content_id: u64,
    pub title: String,
    #[serde(default)]
    pub poster_path: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LibraryEntry {
    /// `<type>_<id>`, unique within a list
    pub id: String,
    pub content_id: u64,
    pub content_type: ContentType,
    pub title: String,
    #[serde(default)]
    pub poster_path: Option<String>,
    pub added_at: DateTime<Utc>,
}

impl LibraryEntry {
    #[must_use]
    pub fn entry_id(content_id: u64, content_type: ContentType) -> String {
        format!("{content_type}_{content_id}")
    }
}

#[derive(Clone)]
pub struct LibraryService {
    store: Arc<dyn KeyValueStore>,
}

impl LibraryService {
    pub fn new(store: Arc<dyn KeyValueStore>) -> Self {
        Self { store }
    }

    pub fn is_liked(&self, content_id: u64, content_type: ContentType) -> bool {
        self.contains(LIKED_KEY, content_id, content_type)
    }

    pub fn like(&self, item: &LibraryItem, content_type: ContentType) -> Result<()> {
        self.insert(LIKED_KEY, item, content_type)
    }

    pub fn unlike(&self, content_id: u64, content_type: ContentType) -> Result<()> {
        self.delete(LIKED_KEY, &LibraryEntry::entry_id(content_id, content_type))
    }

    pub fn is_in_list(&self, content_id: u64, content_type: ContentType) -> bool {
        self.contains(MY_LIST_KEY, content_id, content_type)
    }

    pub fn add(&self, item: &LibraryItem, content_type: ContentType) -> Result<()> {
        self.insert(MY_LIST_KEY, item, content_type)
    }

    /// Remove a "My List" entry by its entry id
    pub fn remove(&self, entry_id: &str) -> Result<()> {
        self.delete(MY_LIST_KEY, entry_id)
    }

    pub fn liked(&self) -> Vec<LibraryEntry> {
        self.read(LIKED_KEY)
    }

    pub fn my_list(&self) -> Vec<LibraryEntry> {
        self.read(MY_LIST_KEY)
    }

    fn contains(&self, key: &str, content_id: u64, content_type: ContentType) -> bool {
        let id = LibraryEntry::entry_id(content_id, content_type);
        self.read(key).iter().any(|entry| entry.id == id)
    }

    fn insert(&self, key: &str, item: &LibraryItem, content_type: ContentType) -> Result<()> {
        let mut entries = self.read(key);
        let id = LibraryEntry::entry_id(item.content_id, content_type);
        if entries.iter().any(|entry| entry.id == id) {
            return Ok(());
        }

        entries.insert(
            0,
            LibraryEntry {
                id,
                content_id: item.content_id,
                content_type,
                title: item.title.clone(),
                poster_path: item.poster_path.clone(),
                added_at: Utc::now(),
            },
        );
        self.write(key, &entries)?;
        debug!(list = key, content_id = item.content_id, "Added to list");
        Ok(())
    }

    fn delete(&self, key: &str, entry_id: &str) -> Result<()> {
        let mut entries = self.read(key);
        let before = entries.len();
        entries.retain(|entry| entry.id != entry_id);
        if entries.len() == before {
            return Ok(());
        }

        if entries.is_empty() {
            self.store.remove(key)?;
        } else {
            self.write(key, &entries)?;
        }
        debug!(list = key, entry_id, "Removed from list");
        Ok(())
    }

    /// Stored list; unreadable data reads as an empty list
    fn read(&self, key: &str) -> Vec<LibraryEntry> {
        let raw = match self.store.get(key) {
            Ok(Some(raw)) => raw,
            Ok(None) => return Vec::new(),
            Err(e) => {
                warn!(list = key, error = %e, "Failed to read list");
                return Vec::new();
            }
        };

        serde_json::from_str(&raw).unwrap_or_else(|e| {
            warn!(list = key, error = %e, "Ignoring corrupt list");
            Vec::new()
        })
    }

    fn write(&self, key: &str, entries: &[LibraryEntry]) -> Result<()> {
        let value = serde_json::to_string(entries)?;
        self.store.set(key, &value)?;
        Ok(())
    }
}
