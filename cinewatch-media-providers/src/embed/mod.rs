//! Embed URL builders
//!
//! Pure functions mapping a TMDB id (plus season/episode for TV) to an embed
//! URL, one builder per third-party player. Builders never perform I/O.
//!
//! # Example
//!
//! ```
//! use cinewatch_media_providers::embed::{EmbedUrlBuilder, VidSrcEmbed};
//!
//! let vidsrc = VidSrcEmbed::default();
//! assert!(vidsrc.build_movie_url(550).contains("550"));
//! ```

mod rivestream;
mod vidjoy;
mod vidlink;
mod vidsrc;

pub use rivestream::RivestreamEmbed;
pub use vidjoy::VidjoyEmbed;
pub use vidlink::VidLinkEmbed;
pub use vidsrc::VidSrcEmbed;

use serde::{Deserialize, Serialize};

/// Raw entry produced by an embed provider, before normalization.
///
/// Descriptive fields are loosely typed strings because every provider labels
/// quality and transport its own way.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawEmbedEntry {
    pub id: String,
    #[serde(default)]
    pub name: Option<String>,
    pub url: String,
    #[serde(default)]
    pub kind: Option<String>,
    #[serde(default)]
    pub quality: Option<String>,
    #[serde(default)]
    pub reliability: Option<String>,
    #[serde(default)]
    pub ad_free: Option<bool>,
    #[serde(default)]
    pub language: Option<String>,
    #[serde(default)]
    pub file_size: Option<String>,
}

/// Embed URL builder
///
/// Only the URL templates and the subtitle list are mandatory; the
/// descriptor methods have defaults matching a plain iframe player.
pub trait EmbedUrlBuilder: Send + Sync {
    /// Stable provider key used to namespace source ids (e.g. "vidsrc")
    fn key(&self) -> &'static str;

    /// Human readable provider name
    fn display_name(&self) -> &'static str;

    fn build_movie_url(&self, tmdb_id: u64) -> String;

    fn build_tv_url(&self, tmdb_id: u64, season: u32, episode: u32) -> String;

    /// Subtitle languages the player exposes
    fn supported_subtitles(&self) -> Vec<String>;

    fn quality(&self) -> &'static str {
        "HD"
    }

    fn reliability(&self) -> &'static str {
        "Stable"
    }

    fn is_ad_free(&self) -> bool {
        false
    }

    /// Source id namespaced by provider key: `<key>_<id>[_s<season>e<episode>]`
    fn source_id(&self, tmdb_id: u64, episode: Option<(u32, u32)>) -> String {
        match episode {
            Some((season, episode)) => format!("{}_{tmdb_id}_s{season}e{episode}", self.key()),
            None => format!("{}_{tmdb_id}", self.key()),
        }
    }

    /// Raw entries for one title. Defaults to a single iframe entry.
    fn raw_entries(&self, tmdb_id: u64, episode: Option<(u32, u32)>) -> Vec<RawEmbedEntry> {
        let url = match episode {
            Some((season, episode)) => self.build_tv_url(tmdb_id, season, episode),
            None => self.build_movie_url(tmdb_id),
        };

        vec![RawEmbedEntry {
            id: self.source_id(tmdb_id, episode),
            name: Some(self.display_name().to_string()),
            url,
            kind: Some("direct".to_string()),
            quality: Some(self.quality().to_string()),
            reliability: Some(self.reliability().to_string()),
            ad_free: Some(self.is_ad_free()),
            language: None,
            file_size: None,
        }]
    }
}

pub(crate) fn languages(list: &[&str]) -> Vec<String> {
    list.iter().map(|s| (*s).to_string()).collect()
}
