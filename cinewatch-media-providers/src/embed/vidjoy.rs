//! Vidjoy embed player

use super::{languages, EmbedUrlBuilder};
use crate::join_url;

/// Vidjoy embed URL builder
#[derive(Debug, Clone)]
pub struct VidjoyEmbed {
    base_url: String,
}

impl VidjoyEmbed {
    pub const DEFAULT_BASE_URL: &'static str = "https://vidjoy.pro";

    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
        }
    }
}

impl Default for VidjoyEmbed {
    fn default() -> Self {
        Self::new(Self::DEFAULT_BASE_URL)
    }
}

impl EmbedUrlBuilder for VidjoyEmbed {
    fn key(&self) -> &'static str {
        "vidjoy"
    }

    fn display_name(&self) -> &'static str {
        "Vidjoy Player"
    }

    fn build_movie_url(&self, tmdb_id: u64) -> String {
        join_url(&self.base_url, &format!("embed/movie/{tmdb_id}"))
    }

    fn build_tv_url(&self, tmdb_id: u64, season: u32, episode: u32) -> String {
        join_url(&self.base_url, &format!("embed/tv/{tmdb_id}/{season}/{episode}"))
    }

    fn supported_subtitles(&self) -> Vec<String> {
        languages(&["English", "Spanish", "French", "German", "Portuguese", "Arabic"])
    }

    fn quality(&self) -> &'static str {
        "FHD"
    }

    fn reliability(&self) -> &'static str {
        "Premium"
    }

    fn is_ad_free(&self) -> bool {
        true
    }
}
