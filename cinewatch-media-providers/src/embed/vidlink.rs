//! VidLink embed player

use super::{languages, EmbedUrlBuilder};
use crate::join_url;

#[derive(Debug, Clone)]
pub struct VidLinkEmbed {
    base_url: String,
}

impl VidLinkEmbed {
    pub const DEFAULT_BASE_URL: &'static str = "https://vidlink.pro";

    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
        }
    }
}

impl Default for VidLinkEmbed {
    fn default() -> Self {
        Self::new(Self::DEFAULT_BASE_URL)
    }
}

impl EmbedUrlBuilder for VidLinkEmbed {
    fn key(&self) -> &'static str {
        "vidlink"
    }

    fn display_name(&self) -> &'static str {
        "VidLink"
    }

    fn build_movie_url(&self, tmdb_id: u64) -> String {
        join_url(&self.base_url, &format!("movie/{tmdb_id}"))
    }

    fn build_tv_url(&self, tmdb_id: u64, season: u32, episode: u32) -> String {
        join_url(&self.base_url, &format!("tv/{tmdb_id}/{season}/{episode}"))
    }

    fn supported_subtitles(&self) -> Vec<String> {
        languages(&["English", "Spanish", "French", "German", "Japanese", "Korean", "Hindi"])
    }

    fn quality(&self) -> &'static str {
        "1080p"
    }

    fn is_ad_free(&self) -> bool {
        true
    }
}
