//! VidSrc embed player

use super::{languages, EmbedUrlBuilder};
use crate::join_url;

#[derive(Debug, Clone)]
pub struct VidSrcEmbed {
    base_url: String,
}

impl VidSrcEmbed {
    pub const DEFAULT_BASE_URL: &'static str = "https://vidsrc.xyz";

    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
        }
    }
}

impl Default for VidSrcEmbed {
    fn default() -> Self {
        Self::new(Self::DEFAULT_BASE_URL)
    }
}

impl EmbedUrlBuilder for VidSrcEmbed {
    fn key(&self) -> &'static str {
        "vidsrc"
    }

    fn display_name(&self) -> &'static str {
        "VidSrc"
    }

    fn build_movie_url(&self, tmdb_id: u64) -> String {
        join_url(&self.base_url, &format!("embed/movie?tmdb={tmdb_id}"))
    }

    fn build_tv_url(&self, tmdb_id: u64, season: u32, episode: u32) -> String {
        join_url(
            &self.base_url,
            &format!("embed/tv?tmdb={tmdb_id}&season={season}&episode={episode}"),
        )
    }

    fn supported_subtitles(&self) -> Vec<String> {
        languages(&["English", "Spanish", "French"])
    }

    fn reliability(&self) -> &'static str {
        "Fast"
    }
}
