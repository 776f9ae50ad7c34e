//! Rivestream embed player

use super::{languages, EmbedUrlBuilder};
use crate::join_url;

/// Rivestream embed URL builder
///
/// Rivestream takes the title as query parameters and exposes several
/// mirror servers selectable by index.
#[derive(Debug, Clone)]
pub struct RivestreamEmbed {
    base_url: String,
    server: Option<u8>,
}

impl RivestreamEmbed {
    pub const DEFAULT_BASE_URL: &'static str = "https://rivestream.org";

    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            server: None,
        }
    }

    /// Pin the player to a mirror server
    #[must_use]
    pub const fn with_server(mut self, server: u8) -> Self {
        self.server = Some(server);
        self
    }

    fn build(&self, pairs: &[(&str, String)]) -> String {
        let mut query = url::form_urlencoded::Serializer::new(String::new());
        for (key, value) in pairs {
            query.append_pair(key, value);
        }
        if let Some(server) = self.server {
            query.append_pair("server", &server.to_string());
        }
        format!("{}?{}", join_url(&self.base_url, "embed"), query.finish())
    }
}

impl Default for RivestreamEmbed {
    fn default() -> Self {
        Self::new(Self::DEFAULT_BASE_URL)
    }
}

impl EmbedUrlBuilder for RivestreamEmbed {
    fn key(&self) -> &'static str {
        "rivestream"
    }

    fn display_name(&self) -> &'static str {
        "Rivestream"
    }

    fn build_movie_url(&self, tmdb_id: u64) -> String {
        self.build(&[("type", "movie".to_string()), ("id", tmdb_id.to_string())])
    }

    fn build_tv_url(&self, tmdb_id: u64, season: u32, episode: u32) -> String {
        self.build(&[
            ("type", "tv".to_string()),
            ("id", tmdb_id.to_string()),
            ("season", season.to_string()),
            ("episode", episode.to_string()),
        ])
    }

    fn supported_subtitles(&self) -> Vec<String> {
        languages(&["English", "Spanish", "Italian", "Turkish"])
    }

    fn quality(&self) -> &'static str {
        "FHD"
    }
}
