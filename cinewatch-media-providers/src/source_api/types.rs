//! Source API JSON types
//!
//! Wire shapes only; descriptive fields stay strings and are mapped to
//! domain enums by the caller.

use serde::{Deserialize, Serialize};

use crate::MediaKind;

/// Query for one title (episode coordinates only for TV)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ContentQuery {
    pub kind: MediaKind,
    pub tmdb_id: u64,
    pub season: Option<u32>,
    pub episode: Option<u32>,
}

impl ContentQuery {
    #[must_use]
    pub const fn movie(tmdb_id: u64) -> Self {
        Self {
            kind: MediaKind::Movie,
            tmdb_id,
            season: None,
            episode: None,
        }
    }

    #[must_use]
    pub const fn episode(tmdb_id: u64, season: u32, episode: u32) -> Self {
        Self {
            kind: MediaKind::Tv,
            tmdb_id,
            season: Some(season),
            episode: Some(episode),
        }
    }

    pub(crate) fn query_pairs(&self) -> Vec<(&'static str, String)> {
        let mut pairs = vec![
            ("contentType", self.kind.as_str().to_string()),
            ("tmdbId", self.tmdb_id.to_string()),
        ];
        if let Some(season) = self.season {
            pairs.push(("season", season.to_string()));
        }
        if let Some(episode) = self.episode {
            pairs.push(("episode", episode.to_string()));
        }
        pairs
    }
}

/// `GET /api/content` response
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ContentDataResponse {
    /// Set by the API instead of an HTTP error status on lookup failures
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    pub stream_sources: Vec<ApiStreamSource>,
    pub download_options: Vec<ApiDownloadOption>,
    pub torrent_sources: Vec<ApiTorrentSource>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ApiStreamSource {
    pub id: String,
    pub name: Option<String>,
    pub url: String,
    #[serde(rename = "type")]
    pub kind: Option<String>,
    pub quality: Option<String>,
    pub reliability: Option<String>,
    pub is_ad_free: Option<bool>,
    pub language: Option<String>,
    pub subtitles: Vec<String>,
    pub file_size: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ApiDownloadOption {
    pub id: String,
    pub name: Option<String>,
    pub url: String,
    pub quality: Option<String>,
    pub format: Option<String>,
    pub codec: Option<String>,
    pub file_size: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ApiTorrentSource {
    pub id: String,
    pub name: Option<String>,
    pub magnet: String,
    pub quality: Option<String>,
    pub codec: Option<String>,
    pub file_size: Option<String>,
    pub seeds: u32,
    pub peers: u32,
    pub health: Option<String>,
}
