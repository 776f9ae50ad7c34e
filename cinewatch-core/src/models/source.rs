//! Playable source records

use serde::{Deserialize, Serialize};

/// Playback transport hint, used for labeling only
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SourceType {
    #[default]
    Direct,
    Hls,
    Mp4,
}

impl SourceType {
    /// Lenient label parsing ("m3u8" -> Hls, "iframe" -> Direct, ...)
    #[must_use]
    pub fn from_label(label: &str) -> Option<Self> {
        match label.trim().to_ascii_lowercase().as_str() {
            "direct" | "iframe" | "embed" => Some(Self::Direct),
            "hls" | "m3u8" => Some(Self::Hls),
            "mp4" => Some(Self::Mp4),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum Quality {
    #[serde(rename = "SD")]
    Sd,
    #[default]
    #[serde(rename = "HD")]
    Hd,
    #[serde(rename = "FHD")]
    Fhd,
    #[serde(rename = "4K")]
    Uhd,
}

impl Quality {
    /// Lenient label parsing ("1080p" -> FHD, "2160p" -> 4K, ...)
    #[must_use]
    pub fn from_label(label: &str) -> Option<Self> {
        match label.trim().to_ascii_lowercase().as_str() {
            "sd" | "360p" | "480p" => Some(Self::Sd),
            "hd" | "720p" => Some(Self::Hd),
            "fhd" | "full hd" | "1080p" => Some(Self::Fhd),
            "4k" | "uhd" | "2160p" => Some(Self::Uhd),
            _ => None,
        }
    }

    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Sd => "SD",
            Self::Hd => "HD",
            Self::Fhd => "FHD",
            Self::Uhd => "4K",
        }
    }
}

/// Provider-asserted trust tier (not measured)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum Reliability {
    Fast,
    #[default]
    Stable,
    Premium,
}

impl Reliability {
    #[must_use]
    pub fn from_label(label: &str) -> Option<Self> {
        match label.trim().to_ascii_lowercase().as_str() {
            "fast" => Some(Self::Fast),
            "stable" => Some(Self::Stable),
            "premium" => Some(Self::Premium),
            _ => None,
        }
    }
}

/// One candidate playable entry
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StreamSource {
    /// Provider-namespaced id, unique within one aggregation result
    pub id: String,
    pub name: String,
    /// Untrusted embed URL, only ever loaded in an isolated frame
    pub url: String,
    #[serde(rename = "type")]
    pub source_type: SourceType,
    pub quality: Quality,
    pub reliability: Reliability,
    pub is_ad_free: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub language: Option<String>,
    #[serde(default)]
    pub subtitles: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub file_size: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DownloadOption {
    pub id: String,
    pub name: String,
    pub url: String,
    pub quality: String,
    pub format: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub codec: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub file_size: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum TorrentHealth {
    Excellent,
    Good,
    #[default]
    Fair,
    Poor,
}

impl TorrentHealth {
    /// Explicit label wins, otherwise derive from the seed count
    #[must_use]
    pub fn from_label_or_seeds(label: Option<&str>, seeds: u32) -> Self {
        match label.map(|l| l.trim().to_ascii_lowercase()).as_deref() {
            Some("excellent") => Self::Excellent,
            Some("good") => Self::Good,
            Some("fair") => Self::Fair,
            Some("poor") => Self::Poor,
            _ => match seeds {
                100.. => Self::Excellent,
                25..=99 => Self::Good,
                5..=24 => Self::Fair,
                _ => Self::Poor,
            },
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TorrentSource {
    pub id: String,
    pub name: String,
    pub magnet: String,
    pub quality: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub codec: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub file_size: Option<String>,
    pub seeds: u32,
    pub peers: u32,
    pub health: TorrentHealth,
}

/// Stream, download and torrent lists for one title
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContentSources {
    pub stream_sources: Vec<StreamSource>,
    pub download_options: Vec<DownloadOption>,
    pub torrent_sources: Vec<TorrentSource>,
}

impl ContentSources {
    #[must_use]
    pub fn streams(stream_sources: Vec<StreamSource>) -> Self {
        Self {
            stream_sources,
            ..Self::default()
        }
    }

    /// True when all three lists are empty
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.stream_sources.is_empty()
            && self.download_options.is_empty()
            && self.torrent_sources.is_empty()
    }

    /// Append another result, keeping order
    pub fn append(&mut self, other: Self) {
        self.stream_sources.extend(other.stream_sources);
        self.download_options.extend(other.download_options);
        self.torrent_sources.extend(other.torrent_sources);
    }

    #[must_use]
    pub fn find_stream(&self, id: &str) -> Option<&StreamSource> {
        self.stream_sources.iter().find(|s| s.id == id)
    }
}
