//! Source normalization
//!
//! Total, pure conversions from provider wire shapes into the canonical
//! records. Unknown or missing labels fall back to defaults instead of
//! failing, so one sloppy provider entry never costs the whole list.

use cinewatch_media_providers::embed::RawEmbedEntry;
use cinewatch_media_providers::source_api::{ApiDownloadOption, ApiStreamSource, ApiTorrentSource};

use crate::models::{
    DownloadOption, Quality, Reliability, SourceType, StreamSource, TorrentHealth, TorrentSource,
};

/// Normalize one embed-provider entry.
///
/// `subtitles` is the provider's supported-language list; per-entry data
/// never carries subtitles.
#[must_use]
pub fn normalize(raw: &RawEmbedEntry, provider_name: &str, subtitles: &[String]) -> StreamSource {
    StreamSource {
        id: raw.id.clone(),
        name: non_empty(raw.name.as_deref()).unwrap_or(provider_name).to_string(),
        url: raw.url.clone(),
        source_type: raw
            .kind
            .as_deref()
            .and_then(SourceType::from_label)
            .unwrap_or_default(),
        quality: raw
            .quality
            .as_deref()
            .and_then(Quality::from_label)
            .unwrap_or_default(),
        reliability: raw
            .reliability
            .as_deref()
            .and_then(Reliability::from_label)
            .unwrap_or_default(),
        is_ad_free: raw.ad_free.unwrap_or(false),
        language: raw.language.clone(),
        subtitles: subtitles.to_vec(),
        file_size: raw.file_size.clone(),
    }
}

/// Primary API stream entries carry their own subtitle list
#[must_use]
pub fn from_api_stream(api: ApiStreamSource) -> StreamSource {
    let name = non_empty(api.name.as_deref()).unwrap_or(&api.id).to_string();
    StreamSource {
        source_type: api
            .kind
            .as_deref()
            .and_then(SourceType::from_label)
            .unwrap_or_default(),
        quality: api
            .quality
            .as_deref()
            .and_then(Quality::from_label)
            .unwrap_or_default(),
        reliability: api
            .reliability
            .as_deref()
            .and_then(Reliability::from_label)
            .unwrap_or_default(),
        is_ad_free: api.is_ad_free.unwrap_or(false),
        name,
        id: api.id,
        url: api.url,
        language: api.language,
        subtitles: api.subtitles,
        file_size: api.file_size,
    }
}

#[must_use]
pub fn from_api_download(api: ApiDownloadOption) -> DownloadOption {
    DownloadOption {
        name: non_empty(api.name.as_deref()).unwrap_or(&api.id).to_string(),
        quality: api.quality.unwrap_or_else(|| Quality::default().label().to_string()),
        format: api.format.unwrap_or_else(|| "MP4".to_string()),
        id: api.id,
        url: api.url,
        codec: api.codec,
        file_size: api.file_size,
    }
}

#[must_use]
pub fn from_api_torrent(api: ApiTorrentSource) -> TorrentSource {
    TorrentSource {
        name: non_empty(api.name.as_deref()).unwrap_or(&api.id).to_string(),
        quality: api.quality.unwrap_or_else(|| Quality::default().label().to_string()),
        health: TorrentHealth::from_label_or_seeds(api.health.as_deref(), api.seeds),
        id: api.id,
        magnet: api.magnet,
        codec: api.codec,
        file_size: api.file_size,
        seeds: api.seeds,
        peers: api.peers,
    }
}

fn non_empty(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|v| !v.is_empty())
}
