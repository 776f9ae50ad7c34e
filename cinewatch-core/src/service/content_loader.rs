//! Title metadata for the watch page
//!
//! Details, videos and similar titles are fetched concurrently. Only the
//! details call is required; the other two degrade to empty lists.

use std::sync::Arc;

use async_trait::async_trait;
use cinewatch_media_providers::tmdb::{ContentRecord, Video};
use cinewatch_media_providers::TmdbClient;
use serde::Serialize;
use tracing::{debug, warn};

use crate::models::ContentType;
use crate::provider::ProviderError;
use crate::{Error, Result};

/// Metadata source
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait MetadataClient: Send + Sync {
    async fn get_details(
        &self,
        content_type: ContentType,
        content_id: u64,
    ) -> std::result::Result<ContentRecord, ProviderError>;

    async fn get_videos(
        &self,
        content_type: ContentType,
        content_id: u64,
    ) -> std::result::Result<Vec<Video>, ProviderError>;

    async fn get_similar(
        &self,
        content_type: ContentType,
        content_id: u64,
    ) -> std::result::Result<Vec<ContentRecord>, ProviderError>;
}

#[async_trait]
impl MetadataClient for TmdbClient {
    async fn get_details(
        &self,
        content_type: ContentType,
        content_id: u64,
    ) -> std::result::Result<ContentRecord, ProviderError> {
        Ok(TmdbClient::get_details(self, content_type.into(), content_id).await?)
    }

    async fn get_videos(
        &self,
        content_type: ContentType,
        content_id: u64,
    ) -> std::result::Result<Vec<Video>, ProviderError> {
        Ok(TmdbClient::get_videos(self, content_type.into(), content_id)
            .await?
            .results)
    }

    async fn get_similar(
        &self,
        content_type: ContentType,
        content_id: u64,
    ) -> std::result::Result<Vec<ContentRecord>, ProviderError> {
        Ok(TmdbClient::get_similar(self, content_type.into(), content_id)
            .await?
            .results)
    }
}

/// Trailer picked for a title
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Trailer {
    pub key: String,
    pub name: String,
    pub embed_url: String,
}

/// Everything the watch page shows about a title
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ContentDetails {
    pub content_type: ContentType,
    pub record: ContentRecord,
    pub trailer: Option<Trailer>,
    pub similar: Vec<ContentRecord>,
}

/// First YouTube trailer, else the first YouTube teaser
#[must_use]
pub fn pick_trailer(videos: &[Video]) -> Option<&Video> {
    let youtube = |kind: &'static str| {
        videos
            .iter()
            .find(move |v| v.site == "YouTube" && v.kind == kind && !v.key.is_empty())
    };
    youtube("Trailer").or_else(|| youtube("Teaser"))
}

#[must_use]
pub fn youtube_embed_url(key: &str) -> String {
    format!("https://www.youtube.com/embed/{key}?autoplay=1&rel=0")
}

pub struct ContentLoader {
    client: Arc<dyn MetadataClient>,
}

impl ContentLoader {
    pub fn new(client: Arc<dyn MetadataClient>) -> Self {
        Self { client }
    }

    pub async fn load(&self, content_type: ContentType, content_id: i64) -> Result<ContentDetails> {
        let content_id = u64::try_from(content_id)
            .ok()
            .filter(|id| *id > 0)
            .ok_or_else(|| {
                Error::InvalidInput(format!("content id must be a positive integer, got {content_id}"))
            })?;
        self.fetch(content_type, content_id).await
    }

    /// Load an already validated title
    pub async fn fetch(&self, content_type: ContentType, content_id: u64) -> Result<ContentDetails> {
        let (details, videos, similar) = futures::join!(
            self.client.get_details(content_type, content_id),
            self.client.get_videos(content_type, content_id),
            self.client.get_similar(content_type, content_id),
        );

        let record = details?;
        let videos = videos.unwrap_or_else(|e| {
            warn!(content_id, error = %e, "Failed to load videos");
            Vec::new()
        });
        let similar = similar.unwrap_or_else(|e| {
            warn!(content_id, error = %e, "Failed to load similar titles");
            Vec::new()
        });

        let trailer = pick_trailer(&videos).map(|video| Trailer {
            key: video.key.clone(),
            name: video.name.clone(),
            embed_url: youtube_embed_url(&video.key),
        });

        debug!(
            content_id,
            title = record.display_title(),
            has_trailer = trailer.is_some(),
            similar = similar.len(),
            "Loaded content details"
        );

        Ok(ContentDetails {
            content_type,
            record,
            trailer,
            similar,
        })
    }
}
