//! Minimal fallback `SourceProvider`
//!
//! Two well-known players templated straight from the request. Used when
//! aggregation produced nothing at all, so the watch page always has
//! something to offer even with every network call failing.

use async_trait::async_trait;
use cinewatch_media_providers::{EmbedUrlBuilder, RivestreamEmbed, VidjoyEmbed};

use super::{ProviderError, SourceProvider};
use crate::models::{ContentRequest, ContentSources, Quality, Reliability, SourceType, StreamSource};

/// Id of the premium fallback player; also the selector's first preference
pub const VIDJOY_PLAYER_ID: &str = "vidjoy_player";

/// Id of the secondary fallback server; the selector's second preference
pub const RIVESTREAM_SERVER_2_ID: &str = "rivestream_server_2";

pub struct FallbackProvider {
    vidjoy: VidjoyEmbed,
    rivestream: RivestreamEmbed,
}

impl FallbackProvider {
    pub fn new(vidjoy: VidjoyEmbed, rivestream: RivestreamEmbed) -> Self {
        Self {
            vidjoy,
            rivestream: rivestream.with_server(2),
        }
    }

    /// Exactly two sources; never fails
    #[must_use]
    pub fn sources(&self, request: &ContentRequest) -> Vec<StreamSource> {
        vec![
            StreamSource {
                id: VIDJOY_PLAYER_ID.to_string(),
                name: "Vidjoy Player".to_string(),
                url: build_url(&self.vidjoy, request),
                source_type: SourceType::Direct,
                quality: Quality::Fhd,
                reliability: Reliability::Premium,
                is_ad_free: true,
                language: None,
                subtitles: self.vidjoy.supported_subtitles(),
                file_size: None,
            },
            StreamSource {
                id: RIVESTREAM_SERVER_2_ID.to_string(),
                name: "Rivestream Server 2".to_string(),
                url: build_url(&self.rivestream, request),
                source_type: SourceType::Direct,
                quality: Quality::Fhd,
                reliability: Reliability::Stable,
                is_ad_free: false,
                language: None,
                subtitles: self.rivestream.supported_subtitles(),
                file_size: None,
            },
        ]
    }
}

impl Default for FallbackProvider {
    fn default() -> Self {
        Self::new(VidjoyEmbed::default(), RivestreamEmbed::default())
    }
}

fn build_url(builder: &impl EmbedUrlBuilder, request: &ContentRequest) -> String {
    match request.episode_coords() {
        Some((season, episode)) => builder.build_tv_url(request.content_id, season, episode),
        None => builder.build_movie_url(request.content_id),
    }
}

#[async_trait]
impl SourceProvider for FallbackProvider {
    fn name(&self) -> &'static str {
        "fallback"
    }

    async fn fetch(&self, request: &ContentRequest) -> Result<ContentSources, ProviderError> {
        Ok(ContentSources::streams(self.sources(request)))
    }
}
