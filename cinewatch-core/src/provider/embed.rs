//! Embed `SourceProvider`
//!
//! Adapter that calls a tier-1 `EmbedUrlBuilder` and normalizes its entries

use std::panic::{catch_unwind, AssertUnwindSafe};
use std::sync::Arc;

use async_trait::async_trait;
use cinewatch_media_providers::EmbedUrlBuilder;

use super::{normalizer::normalize, ProviderError, SourceProvider};
use crate::models::{ContentRequest, ContentSources};

/// Embed `SourceProvider`
///
/// URL construction is local string work, so the only way it fails is a
/// programming error in a builder. Panics are caught here and reported as
/// `ProviderError::Panicked`.
pub struct EmbedProvider {
    builder: Arc<dyn EmbedUrlBuilder>,
}

impl EmbedProvider {
    pub fn new(builder: Arc<dyn EmbedUrlBuilder>) -> Self {
        Self { builder }
    }

    /// Build and normalize entries synchronously
    pub fn build(&self, request: &ContentRequest) -> Result<ContentSources, ProviderError> {
        let builder = &self.builder;
        let built = catch_unwind(AssertUnwindSafe(|| {
            let entries = builder.raw_entries(request.content_id, request.episode_coords());
            let subtitles = builder.supported_subtitles();
            entries
                .iter()
                .map(|entry| normalize(entry, builder.display_name(), &subtitles))
                .collect::<Vec<_>>()
        }));

        built
            .map(ContentSources::streams)
            .map_err(|payload| ProviderError::Panicked(panic_message(payload.as_ref())))
    }
}

#[async_trait]
impl SourceProvider for EmbedProvider {
    fn name(&self) -> &'static str {
        self.builder.key()
    }

    async fn fetch(&self, request: &ContentRequest) -> Result<ContentSources, ProviderError> {
        self.build(request)
    }
}

fn panic_message(payload: &(dyn std::any::Any + Send)) -> String {
    if let Some(msg) = payload.downcast_ref::<&str>() {
        (*msg).to_string()
    } else if let Some(msg) = payload.downcast_ref::<String>() {
        msg.clone()
    } else {
        "unknown panic".to_string()
    }
}
