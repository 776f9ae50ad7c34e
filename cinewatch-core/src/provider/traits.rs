// Source Provider Traits
//
// Core interface for the provider system

use async_trait::async_trait;

use super::ProviderError;
use crate::models::{ContentRequest, ContentSources};

/// Source provider trait
///
/// Every provider (network-backed, URL-templating or hardcoded fallback)
/// answers a validated request with the sources it knows about. A provider
/// that has nothing returns empty lists; a provider that failed returns an
/// error, which callers treat as "zero sources from this provider".
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait SourceProvider: Send + Sync {
    /// Provider name used in logs (e.g. "source_api", "vidsrc")
    fn name(&self) -> &'static str;

    /// Produce sources for one title
    async fn fetch(&self, request: &ContentRequest) -> Result<ContentSources, ProviderError>;
}
