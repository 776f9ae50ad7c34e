//! Source aggregation
//!
//! Fans a request out to the primary provider and every secondary provider,
//! then merges the per-provider outcomes in a fixed order.

use std::collections::HashSet;
use std::sync::Arc;

use futures::future::{join, join_all};
use thiserror::Error;
use tracing::{debug, info, warn};

use crate::models::{ContentRequest, ContentSources, ContentType, InvalidArgument};
use crate::provider::{FallbackProvider, ProviderError, SourceProvider};

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum AggregateError {
    #[error(transparent)]
    InvalidArgument(#[from] InvalidArgument),

    #[error("No sources available for {content_type} {content_id}")]
    NoSourcesAvailable {
        content_type: ContentType,
        content_id: u64,
    },
}

/// Result of one provider call
#[derive(Debug)]
pub struct ProviderOutcome {
    pub provider: &'static str,
    pub result: Result<ContentSources, ProviderError>,
}

/// Concatenate successful outcomes in the order given.
///
/// Failures contribute nothing and are logged. Duplicate stream ids are kept
/// but reported, since ids must be unique within one result.
#[must_use]
pub fn merge_outcomes(outcomes: Vec<ProviderOutcome>) -> ContentSources {
    let mut merged = ContentSources::default();
    let mut seen = HashSet::new();

    for outcome in outcomes {
        match outcome.result {
            Ok(sources) => {
                for stream in &sources.stream_sources {
                    if !seen.insert(stream.id.clone()) {
                        warn!(provider = outcome.provider, id = %stream.id, "Duplicate stream source id");
                    }
                }
                debug!(
                    provider = outcome.provider,
                    streams = sources.stream_sources.len(),
                    "Provider returned sources"
                );
                merged.append(sources);
            }
            Err(e) => {
                warn!(provider = outcome.provider, error = %e, "Provider failed, skipping");
            }
        }
    }

    merged
}

async fn call(provider: &dyn SourceProvider, request: &ContentRequest) -> ProviderOutcome {
    ProviderOutcome {
        provider: provider.name(),
        result: provider.fetch(request).await,
    }
}

/// Source aggregator
///
/// Providers are called concurrently on the caller's task. Results are
/// merged primary first, then secondaries in registration order, whatever
/// order the calls complete in.
pub struct SourceAggregator {
    primary: Arc<dyn SourceProvider>,
    secondaries: Vec<Arc<dyn SourceProvider>>,
    fallback: FallbackProvider,
}

impl SourceAggregator {
    pub fn new(
        primary: Arc<dyn SourceProvider>,
        secondaries: Vec<Arc<dyn SourceProvider>>,
        fallback: FallbackProvider,
    ) -> Self {
        Self {
            primary,
            secondaries,
            fallback,
        }
    }

    /// Validate raw identifiers and aggregate every provider
    pub async fn aggregate(
        &self,
        content_id: i64,
        content_type: ContentType,
        season: Option<i64>,
        episode: Option<i64>,
    ) -> Result<ContentSources, AggregateError> {
        let request = ContentRequest::new(content_id, content_type, season, episode)?;
        self.aggregate_request(&request).await
    }

    pub async fn aggregate_request(
        &self,
        request: &ContentRequest,
    ) -> Result<ContentSources, AggregateError> {
        let (primary, secondaries) = join(
            call(self.primary.as_ref(), request),
            self.call_secondaries(request),
        )
        .await;

        let mut outcomes = Vec::with_capacity(secondaries.len() + 1);
        outcomes.push(primary);
        outcomes.extend(secondaries);

        let merged = merge_outcomes(outcomes);
        if merged.is_empty() {
            return Err(AggregateError::NoSourcesAvailable {
                content_type: request.content_type,
                content_id: request.content_id,
            });
        }

        info!(
            request = %request,
            streams = merged.stream_sources.len(),
            downloads = merged.download_options.len(),
            torrents = merged.torrent_sources.len(),
            "Aggregated sources"
        );
        Ok(merged)
    }

    /// Aggregate, falling back to the built-in players when nothing came back.
    ///
    /// Never fails for a valid request.
    pub async fn load_sources(
        &self,
        content_id: i64,
        content_type: ContentType,
        season: Option<i64>,
        episode: Option<i64>,
    ) -> Result<ContentSources, AggregateError> {
        let request = ContentRequest::new(content_id, content_type, season, episode)?;
        self.load_sources_request(&request).await
    }

    pub async fn load_sources_request(
        &self,
        request: &ContentRequest,
    ) -> Result<ContentSources, AggregateError> {
        match self.aggregate_request(request).await {
            Err(AggregateError::NoSourcesAvailable { .. }) => {
                warn!(request = %request, "No provider returned sources, using fallback players");
                let mut sources = ContentSources::streams(self.fallback.sources(request));
                // best-effort second pass over the secondaries
                sources.append(merge_outcomes(self.call_secondaries(request).await));
                Ok(sources)
            }
            other => other,
        }
    }

    /// Names of the secondary providers, in merge order
    #[must_use]
    pub fn secondary_names(&self) -> Vec<&'static str> {
        self.secondaries.iter().map(|p| p.name()).collect()
    }

    async fn call_secondaries(&self, request: &ContentRequest) -> Vec<ProviderOutcome> {
        join_all(
            self.secondaries
                .iter()
                .map(|provider| call(provider.as_ref(), request)),
        )
        .await
    }
}
