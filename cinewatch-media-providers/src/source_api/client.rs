//! Source API HTTP Client

use std::sync::LazyLock;
use std::time::Duration;

use reqwest::Client;

use super::types::{ContentDataResponse, ContentQuery};
use crate::error::{check_response, json_with_limit, ProviderClientError};
use crate::endpoint_url;

/// Shared HTTP client for source API requests (connection pooling)
static SHARED_CLIENT: LazyLock<Client> = LazyLock::new(|| {
    Client::builder()
        .connect_timeout(Duration::from_secs(10))
        .timeout(Duration::from_secs(30))
        .pool_max_idle_per_host(10)
        .build()
        .expect("Failed to build source API shared HTTP client")
});

/// Source API HTTP Client
pub struct SourceApiClient {
    base_url: String,
    client: Client,
}

impl SourceApiClient {
    /// Create a new client (reuses shared connection pool)
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            client: SHARED_CLIENT.clone(),
        }
    }

    /// Create a client with its own request timeout
    pub fn with_timeout(
        base_url: impl Into<String>,
        timeout: Duration,
    ) -> Result<Self, ProviderClientError> {
        let client = Client::builder()
            .connect_timeout(timeout.min(Duration::from_secs(10)))
            .timeout(timeout)
            .build()?;
        Ok(Self {
            base_url: base_url.into(),
            client,
        })
    }

    #[must_use]
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Fetch stream sources, download options and torrents for one title
    pub async fn get_all_content_data(
        &self,
        query: &ContentQuery,
    ) -> Result<ContentDataResponse, ProviderClientError> {
        let url = endpoint_url(&self.base_url, "api/content")?;

        tracing::debug!(
            tmdb_id = query.tmdb_id,
            kind = %query.kind,
            "Requesting content data from source API"
        );

        let response = self
            .client
            .get(url)
            .query(&query.query_pairs())
            .send()
            .await?;

        let response = check_response(response)?;
        let mut data: ContentDataResponse = json_with_limit(response).await?;

        if let Some(message) = data.error.take() {
            return Err(ProviderClientError::Api(message));
        }

        Ok(data)
    }
}
