//! TMDB HTTP Client

use std::sync::LazyLock;
use std::time::Duration;

use reqwest::Client;
use serde::de::DeserializeOwned;

use super::types::{ContentRecord, Page, VideoList};
use crate::error::{check_response, json_with_limit, ProviderClientError};
use crate::{endpoint_url, MediaKind};

/// Shared HTTP client for TMDB requests (connection pooling)
static SHARED_CLIENT: LazyLock<Client> = LazyLock::new(|| {
    Client::builder()
        .connect_timeout(Duration::from_secs(10))
        .timeout(Duration::from_secs(30))
        .pool_max_idle_per_host(10)
        .build()
        .expect("Failed to build TMDB shared HTTP client")
});

/// TMDB HTTP Client
pub struct TmdbClient {
    base_url: String,
    api_key: String,
    language: Option<String>,
    client: Client,
}

impl TmdbClient {
    pub const DEFAULT_BASE_URL: &'static str = "https://api.themoviedb.org/3";

    /// Create a new TMDB client (reuses shared connection pool)
    pub fn new(base_url: impl Into<String>, api_key: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            api_key: api_key.into(),
            language: None,
            client: SHARED_CLIENT.clone(),
        }
    }

    /// Set the response language (e.g. "en-US")
    #[must_use]
    pub fn with_language(mut self, language: impl Into<String>) -> Self {
        self.language = Some(language.into());
        self
    }

    async fn get<T: DeserializeOwned>(&self, path: &str) -> Result<T, ProviderClientError> {
        let url = endpoint_url(&self.base_url, path)?;

        let mut query = vec![("api_key", self.api_key.as_str())];
        if let Some(ref language) = self.language {
            query.push(("language", language.as_str()));
        }

        let response = self.client.get(url).query(&query).send().await?;
        let response = check_response(response)?;
        json_with_limit(response).await
    }

    /// `GET /{kind}/{id}`
    pub async fn get_details(
        &self,
        kind: MediaKind,
        id: u64,
    ) -> Result<ContentRecord, ProviderClientError> {
        self.get(&format!("{kind}/{id}")).await
    }

    /// `GET /{kind}/{id}/videos`
    pub async fn get_videos(
        &self,
        kind: MediaKind,
        id: u64,
    ) -> Result<VideoList, ProviderClientError> {
        self.get(&format!("{kind}/{id}/videos")).await
    }

    /// `GET /{kind}/{id}/similar`
    pub async fn get_similar(
        &self,
        kind: MediaKind,
        id: u64,
    ) -> Result<Page<ContentRecord>, ProviderClientError> {
        self.get(&format!("{kind}/{id}/similar")).await
    }
}
