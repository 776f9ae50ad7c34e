//! Primary `SourceProvider`
//!
//! Adapter over the source API, the only provider that also supplies
//! download options and torrents.

use async_trait::async_trait;
use cinewatch_media_providers::SourceApiClient;

use super::{normalizer, ProviderError, SourceProvider};
use crate::models::{ContentRequest, ContentSources};

pub struct PrimaryProvider {
    client: SourceApiClient,
}

impl PrimaryProvider {
    pub fn new(client: SourceApiClient) -> Self {
        Self { client }
    }
}

#[async_trait]
impl SourceProvider for PrimaryProvider {
    fn name(&self) -> &'static str {
        "source_api"
    }

    async fn fetch(&self, request: &ContentRequest) -> Result<ContentSources, ProviderError> {
        let data = self.client.get_all_content_data(&request.to_query()).await?;

        tracing::debug!(
            request = %request,
            streams = data.stream_sources.len(),
            downloads = data.download_options.len(),
            torrents = data.torrent_sources.len(),
            "Source API answered"
        );

        Ok(ContentSources {
            stream_sources: data
                .stream_sources
                .into_iter()
                .map(normalizer::from_api_stream)
                .collect(),
            download_options: data
                .download_options
                .into_iter()
                .map(normalizer::from_api_download)
                .collect(),
            torrent_sources: data
                .torrent_sources
                .into_iter()
                .map(normalizer::from_api_torrent)
                .collect(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Reliability, TorrentHealth};
    use serde_json::json;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    #[tokio::test]
    async fn test_fetch_maps_all_lists() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api/content"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "streamSources": [
                    {"id": "vidjoy_player", "name": "Vidjoy", "url": "https://vidjoy.pro/embed/movie/550", "reliability": "Premium"}
                ],
                "downloadOptions": [
                    {"id": "dl_1080", "url": "https://dl.test/550.mkv", "quality": "1080p", "format": "MKV", "fileSize": "2.1 GB"}
                ],
                "torrentSources": [
                    {"id": "t_1", "magnet": "magnet:?xt=urn:btih:abc", "seeds": 40, "peers": 3}
                ]
            })))
            .mount(&server)
            .await;

        let provider = PrimaryProvider::new(SourceApiClient::new(server.uri()));
        let sources = provider.fetch(&ContentRequest::movie(550)).await.unwrap();

        assert_eq!(sources.stream_sources[0].reliability, Reliability::Premium);
        assert_eq!(sources.download_options[0].file_size.as_deref(), Some("2.1 GB"));
        assert_eq!(sources.torrent_sources[0].health, TorrentHealth::Good);
    }

    #[tokio::test]
    async fn test_fetch_surfaces_http_failure() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(500))
            .mount(&server)
            .await;

        let provider = PrimaryProvider::new(SourceApiClient::new(server.uri()));
        let err = provider.fetch(&ContentRequest::movie(550)).await.unwrap_err();
        assert!(matches!(err, ProviderError::Client(_)));
    }
}
