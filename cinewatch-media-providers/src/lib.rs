// CineWatch Provider Clients
//
// This crate contains pure client implementations for the third-party services
// the watch page talks to. These clients are independent of the SourceProvider
// trait and can be used standalone.
//
// Architecture:
// - cinewatch-media-providers: Embed URL builders + HTTP clients (source API, TMDB)
// - cinewatch-core/provider: SourceProvider adapters calling these clients
// - cinewatch-core/service: aggregation, selection and playback orchestration

use serde::{Deserialize, Serialize};

// Shared error types
pub mod error;

// Pure URL builders (no I/O)
pub mod embed;

// HTTP clients
pub mod source_api;
pub mod tmdb;

// Re-export client types for convenience
pub use embed::{EmbedUrlBuilder, RawEmbedEntry, RivestreamEmbed, VidLinkEmbed, VidSrcEmbed, VidjoyEmbed};
pub use error::ProviderClientError;
pub use source_api::SourceApiClient;
pub use tmdb::TmdbClient;

/// Media kind understood by every upstream service ("movie" or "tv")
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MediaKind {
    Movie,
    Tv,
}

impl MediaKind {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Movie => "movie",
            Self::Tv => "tv",
        }
    }
}

impl std::fmt::Display for MediaKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Join a base URL and a path without doubling or dropping the slash.
pub(crate) fn join_url(base: &str, path: &str) -> String {
    format!(
        "{}/{}",
        base.trim_end_matches('/'),
        path.trim_start_matches('/')
    )
}

/// Resolve an API path against a configured base URL.
///
/// The base keeps its own path (`https://api.themoviedb.org/3` + `movie/550`
/// is `.../3/movie/550`). A base that is not an absolute http(s) URL is a
/// configuration error.
pub(crate) fn endpoint_url(base: &str, path: &str) -> Result<url::Url, ProviderClientError> {
    let mut base = url::Url::parse(base)?;
    if !matches!(base.scheme(), "http" | "https") {
        return Err(ProviderClientError::InvalidConfig(format!(
            "base URL must be http or https: {base}"
        )));
    }
    if !base.path().ends_with('/') {
        let with_slash = format!("{}/", base.path());
        base.set_path(&with_slash);
    }
    Ok(base.join(path.trim_start_matches('/'))?)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_join_url() {
        assert_eq!(join_url("https://a.io/", "/movie/1"), "https://a.io/movie/1");
        assert_eq!(join_url("https://a.io", "movie/1"), "https://a.io/movie/1");
    }

    #[test]
    fn test_endpoint_url_keeps_base_path() {
        let url = endpoint_url("https://api.themoviedb.org/3", "movie/550").unwrap();
        assert_eq!(url.as_str(), "https://api.themoviedb.org/3/movie/550");
        let url = endpoint_url("http://localhost:3000/", "/api/content").unwrap();
        assert_eq!(url.as_str(), "http://localhost:3000/api/content");
    }

    #[test]
    fn test_endpoint_url_rejects_bad_base() {
        assert!(matches!(
            endpoint_url("localhost:3000", "api/content"),
            Err(ProviderClientError::InvalidConfig(_))
        ));
        assert!(matches!(
            endpoint_url("not a url", "api/content"),
            Err(ProviderClientError::InvalidConfig(_))
        ));
    }

    #[test]
    fn test_media_kind_display() {
        assert_eq!(MediaKind::Movie.to_string(), "movie");
        assert_eq!(MediaKind::Tv.as_str(), "tv");
    }
}
