//! Content identifiers and request validation

use std::fmt;
use std::str::FromStr;

use cinewatch_media_providers::{source_api::ContentQuery, MediaKind};
use serde::{Deserialize, Serialize};

/// Malformed id/type/season/episode
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("Invalid argument: {0}")]
pub struct InvalidArgument(pub String);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ContentType {
    Movie,
    Tv,
}

impl ContentType {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Movie => "movie",
            Self::Tv => "tv",
        }
    }
}

impl fmt::Display for ContentType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ContentType {
    type Err = InvalidArgument;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "movie" => Ok(Self::Movie),
            "tv" => Ok(Self::Tv),
            other => Err(InvalidArgument(format!("unsupported content type: {other:?}"))),
        }
    }
}

impl From<ContentType> for MediaKind {
    fn from(value: ContentType) -> Self {
        match value {
            ContentType::Movie => Self::Movie,
            ContentType::Tv => Self::Tv,
        }
    }
}

/// A validated lookup for one movie or one TV episode
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ContentRequest {
    pub content_id: u64,
    pub content_type: ContentType,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub season: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub episode: Option<u32>,
}

impl ContentRequest {
    /// Validate raw identifiers.
    ///
    /// `content_id` must be positive; `season`/`episode` must both be present
    /// and positive for TV and absent for movies.
    pub fn new(
        content_id: i64,
        content_type: ContentType,
        season: Option<i64>,
        episode: Option<i64>,
    ) -> Result<Self, InvalidArgument> {
        let content_id = positive(content_id, "content id")?;

        let (season, episode) = match (content_type, season, episode) {
            (ContentType::Movie, None, None) => (None, None),
            (ContentType::Movie, _, _) => {
                return Err(InvalidArgument(
                    "season/episode are only valid for tv content".to_string(),
                ))
            }
            (ContentType::Tv, Some(season), Some(episode)) => {
                let season = u32::try_from(positive(season, "season")?)
                    .map_err(|_| InvalidArgument(format!("season out of range: {season}")))?;
                let episode = u32::try_from(positive(episode, "episode")?)
                    .map_err(|_| InvalidArgument(format!("episode out of range: {episode}")))?;
                (Some(season), Some(episode))
            }
            (ContentType::Tv, _, _) => {
                return Err(InvalidArgument(
                    "season and episode are required for tv content".to_string(),
                ))
            }
        };

        Ok(Self {
            content_id,
            content_type,
            season,
            episode,
        })
    }

    #[must_use]
    pub fn movie(content_id: u64) -> Self {
        Self {
            content_id,
            content_type: ContentType::Movie,
            season: None,
            episode: None,
        }
    }

    #[must_use]
    pub fn episode(content_id: u64, season: u32, episode: u32) -> Self {
        Self {
            content_id,
            content_type: ContentType::Tv,
            season: Some(season),
            episode: Some(episode),
        }
    }

    /// `(season, episode)` for TV requests
    #[must_use]
    pub fn episode_coords(&self) -> Option<(u32, u32)> {
        self.season.zip(self.episode)
    }

    #[must_use]
    pub fn to_query(&self) -> ContentQuery {
        ContentQuery {
            kind: self.content_type.into(),
            tmdb_id: self.content_id,
            season: self.season,
            episode: self.episode,
        }
    }
}

impl fmt::Display for ContentRequest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.episode_coords() {
            Some((s, e)) => write!(f, "{} {} S{s:02}E{e:02}", self.content_type, self.content_id),
            None => write!(f, "{} {}", self.content_type, self.content_id),
        }
    }
}

fn positive(value: i64, what: &str) -> Result<u64, InvalidArgument> {
    u64::try_from(value)
        .ok()
        .filter(|v| *v > 0)
        .ok_or_else(|| InvalidArgument(format!("{what} must be a positive integer, got {value}")))
}
