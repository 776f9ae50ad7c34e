//! Primary source API client
//!
//! Pure HTTP client for the aggregated source API, the one upstream that
//! supplies stream sources together with download options and torrents.
//!
//! # Example
//!
//! ```no_run
//! use cinewatch_media_providers::{source_api::{ContentQuery, SourceApiClient}, MediaKind};
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let client = SourceApiClient::new("https://sources.example.com");
//! let data = client
//!     .get_all_content_data(&ContentQuery::movie(550))
//!     .await?;
//! println!("{} stream sources", data.stream_sources.len());
//! # Ok(())
//! # }
//! ```

mod client;
pub mod types;

pub use client::SourceApiClient;
pub use types::*;
