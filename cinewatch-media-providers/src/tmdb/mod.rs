//! TMDB metadata client
//!
//! Pure HTTP client for the three TMDB endpoints the watch page needs:
//! details, videos and similar titles.

mod client;
pub mod types;

pub use client::TmdbClient;
pub use types::*;
