// Source Provider System
//
// Three-tier architecture:
//
// Tier 1: cinewatch-media-providers (pure clients)
//   - Embed URL builders (VidSrc, VidLink, Vidjoy, Rivestream)
//   - SourceApiClient, TmdbClient
//   - No SourceProvider dependency
//
// Tier 2: cinewatch-core/provider (SourceProvider adapters)
//   - PrimaryProvider, EmbedProvider, FallbackProvider
//   - Normalize tier-1 output into StreamSource records
//
// Tier 3: cinewatch-core/service
//   - SourceAggregator fans out to the adapters and merges their results

// Core traits and types
pub mod error;
pub mod normalizer;
pub mod registry;
pub mod traits;

// SourceProvider implementations (adapters)
pub mod embed;
pub mod fallback;
pub mod primary;

pub use error::*;
pub use registry::*;
pub use traits::*;

// Re-export providers
pub use embed::EmbedProvider;
pub use fallback::{FallbackProvider, RIVESTREAM_SERVER_2_ID, VIDJOY_PLAYER_ID};
pub use primary::PrimaryProvider;
