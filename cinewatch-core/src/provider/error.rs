// Provider Error Types

use cinewatch_media_providers::ProviderClientError;

/// Provider-specific errors
///
/// Absorbed by the aggregator into "zero sources from that provider".
#[derive(Debug, thiserror::Error)]
pub enum ProviderError {
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("Unknown provider type: {0}")]
    UnknownProvider(String),

    #[error("Unsupported request: {0}")]
    Unsupported(String),

    #[error("Provider panicked: {0}")]
    Panicked(String),

    #[error(transparent)]
    Client(#[from] ProviderClientError),
}

pub type Result<T> = std::result::Result<T, ProviderError>;
