use thiserror::Error;

use crate::models::InvalidArgument;
use crate::provider::ProviderError;
use crate::repository::PersistenceError;
use crate::service::AggregateError;

#[derive(Error, Debug)]
pub enum Error {
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Provider error: {0}")]
    Provider(#[from] ProviderError),

    #[error("Persistence error: {0}")]
    Persistence(#[from] PersistenceError),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl From<InvalidArgument> for Error {
    fn from(err: InvalidArgument) -> Self {
        Self::InvalidInput(err.to_string())
    }
}

impl From<AggregateError> for Error {
    fn from(err: AggregateError) -> Self {
        match err {
            AggregateError::InvalidArgument(e) => e.into(),
            other @ AggregateError::NoSourcesAvailable { .. } => Self::NotFound(other.to_string()),
        }
    }
}

impl Error {
    /// Message shown to the viewer; internal details stay in the logs
    #[must_use]
    pub fn user_message(&self) -> &'static str {
        match self {
            Self::InvalidInput(_) => "Invalid content identifier",
            Self::NotFound(_) => "Content not found",
            Self::Provider(_) => "Failed to load content. Please try again.",
            Self::Persistence(_) | Self::Serialization(_) => "Could not save your changes",
            Self::Internal(_) => "Something went wrong. Please try again.",
        }
    }
}

pub type Result<T> = std::result::Result<T, Error>;
