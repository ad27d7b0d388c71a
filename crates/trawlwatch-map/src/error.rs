//! Error types for the map core.

use thiserror::Error;
use trawlwatch_domain::DomainError;

/// Failures reported by a [`crate::TrawlwatchApi`] implementation.
///
/// These never reach the UI: the orchestration layer logs them and
/// substitutes an empty result.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("Transport error: {0}")]
    Transport(String),

    #[error("Backend returned status {status} for {path}")]
    Status { status: u16, path: String },

    #[error("Failed to decode response: {0}")]
    Decode(String),
}

/// Map core errors
#[derive(Debug, Error)]
pub enum MapError {
    #[error(transparent)]
    Domain(#[from] DomainError),

    #[error("Vessel {0} is not tracked")]
    NotTracked(i64),
}

pub type ApiResult<T> = std::result::Result<T, ApiError>;

pub type Result<T> = std::result::Result<T, MapError>;
