//! Error types for stereobm-match

use thiserror::Error;

/// Errors that can occur during stereo matching
#[derive(Debug, Error)]
pub enum MatchError {
    /// Core library error
    #[error("core error: {0}")]
    Core(#[from] stereobm_core::Error),

    /// Invalid parameters
    #[error("invalid parameters: {0}")]
    InvalidParameters(String),
}

/// Result type for matching operations
pub type MatchResult<T> = Result<T, MatchError>;
