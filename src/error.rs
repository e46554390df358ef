//! Verdandi error types

use std::time::Duration;

/// Verdandi error types
#[derive(Debug, thiserror::Error)]
pub enum VerdandiError {
    // Provider/network errors
    #[error("HTTP error: {0}")]
    Http(String),

    #[error("API error ({status}): {message}")]
    Api { status: u16, message: String },

    #[error("authentication failed")]
    AuthenticationFailed,

    #[error("model not found: {0}")]
    ModelNotFound(String),

    /// The local token bucket refused the request.
    ///
    /// `wait` is an advisory estimate of the time until a token becomes
    /// available (`Duration::MAX` when the bucket never refills). The caller
    /// decides whether to wait, retry later, or fall back to procedural
    /// generation — nothing blocks inside the limiter.
    #[error("rate limit exceeded, retry in {wait:?}")]
    RateLimitExceeded { wait: Duration },

    // Data errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    // Configuration errors
    #[error("configuration error: {0}")]
    Configuration(String),

    // Soft errors
    #[error("empty response from model")]
    EmptyResponse,

    // Persistence errors
    #[cfg(feature = "storage")]
    #[error("storage error: {0}")]
    Storage(#[from] rusqlite::Error),
}

impl VerdandiError {
    /// Whether this error came from the local admission control rather than
    /// a provider. Useful for callers distinguishing "slow down" from
    /// "the provider broke".
    pub fn is_rate_limit(&self) -> bool {
        matches!(self, VerdandiError::RateLimitExceeded { .. })
    }
}

/// Result type alias for Verdandi operations
pub type Result<T> = std::result::Result<T, VerdandiError>;
