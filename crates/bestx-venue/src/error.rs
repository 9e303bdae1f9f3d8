//! Venue adapter error types.

use thiserror::Error;

/// Failure kinds surfaced by venue adapters.
///
/// Venue-specific rejection codes are folded into these kinds; nothing
/// here is retried automatically.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum VenueError {
    /// Transport failure, timeout, or transient venue unavailability.
    #[error("Network error: {0}")]
    Network(String),

    /// Invalid, expired, or under-privileged credentials, or a bad signature.
    #[error("Authentication failed: {0}")]
    Auth(String),

    /// Response did not have the expected shape.
    #[error("Response parse error: {0}")]
    Parse(String),

    #[error("Insufficient funds: {0}")]
    InsufficientFunds(String),

    /// Any other business-level rejection.
    #[error("Rejected by venue (code {code:?}): {message}")]
    Rejected { code: Option<i64>, message: String },

    /// Key material could not be loaded or used.
    #[error("Credential error: {0}")]
    Credentials(String),

    #[error("HTTP client error: {0}")]
    HttpClient(String),
}

impl VenueError {
    /// Only transport-level failures may be retried, and only by the caller.
    #[must_use]
    pub fn is_retryable(&self) -> bool {
        matches!(self, Self::Network(_))
    }

    /// Short label for structured logs.
    #[must_use]
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Network(_) => "network",
            Self::Auth(_) => "auth",
            Self::Parse(_) => "parse",
            Self::InsufficientFunds(_) => "insufficient_funds",
            Self::Rejected { .. } => "rejected",
            Self::Credentials(_) => "credentials",
            Self::HttpClient(_) => "http_client",
        }
    }
}

impl From<bestx_core::CoreError> for VenueError {
    fn from(e: bestx_core::CoreError) -> Self {
        Self::Parse(e.to_string())
    }
}

pub type VenueResult<T> = Result<T, VenueError>;
