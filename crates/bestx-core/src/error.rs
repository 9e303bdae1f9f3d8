//! Error types for bestx-core.

use thiserror::Error;

/// Core error types.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum CoreError {
    #[error("Invalid price: {0}")]
    InvalidPrice(String),

    #[error("Invalid size: {0}")]
    InvalidSize(String),

    #[error("Invalid symbol: {0}")]
    InvalidSymbol(String),

    #[error("Unknown venue: {0}")]
    UnknownVenue(String),

    #[error("Unknown order side: {0}")]
    UnknownSide(String),
}

/// Result type alias for core operations.
pub type Result<T> = std::result::Result<T, CoreError>;
