//! Router error types.

use bestx_core::{CoreError, VenueId};
use bestx_venue::VenueError;
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum RouterError {
    /// A quote could not be obtained, so no order was placed anywhere.
    #[error("Price fetch failed on {venue}: {source}")]
    PriceFetch { venue: VenueId, source: VenueError },

    /// The selected venue failed the order. `source` is the adapter's
    /// error unchanged.
    #[error("Order placement failed on {venue}: {source}")]
    OrderPlacement { venue: VenueId, source: VenueError },

    #[error("Both adapters report venue {0}")]
    DuplicateVenue(VenueId),

    #[error("Invalid order request: {0}")]
    InvalidRequest(#[from] CoreError),
}

impl RouterError {
    /// Venue the failure is attributed to.
    pub fn venue(&self) -> Option<VenueId> {
        match self {
            Self::PriceFetch { venue, .. }
            | Self::OrderPlacement { venue, .. }
            | Self::DuplicateVenue(venue) => Some(*venue),
            Self::InvalidRequest(_) => None,
        }
    }

    /// Underlying adapter error, if any.
    pub fn venue_error(&self) -> Option<&VenueError> {
        match self {
            Self::PriceFetch { source, .. } | Self::OrderPlacement { source, .. } => Some(source),
            Self::DuplicateVenue(_) | Self::InvalidRequest(_) => None,
        }
    }
}

pub type RouterResult<T> = Result<T, RouterError>;
