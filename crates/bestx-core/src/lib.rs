//! Core domain types for the bestx venue router.
//!
//! This crate provides the types shared by the venue adapters and the
//! trading coordinator:
//! - `Price`, `Size`: Precision-safe numeric types
//! - `Symbol`, `VenueId`: Identifiers for the traded pair and the exchange
//! - `OrderRequest`, `PriceQuote`, `OrderResult`: Per-call trading entities

pub mod decimal;
pub mod error;
pub mod order;
pub mod types;

pub use decimal::{Price, Size};
pub use error::{CoreError, Result};
pub use order::{ClientOrderId, OrderSide, OrderStatus};
pub use types::{OrderRequest, OrderResult, PriceQuote, Symbol, VenueId};
