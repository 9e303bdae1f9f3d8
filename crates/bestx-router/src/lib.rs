//! Best-price order routing across two venues.
//!
//! - `select_venue`: pure selection rule (buy lowest, sell highest,
//!   ties to the preferred venue)
//! - `TradingCoordinator`: fetches both quotes and places one order on
//!   the winner

pub mod coordinator;
pub mod error;
pub mod selection;

pub use coordinator::{RouterConfig, TradingCoordinator};
pub use error::{RouterError, RouterResult};
pub use selection::{select_venue, RouteDecision};
