//! Best-price venue selection.
//!
//! Pure comparison of two fresh quotes. A buy goes to the lower price, a
//! sell to the higher one; equal prices go to the preferred venue.

use std::cmp::Ordering;

use bestx_core::{OrderSide, Price, PriceQuote, VenueId};
use rust_decimal::Decimal;

/// Outcome of comparing both venues for one side.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RouteDecision {
    pub side: OrderSide,
    /// Quote of the venue that wins.
    pub chosen: PriceQuote,
    /// Quote of the venue that loses.
    pub other: PriceQuote,
}

impl RouteDecision {
    pub fn venue(&self) -> VenueId {
        self.chosen.venue
    }

    pub fn price(&self) -> Price {
        self.chosen.price
    }

    /// How much better the chosen price is than the other, in basis points
    /// of the other venue's price. Zero on a tie, never negative.
    pub fn improvement_bps(&self) -> Option<Decimal> {
        let bps = self.chosen.price.bps_from(self.other.price)?;
        Some(match self.side {
            OrderSide::Buy => -bps,
            OrderSide::Sell => bps,
        })
    }

    /// True when both venues quoted the same price.
    pub fn is_tie(&self) -> bool {
        self.chosen.price == self.other.price
    }
}

/// Pick the venue to trade `side` on.
pub fn select_venue(
    side: OrderSide,
    first: PriceQuote,
    second: PriceQuote,
    preferred: VenueId,
) -> RouteDecision {
    let first_wins = match (side, first.price.cmp(&second.price)) {
        (_, Ordering::Equal) => second.venue != preferred,
        (OrderSide::Buy, ord) => ord == Ordering::Less,
        (OrderSide::Sell, ord) => ord == Ordering::Greater,
    };

    let (chosen, other) = if first_wins {
        (first, second)
    } else {
        (second, first)
    };
    RouteDecision {
        side,
        chosen,
        other,
    }
}
