//! Trading entities exchanged between the coordinator and venue adapters.
//!
//! All of them are built once per call and discarded; nothing here is
//! cached or persisted.

use crate::error::{CoreError, Result};
use crate::{ClientOrderId, OrderSide, OrderStatus, Price, Size};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Exchange identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum VenueId {
    Binance,
    Bybit,
}

impl VenueId {
    /// All supported venues, in coordinator order.
    pub const ALL: [VenueId; 2] = [VenueId::Binance, VenueId::Bybit];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Binance => "binance",
            Self::Bybit => "bybit",
        }
    }
}

impl fmt::Display for VenueId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for VenueId {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "binance" => Ok(Self::Binance),
            "bybit" => Ok(Self::Bybit),
            other => Err(CoreError::UnknownVenue(other.to_string())),
        }
    }
}

/// Trading pair identifier in venue wire form (e.g. `BTCUSDT`).
///
/// Separators are stripped and letters uppercased on construction, so
/// `btc/usdt`, `BTC-USDT` and `BTCUSDT` are the same symbol.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Symbol(String);

impl Symbol {
    pub fn new(raw: &str) -> Result<Self> {
        let normalized: String = raw
            .trim()
            .chars()
            .filter(|c| !matches!(c, '/' | '-' | '_' | ':'))
            .map(|c| c.to_ascii_uppercase())
            .collect();

        if normalized.is_empty() {
            return Err(CoreError::InvalidSymbol("empty symbol".to_string()));
        }
        if !normalized.chars().all(|c| c.is_ascii_alphanumeric()) {
            return Err(CoreError::InvalidSymbol(raw.to_string()));
        }
        Ok(Self(normalized))
    }

    /// Build from base and quote assets (`"BTC"`, `"USDT"` -> `BTCUSDT`).
    pub fn from_pair(base: &str, quote: &str) -> Result<Self> {
        if base.trim().is_empty() || quote.trim().is_empty() {
            return Err(CoreError::InvalidSymbol(format!("{base}/{quote}")));
        }
        Self::new(&format!("{base}{quote}"))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Default for Symbol {
    fn default() -> Self {
        Self("BTCUSDT".to_string())
    }
}

impl fmt::Display for Symbol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl FromStr for Symbol {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self> {
        Self::new(s)
    }
}

impl TryFrom<String> for Symbol {
    type Error = CoreError;

    fn try_from(value: String) -> Result<Self> {
        Self::new(&value)
    }
}

impl From<Symbol> for String {
    fn from(symbol: Symbol) -> Self {
        symbol.0
    }
}

/// A market order to route.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OrderRequest {
    symbol: Symbol,
    side: OrderSide,
    quantity: Size,
}

impl OrderRequest {
    /// Create an order request. Quantity must be positive.
    pub fn new(symbol: Symbol, side: OrderSide, quantity: Size) -> Result<Self> {
        if !quantity.is_positive() {
            return Err(CoreError::InvalidSize(format!(
                "quantity must be positive, got {quantity}"
            )));
        }
        Ok(Self {
            symbol,
            side,
            quantity,
        })
    }

    pub fn symbol(&self) -> &Symbol {
        &self.symbol
    }

    pub fn side(&self) -> OrderSide {
        self.side
    }

    pub fn quantity(&self) -> Size {
        self.quantity
    }
}

/// Latest traded price on one venue, fetched fresh per decision.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PriceQuote {
    pub venue: VenueId,
    pub symbol: Symbol,
    pub price: Price,
    pub received_at: DateTime<Utc>,
}

impl PriceQuote {
    /// Create a quote stamped with the current time. Price must be positive.
    pub fn new(venue: VenueId, symbol: Symbol, price: Price) -> Result<Self> {
        if !price.is_positive() {
            return Err(CoreError::InvalidPrice(format!(
                "{venue} quoted non-positive price {price} for {symbol}"
            )));
        }
        Ok(Self {
            venue,
            symbol,
            price,
            received_at: Utc::now(),
        })
    }
}

/// Venue response to a submitted order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderResult {
    pub venue: VenueId,
    /// Order identifier assigned by the venue.
    pub order_id: String,
    pub client_order_id: ClientOrderId,
    pub status: OrderStatus,
    /// Average execution price, if the venue reported fills.
    pub executed_price: Option<Price>,
    /// Executed quantity, if the venue reported fills.
    pub executed_quantity: Option<Size>,
}
