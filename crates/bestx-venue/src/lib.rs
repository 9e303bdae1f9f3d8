//! Exchange adapters for the bestx venue router.
//!
//! Each adapter translates the venue-neutral [`ExchangeAdapter`] calls into
//! one venue's REST dialect:
//! - `BinanceAdapter`: RSA-SHA256 signed query strings
//! - `BybitAdapter`: HMAC-SHA256 signed v5 requests
//!
//! Adapters are stateless apart from their HTTP client and signer, so a
//! single instance can serve concurrent calls.

pub mod adapter;
pub mod binance;
pub mod bybit;
pub mod clock;
pub mod config;
pub mod credentials;
pub mod error;
pub mod signer;
pub mod transport;

pub use adapter::{BoxFuture, DynExchange, ExchangeAdapter, MockExchange};
pub use binance::BinanceAdapter;
pub use bybit::BybitAdapter;
pub use clock::{Clock, FixedClock, SystemClock};
pub use config::{BinanceConfig, BybitConfig, Network};
pub use credentials::{BinanceCredentials, BybitCredentials, Credentials, KeySource};
pub use error::{VenueError, VenueResult};
pub use signer::{HmacSha256Signer, RequestSigner, RsaSha256Signer};
pub use transport::{RawResponse, RestTransport};
