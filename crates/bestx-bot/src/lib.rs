//! bestx: best-venue market order router.
//!
//! Main application that wires the components together:
//! - TOML configuration and environment credentials
//! - Binance and Bybit adapters
//! - Trading coordinator (observation or trading mode)

pub mod app;
pub mod config;
pub mod error;

pub use app::{Application, RunOutcome};
pub use config::{AppConfig, OperatingMode, OrderConfig};
pub use error::{AppError, AppResult};
