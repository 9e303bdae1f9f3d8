//! Application configuration.
//!
//! Loaded from a TOML file. Every field has a default, so an empty file
//! is a valid observation-mode testnet configuration.

use bestx_core::{OrderRequest, OrderSide, Size, Symbol, VenueId};
use bestx_router::RouterConfig;
use bestx_venue::{BinanceConfig, BybitConfig, Network};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::error::{AppError, AppResult};

/// Environment variable naming the config file.
pub const CONFIG_ENV_VAR: &str = "BESTX_CONFIG";
/// Config file used when neither `--config` nor `BESTX_CONFIG` is given.
pub const DEFAULT_CONFIG_PATH: &str = "config/default.toml";

/// Config file to load: `--config`, then `BESTX_CONFIG`, then the default.
pub fn config_path(cli: Option<String>, env: Option<String>) -> String {
    cli.or(env).unwrap_or_else(|| DEFAULT_CONFIG_PATH.to_string())
}

/// Largest `recvWindow` either venue accepts (ms).
const MAX_RECV_WINDOW_MS: u64 = 60_000;

/// Operating mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OperatingMode {
    /// Quote both venues and log the best buy and sell venue. No orders.
    #[default]
    Observation,
    /// Route and place the configured order.
    Trading,
}

/// The order to route in trading mode.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OrderConfig {
    /// Default: BTCUSDT.
    #[serde(default)]
    pub symbol: Symbol,
    /// Default: buy.
    #[serde(default = "default_side")]
    pub side: OrderSide,
    /// Base-asset quantity. Default: 0.001.
    #[serde(default = "default_quantity")]
    pub quantity: Size,
    /// Send to this venue without comparing prices.
    #[serde(default)]
    pub venue: Option<VenueId>,
}

fn default_side() -> OrderSide {
    OrderSide::Buy
}

fn default_quantity() -> Size {
    Size::new(Decimal::new(1, 3))
}

impl Default for OrderConfig {
    fn default() -> Self {
        Self {
            symbol: Symbol::default(),
            side: default_side(),
            quantity: default_quantity(),
            venue: None,
        }
    }
}

/// Application configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    #[serde(default)]
    pub mode: OperatingMode,
    #[serde(default)]
    pub network: Network,
    #[serde(default)]
    pub router: RouterConfig,
    #[serde(default)]
    pub binance: BinanceConfig,
    #[serde(default)]
    pub bybit: BybitConfig,
    #[serde(default)]
    pub order: OrderConfig,
}

impl AppConfig {
    /// Load from a specific file.
    pub fn from_file(path: &str) -> AppResult<Self> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| AppError::Config(format!("Failed to read config {path}: {e}")))?;
        content.parse()
    }

    /// Reject values no venue would accept.
    pub fn validate(&self) -> AppResult<()> {
        if !self.order.quantity.is_positive() {
            return Err(AppError::Config(format!(
                "order.quantity must be positive, got {}",
                self.order.quantity
            )));
        }

        let windows = [
            ("binance", self.binance.recv_window_ms, self.binance.timeout_ms),
            ("bybit", self.bybit.recv_window_ms, self.bybit.timeout_ms),
        ];
        for (venue, recv_window_ms, timeout_ms) in windows {
            if recv_window_ms == 0 || recv_window_ms > MAX_RECV_WINDOW_MS {
                return Err(AppError::Config(format!(
                    "{venue}.recv_window_ms must be in 1..={MAX_RECV_WINDOW_MS}, got {recv_window_ms}"
                )));
            }
            if timeout_ms == 0 {
                return Err(AppError::Config(format!(
                    "{venue}.timeout_ms must be positive"
                )));
            }
        }

        if self.bybit.category.trim().is_empty() {
            return Err(AppError::Config("bybit.category must not be empty".to_string()));
        }

        Ok(())
    }

    /// The configured order as a validated request.
    pub fn order_request(&self) -> AppResult<OrderRequest> {
        Ok(OrderRequest::new(
            self.order.symbol.clone(),
            self.order.side,
            self.order.quantity,
        )?)
    }
}

impl std::str::FromStr for AppConfig {
    type Err = AppError;

    fn from_str(s: &str) -> AppResult<Self> {
        let config: Self = toml::from_str(s)
            .map_err(|e| AppError::Config(format!("Failed to parse config: {e}")))?;
        config.validate()?;
        Ok(config)
    }
}
