//! Per-venue endpoint configuration.

use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Which venue environment to talk to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Network {
    /// Venue test networks (no real funds).
    #[default]
    Testnet,
    Mainnet,
}

pub const BINANCE_TESTNET_URL: &str = "https://testnet.binance.vision";
pub const BINANCE_MAINNET_URL: &str = "https://api.binance.com";
pub const BYBIT_TESTNET_URL: &str = "https://api-testnet.bybit.com";
pub const BYBIT_MAINNET_URL: &str = "https://api.bybit.com";

/// Binance adapter configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BinanceConfig {
    /// Override for the REST root. Defaults to the network's URL.
    #[serde(default)]
    pub base_url: Option<String>,
    /// Validity window for signed requests (ms). Default: 5000.
    #[serde(default = "default_recv_window_ms")]
    pub recv_window_ms: u64,
    /// Per-request timeout (ms). Default: 10,000.
    #[serde(default = "default_timeout_ms")]
    pub timeout_ms: u64,
}

impl BinanceConfig {
    pub fn base_url(&self, network: Network) -> &str {
        match (&self.base_url, network) {
            (Some(url), _) => url,
            (None, Network::Testnet) => BINANCE_TESTNET_URL,
            (None, Network::Mainnet) => BINANCE_MAINNET_URL,
        }
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }
}

impl Default for BinanceConfig {
    fn default() -> Self {
        Self {
            base_url: None,
            recv_window_ms: default_recv_window_ms(),
            timeout_ms: default_timeout_ms(),
        }
    }
}

/// Bybit adapter configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BybitConfig {
    /// Override for the REST root. Defaults to the network's URL.
    #[serde(default)]
    pub base_url: Option<String>,
    /// Validity window for signed requests (ms). Default: 5000.
    #[serde(default = "default_recv_window_ms")]
    pub recv_window_ms: u64,
    /// Per-request timeout (ms). Default: 10,000.
    #[serde(default = "default_timeout_ms")]
    pub timeout_ms: u64,
    /// Product category for ticker and order calls. Default: "spot".
    #[serde(default = "default_bybit_category")]
    pub category: String,
}

impl BybitConfig {
    pub fn base_url(&self, network: Network) -> &str {
        match (&self.base_url, network) {
            (Some(url), _) => url,
            (None, Network::Testnet) => BYBIT_TESTNET_URL,
            (None, Network::Mainnet) => BYBIT_MAINNET_URL,
        }
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }
}

impl Default for BybitConfig {
    fn default() -> Self {
        Self {
            base_url: None,
            recv_window_ms: default_recv_window_ms(),
            timeout_ms: default_timeout_ms(),
            category: default_bybit_category(),
        }
    }
}

fn default_recv_window_ms() -> u64 {
    5000
}

fn default_timeout_ms() -> u64 {
    10_000
}

fn default_bybit_category() -> String {
    "spot".to_string()
}
