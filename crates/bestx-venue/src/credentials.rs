//! Venue credentials, loaded once at process start.
//!
//! Security notes:
//! - Secrets are held in `Zeroizing` buffers and wiped on drop.
//! - `Debug` output redacts everything except the API key prefix.
//! - Adapters receive credentials through their constructors and never
//!   read the environment themselves.

use std::fmt;
use std::path::PathBuf;

use zeroize::Zeroizing;

use crate::error::{VenueError, VenueResult};

pub const BINANCE_API_KEY_VAR: &str = "BINANCE_API_KEY";
pub const BINANCE_PRIVATE_KEY_PATH_VAR: &str = "BINANCE_PRIVATE_KEY_PATH";
pub const BINANCE_PRIVATE_KEY_VAR: &str = "BINANCE_PRIVATE_KEY";
pub const BINANCE_KEY_PASSWORD_VAR: &str = "BINANCE_KEY_PASSWORD";
pub const BYBIT_API_KEY_VAR: &str = "BYBIT_API_KEY";
pub const BYBIT_API_SECRET_VAR: &str = "BYBIT_API_SECRET";

/// Source of a PEM-encoded private key.
#[derive(Clone)]
pub enum KeySource {
    /// PEM text supplied inline.
    Pem(Zeroizing<String>),
    /// PEM file on disk (recommend 0600 permissions).
    File { path: PathBuf },
}

impl KeySource {
    /// Read the PEM text.
    pub fn read(&self) -> VenueResult<Zeroizing<String>> {
        match self {
            Self::Pem(pem) => Ok(pem.clone()),
            Self::File { path } => std::fs::read_to_string(path)
                .map(Zeroizing::new)
                .map_err(|e| {
                    VenueError::Credentials(format!(
                        "failed to read private key {}: {e}",
                        path.display()
                    ))
                }),
        }
    }
}

impl fmt::Debug for KeySource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Pem(_) => f.write_str("KeySource::Pem(<redacted>)"),
            Self::File { path } => f.debug_struct("KeySource::File").field("path", path).finish(),
        }
    }
}

/// Binance credentials: API key + RSA private key.
#[derive(Clone)]
pub struct BinanceCredentials {
    pub api_key: String,
    pub private_key: KeySource,
    /// Password for an encrypted PKCS#8 key.
    pub key_password: Option<Zeroizing<String>>,
}

impl fmt::Debug for BinanceCredentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BinanceCredentials")
            .field("api_key", &redact(&self.api_key))
            .field("private_key", &self.private_key)
            .field("key_password", &self.key_password.as_ref().map(|_| "<redacted>"))
            .finish()
    }
}

/// Bybit credentials: API key + HMAC secret.
#[derive(Clone)]
pub struct BybitCredentials {
    pub api_key: String,
    pub api_secret: Zeroizing<String>,
}

impl fmt::Debug for BybitCredentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BybitCredentials")
            .field("api_key", &redact(&self.api_key))
            .field("api_secret", &"<redacted>")
            .finish()
    }
}

/// Credentials for both venues.
#[derive(Debug, Clone)]
pub struct Credentials {
    pub binance: BinanceCredentials,
    pub bybit: BybitCredentials,
}

impl Credentials {
    /// Load from process environment variables.
    pub fn from_env() -> VenueResult<Self> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Load through an arbitrary variable lookup. Empty values count as missing.
    pub fn from_lookup<F>(lookup: F) -> VenueResult<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |name: &str| lookup(name).filter(|v| !v.trim().is_empty());
        let require = |name: &str| {
            get(name).ok_or_else(|| {
                VenueError::Credentials(format!("environment variable {name} must be set"))
            })
        };

        let private_key = match (
            get(BINANCE_PRIVATE_KEY_PATH_VAR),
            get(BINANCE_PRIVATE_KEY_VAR),
        ) {
            (Some(path), _) => KeySource::File {
                path: PathBuf::from(path.trim()),
            },
            (None, Some(pem)) => KeySource::Pem(Zeroizing::new(pem)),
            (None, None) => {
                return Err(VenueError::Credentials(format!(
                    "either {BINANCE_PRIVATE_KEY_PATH_VAR} or {BINANCE_PRIVATE_KEY_VAR} must be set"
                )))
            }
        };

        let binance = BinanceCredentials {
            api_key: require(BINANCE_API_KEY_VAR)?.trim().to_string(),
            private_key,
            key_password: get(BINANCE_KEY_PASSWORD_VAR).map(Zeroizing::new),
        };

        let bybit = BybitCredentials {
            api_key: require(BYBIT_API_KEY_VAR)?.trim().to_string(),
            api_secret: Zeroizing::new(require(BYBIT_API_SECRET_VAR)?.trim().to_string()),
        };

        Ok(Self { binance, bybit })
    }
}

fn redact(value: &str) -> String {
    let prefix: String = value.chars().take(4).collect();
    format!("{prefix}***")
}
