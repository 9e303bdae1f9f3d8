//! Structured logging initialization.

use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::error::{TelemetryError, TelemetryResult};

/// Filter used when `RUST_LOG` is unset.
pub const DEFAULT_FILTER: &str = "info,bestx=debug";

/// Output format for log lines.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogFormat {
    /// One JSON object per line.
    Json,
    /// Multi-line human-readable output.
    Pretty,
}

impl LogFormat {
    /// JSON when `RUST_ENV=production`, pretty otherwise.
    pub fn from_rust_env(rust_env: Option<&str>) -> Self {
        match rust_env {
            Some("production") => Self::Json,
            _ => Self::Pretty,
        }
    }
}

/// Build the filter from `RUST_LOG`, or [`DEFAULT_FILTER`] if unset.
///
/// A set but malformed `RUST_LOG` is an error rather than a silent fallback.
pub fn env_filter(rust_log: Option<&str>) -> TelemetryResult<EnvFilter> {
    let directives = rust_log
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .unwrap_or(DEFAULT_FILTER);
    EnvFilter::try_new(directives).map_err(|e| TelemetryError::InvalidFilter {
        filter: directives.to_string(),
        reason: e.to_string(),
    })
}

/// Initialize structured logging.
///
/// Reads `RUST_LOG` for the filter and `RUST_ENV` for the format. Fails if
/// a global subscriber is already installed.
pub fn init_logging() -> TelemetryResult<()> {
    let rust_log = std::env::var("RUST_LOG").ok();
    let rust_env = std::env::var("RUST_ENV").ok();
    let filter = env_filter(rust_log.as_deref())?;

    let result = match LogFormat::from_rust_env(rust_env.as_deref()) {
        LogFormat::Json => tracing_subscriber::registry()
            .with(filter)
            .with(
                fmt::layer()
                    .json()
                    .with_current_span(true)
                    .with_span_list(true),
            )
            .try_init(),
        LogFormat::Pretty => tracing_subscriber::registry()
            .with(filter)
            .with(fmt::layer().pretty().with_target(true))
            .try_init(),
    };

    result.map_err(|e| TelemetryError::LoggingInit(e.to_string()))
}
