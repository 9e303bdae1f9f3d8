//! Structured logging for bestx.
//!
//! - `init_logging`: `tracing-subscriber` registry with `EnvFilter`,
//!   JSON output in production and pretty output otherwise

pub mod error;
pub mod logging;

pub use error::{TelemetryError, TelemetryResult};
pub use logging::{init_logging, LogFormat, DEFAULT_FILTER};
