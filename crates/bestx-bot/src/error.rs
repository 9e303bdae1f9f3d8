//! Application error types.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum AppError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Venue error: {0}")]
    Venue(#[from] bestx_venue::VenueError),

    #[error("Router error: {0}")]
    Router(#[from] bestx_router::RouterError),

    #[error("Invalid order: {0}")]
    Order(#[from] bestx_core::CoreError),

    #[error("Telemetry error: {0}")]
    Telemetry(#[from] bestx_telemetry::TelemetryError),
}

pub type AppResult<T> = Result<T, AppError>;
