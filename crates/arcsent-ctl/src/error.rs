//! Application error types.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum AppError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("API error: {0}")]
    Api(#[from] arcsent_client::ApiError),

    #[error("Telemetry error: {0}")]
    Telemetry(#[from] arcsent_telemetry::TelemetryError),

    /// A resource refresh settled without usable data.
    #[error("Failed to refresh {resource}: {message}")]
    Refresh {
        resource: &'static str,
        message: String,
    },

    #[error("{failed} of {total} scan triggers failed")]
    TriggerFailed { failed: usize, total: usize },

    #[error("Encode error: {0}")]
    Encode(#[from] serde_json::Error),

    /// Installing the shutdown signal handler failed.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

pub type AppResult<T> = Result<T, AppError>;
