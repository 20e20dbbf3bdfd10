//! Metrics exposition parsing, process metrics and structured logging.
//!
//! - Tolerant parser for the daemon's plain-text metrics exposition
//! - Prometheus counters describing the dashboard's own refresh activity
//! - Structured logging with tracing (JSON in production)

pub mod error;
pub mod exposition;
pub mod logging;
pub mod metrics;

pub use error::{TelemetryError, TelemetryResult};
pub use exposition::{parse_exposition, parse_exposition_with_prefix, ParsedExposition};
pub use logging::init_logging;
pub use metrics::Metrics;
