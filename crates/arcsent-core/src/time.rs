//! Timestamp rendering for dashboard cards.

use chrono::{DateTime, Utc};

/// Rendered in place of a missing timestamp or metric value.
pub const PLACEHOLDER: &str = "—";

/// Zero value of the daemon's time type when it was never set.
const DAEMON_ZERO_TIME: &str = "0001-01-01T00:00:00Z";

/// Parse an RFC 3339 timestamp, treating zero instants as absent.
pub fn parse_timestamp(value: &str) -> Option<DateTime<Utc>> {
    let parsed = DateTime::parse_from_rfc3339(value.trim()).ok()?;
    let utc = parsed.with_timezone(&Utc);

    let daemon_zero = DateTime::parse_from_rfc3339(DAEMON_ZERO_TIME).ok()?;
    if (utc.timestamp() == 0 && utc.timestamp_subsec_nanos() == 0) || utc == daemon_zero {
        return None;
    }
    Some(utc)
}

/// Format a wire timestamp for display.
///
/// Absent, empty, unparsable and zero-instant values all render as
/// [`PLACEHOLDER`].
pub fn format_timestamp(value: Option<&str>) -> String {
    value
        .and_then(parse_timestamp)
        .map(|ts| ts.format("%Y-%m-%d %H:%M:%S UTC").to_string())
        .unwrap_or_else(|| PLACEHOLDER.to_string())
}
