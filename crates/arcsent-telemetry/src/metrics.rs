//! Prometheus metrics describing the dashboard's own refresh activity.
//!
//! # Panics
//!
//! Metric registration uses `unwrap()` intentionally. A registration failure
//! means duplicate metric names, a static programming error. These panics
//! only occur on first access, never on the hot path afterwards.

use once_cell::sync::Lazy;
use prometheus::{
    register_int_counter, register_int_counter_vec, register_int_gauge_vec, Encoder, IntCounter,
    IntCounterVec, IntGaugeVec, TextEncoder,
};

use crate::error::{TelemetryError, TelemetryResult};

/// Refresh outcomes.
/// Labels: resource (status/signatures/metrics/...), outcome (success/failure)
pub static REFRESH_TOTAL: Lazy<IntCounterVec> = Lazy::new(|| {
    register_int_counter_vec!(
        "arcsent_dashboard_refresh_total",
        "Dashboard resource refreshes by outcome",
        &["resource", "outcome"]
    )
    .unwrap()
});

/// Refreshes currently awaiting a response.
pub static REFRESH_IN_FLIGHT: Lazy<IntGaugeVec> = Lazy::new(|| {
    register_int_gauge_vec!(
        "arcsent_dashboard_refresh_in_flight",
        "Dashboard refreshes awaiting a response",
        &["resource"]
    )
    .unwrap()
});

/// Scan trigger outcomes.
pub static SCAN_TRIGGER_TOTAL: Lazy<IntCounterVec> = Lazy::new(|| {
    register_int_counter_vec!(
        "arcsent_dashboard_scan_trigger_total",
        "Scanner trigger requests by outcome",
        &["outcome"]
    )
    .unwrap()
});

/// Exposition lines dropped by the tolerant parser.
pub static EXPOSITION_DROPPED_LINES: Lazy<IntCounter> = Lazy::new(|| {
    register_int_counter!(
        "arcsent_dashboard_exposition_dropped_lines_total",
        "Metrics exposition lines dropped while parsing"
    )
    .unwrap()
});

fn outcome(success: bool) -> &'static str {
    if success {
        "success"
    } else {
        "failure"
    }
}

/// Metrics helper.
pub struct Metrics;

impl Metrics {
    /// Record a refresh starting.
    pub fn refresh_started(resource: &str) {
        REFRESH_IN_FLIGHT.with_label_values(&[resource]).inc();
    }

    /// Record a refresh finishing.
    pub fn refresh_finished(resource: &str, success: bool) {
        REFRESH_IN_FLIGHT.with_label_values(&[resource]).dec();
        REFRESH_TOTAL
            .with_label_values(&[resource, outcome(success)])
            .inc();
    }

    /// Record a scan trigger result.
    pub fn scan_triggered(success: bool) {
        SCAN_TRIGGER_TOTAL.with_label_values(&[outcome(success)]).inc();
    }

    /// Record exposition lines dropped during one parse.
    pub fn exposition_dropped(lines: usize) {
        EXPOSITION_DROPPED_LINES.inc_by(lines as u64);
    }

    /// Render every registered metric in the text exposition format.
    pub fn render() -> TelemetryResult<String> {
        let mut buf = Vec::new();
        TextEncoder::new()
            .encode(&prometheus::gather(), &mut buf)
            .map_err(|e| TelemetryError::Metrics(e.to_string()))?;
        String::from_utf8(buf).map_err(|e| TelemetryError::Metrics(e.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_refresh_counters() {
        let before = REFRESH_TOTAL
            .with_label_values(&["unit-test", "failure"])
            .get();

        Metrics::refresh_started("unit-test");
        assert_eq!(
            REFRESH_IN_FLIGHT.with_label_values(&["unit-test"]).get(),
            1
        );
        Metrics::refresh_finished("unit-test", false);

        assert_eq!(
            REFRESH_IN_FLIGHT.with_label_values(&["unit-test"]).get(),
            0
        );
        assert_eq!(
            REFRESH_TOTAL
                .with_label_values(&["unit-test", "failure"])
                .get(),
            before + 1
        );
    }

    #[test]
    fn test_render_contains_dashboard_metrics() {
        Metrics::exposition_dropped(2);
        let text = Metrics::render().unwrap();
        assert!(text.contains("arcsent_dashboard_exposition_dropped_lines_total"));
    }

    #[test]
    fn test_rendered_self_metrics_parse_back() {
        Metrics::exposition_dropped(0);
        let text = Metrics::render().unwrap();
        let parsed = crate::exposition::parse_exposition_with_prefix(
            &text,
            "arcsent_dashboard_exposition",
        );
        assert!(parsed
            .snapshot
            .get("arcsent_dashboard_exposition_dropped_lines_total")
            .is_some());
    }
}
