//! Tolerant parser for the daemon's plain-text metrics exposition.
//!
//! Format: one `name value [timestamp]` sample per line, `#` comments, blank
//! lines ignored. Parsing never fails: a line that is not a finite sample in
//! the `arcsent_` namespace is dropped and counted.

use arcsent_core::{MetricsSnapshot, METRIC_PREFIX};
use tracing::trace;

/// Parse outcome: the surviving samples plus how many lines were dropped.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ParsedExposition {
    pub snapshot: MetricsSnapshot,
    /// Non-blank, non-comment lines that produced no sample.
    pub dropped: usize,
}

/// Parse exposition text, keeping only `arcsent_` metrics.
pub fn parse_exposition(raw: &str) -> ParsedExposition {
    parse_exposition_with_prefix(raw, METRIC_PREFIX)
}

/// Parse exposition text, keeping only metrics whose name starts with `prefix`.
///
/// Duplicate names: the last occurrence wins.
pub fn parse_exposition_with_prefix(raw: &str, prefix: &str) -> ParsedExposition {
    let mut parsed = ParsedExposition::default();

    for line in raw.lines() {
        let trimmed = line.trim();
        if trimmed.is_empty() || trimmed.starts_with('#') {
            continue;
        }
        match parse_sample(trimmed, prefix) {
            Some((name, value)) => parsed.snapshot.insert(name, value),
            None => {
                trace!(line = trimmed, "Dropping exposition line");
                parsed.dropped += 1;
            }
        }
    }

    parsed
}

fn parse_sample<'a>(line: &'a str, prefix: &str) -> Option<(&'a str, f64)> {
    let mut tokens = line.split_whitespace();
    let name = tokens.next()?;
    let value = tokens.next()?.parse::<f64>().ok()?;

    if !value.is_finite() || !name.starts_with(prefix) {
        return None;
    }
    Some((name, value))
}

#[cfg(test)]
mod tests {
    use super::*;
    use prometheus::{Encoder, IntGauge, Opts, Registry, TextEncoder};

    #[test]
    fn test_malformed_and_comment_lines_dropped() {
        let parsed =
            parse_exposition("arcsent_plugins_total 4\narcsent_jobs_total notanumber\n# comment\n\n");

        assert_eq!(parsed.snapshot.len(), 1);
        assert_eq!(parsed.snapshot.get("arcsent_plugins_total"), Some(4.0));
        assert_eq!(parsed.dropped, 1);
    }

    #[test]
    fn test_parsing_is_idempotent() {
        let raw = "arcsent_up 1\narcsent_results_total 12\narcsent_up 0\n";
        assert_eq!(parse_exposition(raw), parse_exposition(raw));
    }

    #[test]
    fn test_foreign_names_excluded() {
        let raw = "process_cpu_seconds_total 3.5\ngo_goroutines 12\narcsent_up 1\nArcsent_up 1\n";
        let parsed = parse_exposition(raw);

        assert!(!parsed.snapshot.contains("process_cpu_seconds_total"));
        assert!(!parsed.snapshot.contains("go_goroutines"));
        assert!(!parsed.snapshot.contains("Arcsent_up"));
        for (name, _) in parsed.snapshot.iter() {
            assert!(name.starts_with(METRIC_PREFIX));
        }
        assert_eq!(parsed.dropped, 3);
    }

    #[test]
    fn test_last_duplicate_wins() {
        let parsed = parse_exposition("arcsent_jobs_total 1\narcsent_jobs_total 7\n");
        assert_eq!(parsed.snapshot.jobs_total(), Some(7.0));
    }

    #[test]
    fn test_non_finite_values_dropped() {
        let parsed = parse_exposition("arcsent_a NaN\narcsent_b +Inf\narcsent_c -inf\narcsent_d 2.5e3\n");
        assert_eq!(parsed.snapshot.len(), 1);
        assert_eq!(parsed.snapshot.get("arcsent_d"), Some(2500.0));
        assert_eq!(parsed.dropped, 3);
    }

    #[test]
    fn test_whitespace_variants() {
        let raw = "   arcsent_up\t\t1   1700000000000\n\t# indented comment\narcsent_lonely\n";
        let parsed = parse_exposition(raw);
        assert_eq!(parsed.snapshot.get("arcsent_up"), Some(1.0));
        assert_eq!(parsed.dropped, 1);
    }

    #[test]
    fn test_crlf_line_endings() {
        let parsed = parse_exposition("arcsent_up 1\r\narcsent_jobs_total 2\r\n");
        assert_eq!(parsed.snapshot.len(), 2);
        assert_eq!(parsed.dropped, 0);
    }

    #[test]
    fn test_custom_prefix() {
        let parsed = parse_exposition_with_prefix("node_load1 0.5\narcsent_up 1\n", "node_");
        assert_eq!(parsed.snapshot.get("node_load1"), Some(0.5));
        assert!(!parsed.snapshot.contains("arcsent_up"));
    }

    #[test]
    fn test_parses_prometheus_text_encoder_output() {
        let registry = Registry::new();
        let gauge = IntGauge::with_opts(Opts::new("arcsent_findings_total", "Findings")).unwrap();
        registry.register(Box::new(gauge.clone())).unwrap();
        gauge.set(42);

        let mut buf = Vec::new();
        TextEncoder::new()
            .encode(&registry.gather(), &mut buf)
            .unwrap();
        let text = String::from_utf8(buf).unwrap();

        let parsed = parse_exposition(&text);
        assert_eq!(parsed.snapshot.findings_total(), Some(42.0));
        assert_eq!(parsed.dropped, 0);
    }
}
