//! Namespaced metric values scraped from the daemon.

use std::collections::HashMap;

use serde::Serialize;

/// Namespace prefix carried by every daemon metric.
pub const METRIC_PREFIX: &str = "arcsent_";

pub const PLUGINS_TOTAL: &str = "arcsent_plugins_total";
pub const JOBS_TOTAL: &str = "arcsent_jobs_total";
pub const RESULTS_TOTAL: &str = "arcsent_results_total";
pub const FINDINGS_TOTAL: &str = "arcsent_findings_total";

/// Metric name to value mapping.
///
/// Only names starting with [`METRIC_PREFIX`] are ever inserted by the
/// exposition parser.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct MetricsSnapshot(HashMap<String, f64>);

impl MetricsSnapshot {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a value; a repeated name overwrites the earlier one.
    pub fn insert(&mut self, name: impl Into<String>, value: f64) {
        self.0.insert(name.into(), value);
    }

    pub fn get(&self, name: &str) -> Option<f64> {
        self.0.get(name).copied()
    }

    pub fn contains(&self, name: &str) -> bool {
        self.0.contains_key(name)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, f64)> {
        self.0.iter().map(|(k, v)| (k.as_str(), *v))
    }

    pub fn plugins_total(&self) -> Option<f64> {
        self.get(PLUGINS_TOTAL)
    }

    pub fn jobs_total(&self) -> Option<f64> {
        self.get(JOBS_TOTAL)
    }

    pub fn results_total(&self) -> Option<f64> {
        self.get(RESULTS_TOTAL)
    }

    pub fn findings_total(&self) -> Option<f64> {
        self.get(FINDINGS_TOTAL)
    }
}

impl FromIterator<(String, f64)> for MetricsSnapshot {
    fn from_iter<I: IntoIterator<Item = (String, f64)>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}
