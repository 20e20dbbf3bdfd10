//! Derived view values consumed by renderers.
//!
//! Everything here is a pure function of stored resource state and is
//! recomputed on every read.

use std::collections::BTreeMap;

use serde::Serialize;

use arcsent_core::{
    format_timestamp, Baseline, Finding, MetricsSnapshot, ScannersResponse, SignatureStatus,
    SystemStatus, PLACEHOLDER,
};

use crate::resource::RefreshableResource;

/// Source counts and timing for the signatures card.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SignatureSummary {
    pub total_sources: usize,
    pub ok_sources: usize,
    pub failed_sources: usize,
    pub last_run: String,
    pub next_run: String,
    /// Import location when the updater runs air-gapped.
    pub airgap: Option<String>,
}

impl SignatureSummary {
    pub fn from_status(status: Option<&SignatureStatus>) -> Self {
        let Some(status) = status else {
            return Self {
                total_sources: 0,
                ok_sources: 0,
                failed_sources: 0,
                last_run: PLACEHOLDER.to_string(),
                next_run: PLACEHOLDER.to_string(),
                airgap: None,
            };
        };

        let airgap = status.is_airgapped().then(|| {
            status
                .airgap_import_path
                .clone()
                .filter(|p| !p.is_empty())
                .unwrap_or_else(|| "enabled".to_string())
        });

        Self {
            total_sources: status.total_sources(),
            ok_sources: status.ok_sources(),
            failed_sources: status.failed_sources(),
            last_run: format_timestamp(status.last_run.as_deref()),
            next_run: format_timestamp(status.next_run.as_deref()),
            airgap,
        }
    }

    /// "2 ok / 1 failed", or the placeholder when no sources are known.
    pub fn sources_label(&self) -> String {
        if self.total_sources == 0 {
            PLACEHOLDER.to_string()
        } else {
            format!("{} ok / {} failed", self.ok_sources, self.failed_sources)
        }
    }

    pub fn airgap_label(&self) -> Option<String> {
        self.airgap
            .as_ref()
            .map(|path| format!("Air-gapped import: {path}"))
    }
}

/// Headline label for the system card.
pub fn status_label(status: Option<&SystemStatus>) -> &str {
    match status {
        Some(s) if !s.status.is_empty() => s.status.as_str(),
        _ => "Unknown",
    }
}

/// Privilege line for the system card.
pub fn privilege_label(status: Option<&SystemStatus>) -> &'static str {
    if status.is_some_and(|s| s.running_as_root) {
        "Running as root (Warning)"
    } else {
        "Secure mode"
    }
}

/// Render an optional metric value, integers without a fractional part.
pub fn metric_label(value: Option<f64>) -> String {
    match value {
        Some(v) if v.fract() == 0.0 && v.abs() < 1e15 => format!("{}", v as i64),
        Some(v) => format!("{v}"),
        None => PLACEHOLDER.to_string(),
    }
}

/// Point-in-time copy of all dashboard state.
#[derive(Debug, Clone, Serialize)]
pub struct DashboardView {
    pub status: RefreshableResource<SystemStatus>,
    pub signatures: RefreshableResource<SignatureStatus>,
    pub signature_summary: SignatureSummary,
    pub metrics: RefreshableResource<MetricsSnapshot>,
    pub scanners: RefreshableResource<ScannersResponse>,
    pub findings: RefreshableResource<Vec<Finding>>,
    pub baselines: RefreshableResource<Vec<Baseline>>,
    /// Per-plugin trigger flags, sorted by plugin name.
    pub scans_in_flight: BTreeMap<String, bool>,
}
