//! Plain-text rendering of dashboard state.
//!
//! Each function returns the full text block for one view; callers decide
//! where to print it.

use arcsent_core::{
    format_timestamp, Baseline, Finding, MetricsSnapshot, ScannersResponse, SeverityBadge,
    SignatureStatus, SystemStatus, PLACEHOLDER,
};
use arcsent_dashboard::{
    metric_label, privilege_label, status_label, DashboardView, RefreshableResource,
    SignatureSummary,
};

fn heading<T>(title: &str, resource: &RefreshableResource<T>) -> String {
    if resource.is_loading() {
        format!("{title} (refreshing)")
    } else {
        title.to_string()
    }
}

fn push_error<T>(lines: &mut Vec<String>, resource: &RefreshableResource<T>) {
    if let Some(err) = resource.error() {
        lines.push(format!("  Error:      {err}"));
    }
}

/// System card: headline status and privilege mode.
pub fn system_card(status: Option<&SystemStatus>) -> Vec<String> {
    let mut lines = vec![
        format!("  Status:     {}", status_label(status)),
        format!("  Privileges: {}", privilege_label(status)),
    ];
    if let Some(version) = status.map(|s| s.version.as_str()).filter(|v| !v.is_empty()) {
        lines.push(format!("  Version:    {version}"));
    }
    lines
}

/// Signatures card: source counts, run times and air-gap mode.
pub fn signatures_card(summary: &SignatureSummary) -> Vec<String> {
    let mut lines = vec![
        format!("  Sources:    {}", summary.sources_label()),
        format!("  Last run:   {}", summary.last_run),
        format!("  Next run:   {}", summary.next_run),
    ];
    if let Some(airgap) = summary.airgap_label() {
        lines.push(format!("  {airgap}"));
    }
    lines
}

/// Metrics card: the known daemon totals.
pub fn metrics_card(snapshot: Option<&MetricsSnapshot>) -> Vec<String> {
    let get = |f: fn(&MetricsSnapshot) -> Option<f64>| metric_label(snapshot.and_then(f));
    vec![
        format!("  Plugins:    {}", get(MetricsSnapshot::plugins_total)),
        format!("  Jobs:       {}", get(MetricsSnapshot::jobs_total)),
        format!("  Results:    {}", get(MetricsSnapshot::results_total)),
        format!("  Findings:   {}", get(MetricsSnapshot::findings_total)),
    ]
}

pub fn render_dashboard(view: &DashboardView) -> String {
    let mut lines = vec![heading("System", &view.status)];
    lines.extend(system_card(view.status.value()));

    lines.push(heading("Signatures", &view.signatures));
    lines.extend(signatures_card(&view.signature_summary));
    push_error(&mut lines, &view.signatures);

    lines.push(heading("Metrics", &view.metrics));
    lines.extend(metrics_card(view.metrics.value()));
    push_error(&mut lines, &view.metrics);

    lines.join("\n")
}

pub fn render_status(status: &SystemStatus) -> String {
    system_card(Some(status)).join("\n")
}

/// Per-source detail, sorted by source name.
pub fn render_signatures(status: &SignatureStatus) -> String {
    let mut lines = signatures_card(&SignatureSummary::from_status(Some(status)));

    let mut sources: Vec<_> = status.sources.values().collect();
    sources.sort_by(|a, b| a.source.cmp(&b.source));
    for src in sources {
        let detail = match src.error.as_deref().filter(|e| !e.is_empty()) {
            Some(err) => format!("FAILED: {err}"),
            None => {
                let mut ok = format!("ok, updated {}", format_timestamp(src.updated_at.as_deref()));
                if let Some(bytes) = src.bytes {
                    ok.push_str(&format!(", {bytes} bytes"));
                }
                ok
            }
        };
        lines.push(format!("  - {:<16} {detail}", src.source));
    }

    lines.join("\n")
}

/// Plugin inventory followed by job states, both sorted.
pub fn render_scanners(scanners: &ScannersResponse) -> String {
    if scanners.plugins.is_empty() && scanners.states.is_empty() {
        return "No scanners registered".to_string();
    }

    let mut plugins = scanners.plugins.clone();
    plugins.sort();
    let mut lines = vec![format!("Plugins ({})", plugins.len())];
    lines.extend(plugins.iter().map(|p| format!("  - {p}")));

    if !scanners.states.is_empty() {
        let mut states: Vec<_> = scanners.states.iter().collect();
        states.sort_by(|a, b| a.0.cmp(b.0));
        lines.push("Jobs".to_string());
        for (name, job) in states {
            let history = &job.state;
            let status_label = if history.last_status.is_empty() {
                PLACEHOLDER
            } else {
                history.last_status.as_str()
            };
            lines.push(format!(
                "  - {name:<16} {status_label:<10} failures={} last run {} next run {}",
                history.consecutive_failures,
                format_timestamp(history.last_run.as_deref()),
                format_timestamp(job.next_run.as_deref())
            ));
            if !history.last_error_message.is_empty() {
                lines.push(format!("      Last error: {}", history.last_error_message));
            }
        }
    }

    lines.join("\n")
}

fn badge_marker(badge: SeverityBadge) -> &'static str {
    match badge {
        SeverityBadge::Danger => "!!",
        SeverityBadge::Warning => "! ",
        SeverityBadge::Outline => "- ",
        SeverityBadge::Default => "  ",
    }
}

pub fn render_findings(findings: &[Finding]) -> String {
    if findings.is_empty() {
        return "No findings".to_string();
    }

    let mut lines = Vec::with_capacity(findings.len());
    for finding in findings {
        lines.push(format!(
            "{} [{}] {} {}/{}: {}",
            badge_marker(finding.badge()),
            finding.severity.to_uppercase(),
            format_timestamp(Some(finding.occurred_at.as_str())),
            finding.scanner_name,
            finding.category,
            finding.description
        ));
        if let Some(remediation) = finding.remediation.as_deref().filter(|r| !r.is_empty()) {
            lines.push(format!("     Remediation: {remediation}"));
        }
    }
    lines.join("\n")
}

pub fn render_baselines(baselines: &[Baseline]) -> String {
    if baselines.is_empty() {
        return "No baselines learned yet".to_string();
    }

    baselines
        .iter()
        .map(|b| {
            format!(
                "{:<24} mean={:.2} min={:.2} max={:.2}",
                b.metric, b.mean, b.min, b.max
            )
        })
        .collect::<Vec<_>>()
        .join("\n")
}

/// Every collected metric, sorted by name.
pub fn render_metrics(snapshot: &MetricsSnapshot) -> String {
    if snapshot.is_empty() {
        return "No metrics reported".to_string();
    }

    let mut entries: Vec<_> = snapshot.iter().collect();
    entries.sort_by(|a, b| a.0.cmp(b.0));
    entries
        .into_iter()
        .map(|(name, value)| format!("{name:<32} {}", metric_label(Some(value))))
        .collect::<Vec<_>>()
        .join("\n")
}
