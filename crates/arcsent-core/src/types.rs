//! JSON payloads returned by the daemon API.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

/// Daemon status snapshot from `GET /status`.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct SystemStatus {
    /// Lifecycle state reported by the daemon (e.g., "running").
    #[serde(default)]
    pub status: String,
    /// Whether the daemon process runs with euid 0.
    #[serde(default)]
    pub running_as_root: bool,
    /// Daemon build version (older daemons omit it).
    #[serde(default)]
    pub version: String,
}

/// Run history the scheduler keeps for one job.
///
/// Times stay raw wire strings; a never-set time arrives as the daemon's
/// zero time and renders as the placeholder.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct SchedulerJobState {
    pub last_run: Option<String>,
    pub last_success: Option<String>,
    pub last_error: Option<String>,
    /// Outcome of the last run (e.g., "success", "failed").
    pub last_status: String,
    pub last_error_message: String,
    pub consecutive_failures: u32,
}

/// Entry under `states` in `GET /scanners`.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct JobState {
    #[serde(default, deserialize_with = "null_as_default")]
    pub state: SchedulerJobState,
    #[serde(default)]
    pub next_run: Option<String>,
}

/// Scanner inventory from `GET /scanners`.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct ScannersResponse {
    /// Registered plugin names.
    #[serde(default, deserialize_with = "null_as_default")]
    pub plugins: Vec<String>,
    /// Scheduled jobs; the shape is owned by the daemon.
    #[serde(default, deserialize_with = "null_as_default")]
    pub jobs: Vec<serde_json::Value>,
    /// Per-job scheduler state keyed by job name.
    #[serde(default, deserialize_with = "null_as_default")]
    pub states: HashMap<String, JobState>,
}

/// A single finding reported by a scanner.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Finding {
    pub scanner_name: String,
    pub severity: String,
    pub category: String,
    pub description: String,
    #[serde(default)]
    pub occurred_at: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub remediation: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub evidence: Option<HashMap<String, String>>,
}

/// Visual emphasis for a finding severity.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SeverityBadge {
    Danger,
    Warning,
    Outline,
    Default,
}

impl SeverityBadge {
    /// Classify a free-form severity label (case-insensitive).
    pub fn classify(severity: &str) -> Self {
        match severity.to_lowercase().as_str() {
            "critical" | "high" => Self::Danger,
            "medium" => Self::Warning,
            "low" => Self::Outline,
            _ => Self::Default,
        }
    }
}

impl Finding {
    pub fn badge(&self) -> SeverityBadge {
        SeverityBadge::classify(&self.severity)
    }
}

/// Learned baseline statistics for one metric.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Baseline {
    pub metric: String,
    pub mean: f64,
    pub min: f64,
    pub max: f64,
}

/// Treat an explicit JSON `null` the same as a missing field.
///
/// The daemon encodes empty Go slices and maps as `null`.
pub(crate) fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: serde::Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_system_status_without_version() {
        let status: SystemStatus =
            serde_json::from_value(json!({"status": "running", "running_as_root": true})).unwrap();
        assert_eq!(status.status, "running");
        assert!(status.running_as_root);
        assert!(status.version.is_empty());
    }

    #[test]
    fn test_scanners_response_null_collections() {
        let resp: ScannersResponse =
            serde_json::from_value(json!({"plugins": null, "jobs": null})).unwrap();
        assert!(resp.plugins.is_empty());
        assert!(resp.jobs.is_empty());
        assert!(resp.states.is_empty());
    }

    #[test]
    fn test_scanners_response_daemon_payload() {
        let raw = r#"{
            "plugins": ["clamav", "rkhunter"],
            "jobs": [{"Name": "clamav", "Interval": 3600000000000}],
            "states": {
                "clamav": {
                    "state": {
                        "last_run": "2026-03-01T10:00:00Z",
                        "last_success": "2026-02-28T10:00:00Z",
                        "last_error": "2026-03-01T10:00:00Z",
                        "last_status": "failed",
                        "last_error_message": "clamscan: exit status 2",
                        "consecutive_failures": 3
                    },
                    "next_run": "2026-03-01T11:00:00Z"
                }
            }
        }"#;
        let resp: ScannersResponse = serde_json::from_str(raw).unwrap();

        assert_eq!(resp.plugins, vec!["clamav", "rkhunter"]);
        let clamav = &resp.states["clamav"];
        assert_eq!(clamav.state.last_status, "failed");
        assert_eq!(clamav.state.consecutive_failures, 3);
        assert_eq!(clamav.state.last_error_message, "clamscan: exit status 2");
        assert_eq!(clamav.state.last_run.as_deref(), Some("2026-03-01T10:00:00Z"));
        assert_eq!(clamav.next_run.as_deref(), Some("2026-03-01T11:00:00Z"));
    }

    #[test]
    fn test_job_state_never_run() {
        let state: JobState = serde_json::from_value(json!({
            "state": {
                "last_run": "0001-01-01T00:00:00Z",
                "last_status": "",
                "consecutive_failures": 0
            },
            "next_run": "0001-01-01T00:00:00Z"
        }))
        .unwrap();
        assert!(state.state.last_status.is_empty());
        assert!(state.state.last_success.is_none());

        let bare: JobState = serde_json::from_value(json!({"state": null})).unwrap();
        assert_eq!(bare, JobState::default());
    }

    #[test]
    fn test_severity_badge_classification() {
        assert_eq!(SeverityBadge::classify("CRITICAL"), SeverityBadge::Danger);
        assert_eq!(SeverityBadge::classify("high"), SeverityBadge::Danger);
        assert_eq!(SeverityBadge::classify("Medium"), SeverityBadge::Warning);
        assert_eq!(SeverityBadge::classify("low"), SeverityBadge::Outline);
        assert_eq!(SeverityBadge::classify("info"), SeverityBadge::Default);
    }

    #[test]
    fn test_finding_optional_fields() {
        let finding: Finding = serde_json::from_value(json!({
            "scanner_name": "auth_log",
            "severity": "high",
            "category": "auth",
            "description": "5 failed logins",
            "occurred_at": "2026-03-01T10:00:00Z",
            "evidence": {"user": "root"}
        }))
        .unwrap();
        assert_eq!(finding.badge(), SeverityBadge::Danger);
        assert!(finding.remediation.is_none());
        assert_eq!(finding.evidence.unwrap()["user"], "root");
    }
}
