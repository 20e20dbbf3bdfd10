//! Dashboard configuration.

use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Refresh behaviour of the dashboard.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DashboardConfig {
    /// Watch mode: run the initial load (status, signatures, metrics) before
    /// the first render. When false the first frame shows empty cards and
    /// loading starts one interval later. One-shot commands always load.
    #[serde(default = "default_refresh_on_start")]
    pub refresh_on_start: bool,
    /// Re-render period for watch mode, in seconds. Clamped to at least 1.
    #[serde(default = "default_watch_interval_secs")]
    pub watch_interval_secs: u64,
}

fn default_refresh_on_start() -> bool {
    true
}

fn default_watch_interval_secs() -> u64 {
    10
}

impl Default for DashboardConfig {
    fn default() -> Self {
        Self {
            refresh_on_start: default_refresh_on_start(),
            watch_interval_secs: default_watch_interval_secs(),
        }
    }
}

impl DashboardConfig {
    pub fn watch_interval(&self) -> Duration {
        Duration::from_secs(self.watch_interval_secs.max(1))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = DashboardConfig::default();
        assert!(config.refresh_on_start);
        assert_eq!(config.watch_interval(), Duration::from_secs(10));
    }

    #[test]
    fn test_zero_interval_clamped() {
        let config = DashboardConfig {
            watch_interval_secs: 0,
            ..Default::default()
        };
        assert_eq!(config.watch_interval(), Duration::from_secs(1));
    }

    #[test]
    fn test_partial_json_uses_defaults() {
        let config: DashboardConfig =
            serde_json::from_str(r#"{"watch_interval_secs": 3}"#).unwrap();
        assert!(config.refresh_on_start);
        assert_eq!(config.watch_interval_secs, 3);
    }
}
