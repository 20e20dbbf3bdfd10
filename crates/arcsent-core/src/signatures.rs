//! Signature-feed health records.
//!
//! `SignatureStatus` is returned by both `GET /signatures/status` and
//! `POST /signatures/update`. Timestamps stay as the raw wire strings and are
//! only interpreted by [`crate::format_timestamp`], so a malformed timestamp
//! never fails decoding of the whole record.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::types::null_as_default;

/// Health of one signature source.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct SignatureSourceStatus {
    /// Source identifier; equals this entry's key in `SignatureStatus::sources`.
    pub source: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub path: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bytes: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub duration: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

/// Ok/failed classification of a source.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SourceHealth {
    Ok,
    Failed,
}

impl SignatureSourceStatus {
    /// A source is failed iff it carries a non-empty error.
    pub fn health(&self) -> SourceHealth {
        match self.error.as_deref() {
            Some(err) if !err.is_empty() => SourceHealth::Failed,
            _ => SourceHealth::Ok,
        }
    }

    pub fn is_failed(&self) -> bool {
        self.health() == SourceHealth::Failed
    }
}

/// Signature updater state.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct SignatureStatus {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_run: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub next_run: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub airgap_mode: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub airgap_import_path: Option<String>,
    /// Sources keyed by `SignatureSourceStatus::source`.
    #[serde(default, deserialize_with = "null_as_default")]
    pub sources: HashMap<String, SignatureSourceStatus>,
}

impl SignatureStatus {
    pub fn total_sources(&self) -> usize {
        self.sources.len()
    }

    pub fn failed_sources(&self) -> usize {
        self.sources.values().filter(|s| s.is_failed()).count()
    }

    pub fn ok_sources(&self) -> usize {
        self.sources.values().filter(|s| !s.is_failed()).count()
    }

    pub fn is_airgapped(&self) -> bool {
        self.airgap_mode.unwrap_or(false)
    }

    /// Names of sources whose map key differs from their `source` field.
    ///
    /// A well-formed payload returns an empty list.
    pub fn mismatched_keys(&self) -> Vec<&str> {
        self.sources
            .iter()
            .filter(|(key, src)| key.as_str() != src.source)
            .map(|(key, _)| key.as_str())
            .collect()
    }
}
