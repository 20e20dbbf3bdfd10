//! Wire data model for the ArcSent daemon REST API.
//!
//! This crate provides the types exchanged with the daemon and shared by the
//! dashboard layers:
//! - `SystemStatus`, `ScannersResponse`, `Finding`, `Baseline`: JSON payloads
//! - `SignatureStatus`, `SignatureSourceStatus`: signature-feed health
//! - `MetricsSnapshot`: namespaced metric values from the exposition endpoint
//! - `format_timestamp`: placeholder-safe timestamp rendering

pub mod metrics;
pub mod signatures;
pub mod time;
pub mod types;

pub use metrics::{MetricsSnapshot, METRIC_PREFIX};
pub use signatures::{SignatureSourceStatus, SignatureStatus, SourceHealth};
pub use time::{format_timestamp, parse_timestamp, PLACEHOLDER};
pub use types::{
    Baseline, Finding, JobState, ScannersResponse, SchedulerJobState, SeverityBadge, SystemStatus,
};
