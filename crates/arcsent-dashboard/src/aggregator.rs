//! Status aggregation and refresh.
//!
//! `StatusAggregator` owns one [`RefreshableResource`] per backend data
//! source and exposes refresh operations for each of them. Resources live in
//! separate lock slots and are written independently, so refreshes of
//! different resources may run concurrently without coordination.
//!
//! Consistency rules:
//! - Every failure is caught at the resource boundary and turned into that
//!   resource's error text; nothing propagates to the caller.
//! - There is no de-duplication: two racing refreshes of the same resource
//!   both run and the last response to resolve wins.
//! - Locks are never held across an `.await`.

use std::collections::HashMap;
use std::future::Future;
use std::sync::Arc;

use futures_util::future::join_all;
use parking_lot::RwLock;
use tracing::{debug, info, warn};

use arcsent_client::{ApiError, ApiResult, DynCredentialProvider, DynDashboardApi};
use arcsent_core::{
    Baseline, Finding, MetricsSnapshot, ScannersResponse, SignatureStatus, SystemStatus,
};
use arcsent_telemetry::{parse_exposition, Metrics};

use crate::resource::RefreshableResource;
use crate::view::{DashboardView, SignatureSummary};

const SIGNATURES_FALLBACK: &str = "Failed to load signatures";
const SIGNATURES_UPDATE_FALLBACK: &str = "Update failed";
const METRICS_FALLBACK: &str = "Failed to load metrics";
const SCANNERS_FALLBACK: &str = "Failed to load scanners";
const FINDINGS_FALLBACK: &str = "Failed to load findings";
const BASELINES_FALLBACK: &str = "Failed to load baselines";

/// Error text shown for a failed refresh. Detail-less errors use `fallback`.
fn error_text(err: &ApiError, fallback: &str) -> String {
    match err {
        ApiError::RequestFailed(detail)
        | ApiError::Transport(detail)
        | ApiError::Decode(detail)
        | ApiError::Credential(detail)
        | ApiError::HttpClient(detail)
            if detail.trim().is_empty() =>
        {
            fallback.to_string()
        }
        _ => err.to_string(),
    }
}

type Slot<T> = Arc<RwLock<RefreshableResource<T>>>;

/// What a failed refresh leaves in its resource.
#[derive(Debug, Clone, Copy)]
enum OnFailure {
    /// Store the error text, or the given fallback for detail-less errors.
    Record(&'static str),
    /// Log only; the previous value stays and no error text is stored.
    LogOnly,
}

/// Run one refresh against `slot` with the standard loading/error discipline.
async fn refresh_slot<T, F>(
    slot: &Slot<T>,
    resource: &'static str,
    on_failure: OnFailure,
    fetch: F,
) where
    F: Future<Output = ApiResult<T>>,
{
    slot.write().begin();
    Metrics::refresh_started(resource);

    let result = fetch.await;
    let success = result.is_ok();
    match result {
        Ok(value) => {
            slot.write().succeed(value);
            debug!(resource, "Refresh succeeded");
        }
        Err(e) => {
            warn!(resource, error = %e, "Refresh failed");
            match on_failure {
                OnFailure::Record(fallback) => slot.write().fail(error_text(&e, fallback)),
                OnFailure::LogOnly => slot.write().settle(),
            }
        }
    }

    Metrics::refresh_finished(resource, success);
}

/// Log sources stored under a key other than their own name.
///
/// Returns the offending keys, sorted.
fn check_source_keys(status: &SignatureStatus) -> Vec<String> {
    let mut mismatched: Vec<String> = status
        .mismatched_keys()
        .into_iter()
        .map(str::to_string)
        .collect();
    mismatched.sort();
    if !mismatched.is_empty() {
        warn!(keys = ?mismatched, "Signature sources keyed under a different name");
    }
    mismatched
}

/// Owner of all refreshable dashboard state.
///
/// Cloning is cheap and yields a handle onto the same state, which is how
/// renderers hold read access plus the ability to trigger refreshes.
#[derive(Clone)]
pub struct StatusAggregator {
    /// Backend endpoints.
    api: DynDashboardApi,
    /// Credential cleared on logout.
    credentials: DynCredentialProvider,
    status: Slot<SystemStatus>,
    signatures: Slot<SignatureStatus>,
    metrics: Slot<MetricsSnapshot>,
    scanners: Slot<ScannersResponse>,
    findings: Slot<Vec<Finding>>,
    baselines: Slot<Vec<Baseline>>,
    /// Plugin name -> trigger in flight. Absent keys read as false.
    scan_loading: Arc<RwLock<HashMap<String, bool>>>,
}

impl StatusAggregator {
    pub fn new(api: DynDashboardApi, credentials: DynCredentialProvider) -> Self {
        Self {
            api,
            credentials,
            status: Default::default(),
            signatures: Default::default(),
            metrics: Default::default(),
            scanners: Default::default(),
            findings: Default::default(),
            baselines: Default::default(),
            scan_loading: Arc::new(RwLock::new(HashMap::new())),
        }
    }

    /// Refresh system status.
    ///
    /// Failures are logged only; the resource never carries error text and
    /// the previous snapshot stays in place.
    pub async fn refresh_status(&self) {
        refresh_slot(
            &self.status,
            "status",
            OnFailure::LogOnly,
            self.api.system_status(),
        )
        .await;
    }

    /// Refresh signature-feed status.
    pub async fn refresh_signatures(&self) {
        let api = &self.api;
        let fetch = async move {
            let status = api.signatures_status().await?;
            check_source_keys(&status);
            Ok::<_, ApiError>(status)
        };
        refresh_slot(
            &self.signatures,
            "signatures",
            OnFailure::Record(SIGNATURES_FALLBACK),
            fetch,
        )
        .await;
    }

    /// Ask the daemon to update signatures now; its response becomes the stored status.
    pub async fn trigger_signature_update(&self) {
        info!("Triggering signature update");
        let api = &self.api;
        let fetch = async move {
            let status = api.trigger_signatures_update().await?;
            check_source_keys(&status);
            Ok::<_, ApiError>(status)
        };
        refresh_slot(
            &self.signatures,
            "signatures",
            OnFailure::Record(SIGNATURES_UPDATE_FALLBACK),
            fetch,
        )
        .await;
    }

    /// Refresh metrics from the exposition endpoint.
    pub async fn refresh_metrics(&self) {
        let api = &self.api;
        let fetch = async move {
            let raw = api.metrics_text().await?;
            let parsed = parse_exposition(&raw);
            if parsed.dropped > 0 {
                debug!(dropped = parsed.dropped, "Dropped unusable exposition lines");
                Metrics::exposition_dropped(parsed.dropped);
            }
            Ok::<_, ApiError>(parsed.snapshot)
        };
        refresh_slot(
            &self.metrics,
            "metrics",
            OnFailure::Record(METRICS_FALLBACK),
            fetch,
        )
        .await;
    }

    pub async fn refresh_scanners(&self) {
        refresh_slot(
            &self.scanners,
            "scanners",
            OnFailure::Record(SCANNERS_FALLBACK),
            self.api.scanners(),
        )
        .await;
    }

    pub async fn refresh_findings(&self) {
        refresh_slot(
            &self.findings,
            "findings",
            OnFailure::Record(FINDINGS_FALLBACK),
            self.api.findings(),
        )
        .await;
    }

    pub async fn refresh_baselines(&self) {
        refresh_slot(
            &self.baselines,
            "baselines",
            OnFailure::Record(BASELINES_FALLBACK),
            self.api.baselines(),
        )
        .await;
    }

    /// Initial load: status, signatures and metrics concurrently.
    pub async fn refresh_all(&self) {
        tokio::join!(
            self.refresh_status(),
            self.refresh_signatures(),
            self.refresh_metrics()
        );
    }

    /// Trigger one scanner run.
    ///
    /// The plugin's loading flag is set for the duration of the call and
    /// cleared whatever the outcome. Failures are logged, never stored in a
    /// shared error field. Returns the daemon's response on success.
    pub async fn trigger_scan(&self, plugin: &str) -> Option<serde_json::Value> {
        self.scan_loading.write().insert(plugin.to_string(), true);

        let result = self.api.trigger_scan(plugin).await;
        Metrics::scan_triggered(result.is_ok());
        let response = match result {
            Ok(response) => {
                info!(plugin, "Scan triggered");
                Some(response)
            }
            Err(e) => {
                warn!(plugin, error = %e, "Scan trigger failed");
                None
            }
        };

        self.scan_loading.write().insert(plugin.to_string(), false);
        response
    }

    /// Trigger several scanners concurrently; results are in input order.
    pub async fn trigger_scans(&self, plugins: &[String]) -> Vec<Option<serde_json::Value>> {
        join_all(plugins.iter().map(|p| self.trigger_scan(p))).await
    }

    /// Clear the credential, drop all state and reload.
    ///
    /// Only a credential store failure is returned; refresh failures land in
    /// the resources as usual.
    pub async fn logout(&self) -> ApiResult<()> {
        self.credentials.clear()?;
        info!("Credential cleared, reloading dashboard");
        self.reset();
        self.refresh_all().await;
        Ok(())
    }

    /// Return every resource to `Idle` and forget trigger flags.
    pub fn reset(&self) {
        self.status.write().reset();
        self.signatures.write().reset();
        self.metrics.write().reset();
        self.scanners.write().reset();
        self.findings.write().reset();
        self.baselines.write().reset();
        self.scan_loading.write().clear();
    }

    pub fn is_scan_loading(&self, plugin: &str) -> bool {
        self.scan_loading
            .read()
            .get(plugin)
            .copied()
            .unwrap_or(false)
    }

    pub fn status(&self) -> RefreshableResource<SystemStatus> {
        self.status.read().clone()
    }

    pub fn signatures(&self) -> RefreshableResource<SignatureStatus> {
        self.signatures.read().clone()
    }

    pub fn metrics(&self) -> RefreshableResource<MetricsSnapshot> {
        self.metrics.read().clone()
    }

    pub fn scanners(&self) -> RefreshableResource<ScannersResponse> {
        self.scanners.read().clone()
    }

    pub fn findings(&self) -> RefreshableResource<Vec<Finding>> {
        self.findings.read().clone()
    }

    pub fn baselines(&self) -> RefreshableResource<Vec<Baseline>> {
        self.baselines.read().clone()
    }

    pub fn signature_summary(&self) -> SignatureSummary {
        SignatureSummary::from_status(self.signatures.read().value())
    }

    /// Read one count from the current signature status under a single guard.
    fn source_count(&self, count: fn(&SignatureStatus) -> usize) -> usize {
        self.signatures.read().value().map_or(0, count)
    }

    pub fn total_sources(&self) -> usize {
        self.source_count(SignatureStatus::total_sources)
    }

    pub fn failed_sources(&self) -> usize {
        self.source_count(SignatureStatus::failed_sources)
    }

    pub fn ok_sources(&self) -> usize {
        self.source_count(SignatureStatus::ok_sources)
    }

    /// Collect a point-in-time copy of all state.
    pub fn view(&self) -> DashboardView {
        let signatures = self.signatures();
        let signature_summary = SignatureSummary::from_status(signatures.value());

        DashboardView {
            status: self.status(),
            signatures,
            signature_summary,
            metrics: self.metrics(),
            scanners: self.scanners(),
            findings: self.findings(),
            baselines: self.baselines(),
            scans_in_flight: self
                .scan_loading
                .read()
                .iter()
                .map(|(k, v)| (k.clone(), *v))
                .collect(),
        }
    }
}
