//! Dashboard API trait.
//!
//! Abstracts the daemon endpoints the dashboard consumes, allowing for:
//! - Unit testing of refresh state with a mock backend
//! - Swapping the transport without touching the aggregator

use std::collections::{HashMap, VecDeque};
use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;

use parking_lot::Mutex;
use tokio::sync::{oneshot, Semaphore};

use arcsent_core::{Baseline, Finding, ScannersResponse, SignatureStatus, SystemStatus};

use crate::client::ApiClient;
use crate::error::{ApiError, ApiResult};

/// Boxed future for dyn-compatible async trait methods.
pub type BoxFuture<'a, T> = Pin<Box<dyn Future<Output = T> + Send + 'a>>;

/// Daemon endpoints used by the dashboard.
pub trait DashboardApi: Send + Sync {
    /// `GET /status`
    fn system_status(&self) -> BoxFuture<'_, ApiResult<SystemStatus>>;

    /// `GET /scanners`
    fn scanners(&self) -> BoxFuture<'_, ApiResult<ScannersResponse>>;

    /// `GET /findings`
    fn findings(&self) -> BoxFuture<'_, ApiResult<Vec<Finding>>>;

    /// `GET /baselines`
    fn baselines(&self) -> BoxFuture<'_, ApiResult<Vec<Baseline>>>;

    /// `GET /results/latest`
    fn latest_results(&self) -> BoxFuture<'_, ApiResult<Vec<serde_json::Value>>>;

    /// `POST /scanners/trigger/{plugin}`
    fn trigger_scan<'a>(&'a self, plugin: &'a str) -> BoxFuture<'a, ApiResult<serde_json::Value>>;

    /// `GET /signatures/status`
    fn signatures_status(&self) -> BoxFuture<'_, ApiResult<SignatureStatus>>;

    /// `POST /signatures/update`
    fn trigger_signatures_update(&self) -> BoxFuture<'_, ApiResult<SignatureStatus>>;

    /// `GET /metrics` as raw exposition text.
    fn metrics_text(&self) -> BoxFuture<'_, ApiResult<String>>;
}

/// Arc wrapper for DashboardApi trait objects.
pub type DynDashboardApi = Arc<dyn DashboardApi>;

impl DashboardApi for ApiClient {
    fn system_status(&self) -> BoxFuture<'_, ApiResult<SystemStatus>> {
        Box::pin(self.get_status())
    }

    fn scanners(&self) -> BoxFuture<'_, ApiResult<ScannersResponse>> {
        Box::pin(self.get_scanners())
    }

    fn findings(&self) -> BoxFuture<'_, ApiResult<Vec<Finding>>> {
        Box::pin(self.get_findings())
    }

    fn baselines(&self) -> BoxFuture<'_, ApiResult<Vec<Baseline>>> {
        Box::pin(self.get_baselines())
    }

    fn latest_results(&self) -> BoxFuture<'_, ApiResult<Vec<serde_json::Value>>> {
        Box::pin(self.get_latest_results())
    }

    fn trigger_scan<'a>(&'a self, plugin: &'a str) -> BoxFuture<'a, ApiResult<serde_json::Value>> {
        Box::pin(ApiClient::trigger_scan(self, plugin))
    }

    fn signatures_status(&self) -> BoxFuture<'_, ApiResult<SignatureStatus>> {
        Box::pin(self.get_signatures_status())
    }

    fn trigger_signatures_update(&self) -> BoxFuture<'_, ApiResult<SignatureStatus>> {
        Box::pin(ApiClient::trigger_signatures_update(self))
    }

    fn metrics_text(&self) -> BoxFuture<'_, ApiResult<String>> {
        Box::pin(self.get_metrics_text())
    }
}

/// Pending signatures response, resolved by the test.
type HeldSignatures = oneshot::Receiver<ApiResult<SignatureStatus>>;

/// Mock dashboard backend for testing.
///
/// Each endpoint returns a configurable result (cloned per call). Scan
/// triggers can be held open with [`MockDashboardApi::hold_triggers`] and
/// individual signature fetches with [`MockDashboardApi::hold_signatures`]
/// to observe in-flight state and completion order.
pub struct MockDashboardApi {
    status: Mutex<ApiResult<SystemStatus>>,
    scanners: Mutex<ApiResult<ScannersResponse>>,
    findings: Mutex<ApiResult<Vec<Finding>>>,
    baselines: Mutex<ApiResult<Vec<Baseline>>>,
    latest_results: Mutex<ApiResult<Vec<serde_json::Value>>>,
    signatures: Mutex<ApiResult<SignatureStatus>>,
    signatures_update: Mutex<ApiResult<SignatureStatus>>,
    /// Held signature fetches, handed out to calls in arrival order.
    held_signatures: Mutex<VecDeque<HeldSignatures>>,
    metrics_text: Mutex<ApiResult<String>>,
    /// Plugins whose trigger fails, with the error to return.
    failing_plugins: Mutex<HashMap<String, ApiError>>,
    /// Gate that in-flight triggers must pass before resolving.
    trigger_gate: Mutex<Option<Arc<Semaphore>>>,
    /// Recorded calls ("METHOD /path").
    calls: Mutex<Vec<String>>,
}

impl Default for MockDashboardApi {
    fn default() -> Self {
        Self::new()
    }
}

impl MockDashboardApi {
    /// Create a mock where every endpoint succeeds with an empty payload.
    pub fn new() -> Self {
        Self {
            status: Mutex::new(Ok(SystemStatus::default())),
            scanners: Mutex::new(Ok(ScannersResponse::default())),
            findings: Mutex::new(Ok(Vec::new())),
            baselines: Mutex::new(Ok(Vec::new())),
            latest_results: Mutex::new(Ok(Vec::new())),
            signatures: Mutex::new(Ok(SignatureStatus::default())),
            signatures_update: Mutex::new(Ok(SignatureStatus::default())),
            held_signatures: Mutex::new(VecDeque::new()),
            metrics_text: Mutex::new(Ok(String::new())),
            failing_plugins: Mutex::new(HashMap::new()),
            trigger_gate: Mutex::new(None),
            calls: Mutex::new(Vec::new()),
        }
    }

    pub fn set_status(&self, result: ApiResult<SystemStatus>) {
        *self.status.lock() = result;
    }

    pub fn set_scanners(&self, result: ApiResult<ScannersResponse>) {
        *self.scanners.lock() = result;
    }

    pub fn set_findings(&self, result: ApiResult<Vec<Finding>>) {
        *self.findings.lock() = result;
    }

    pub fn set_baselines(&self, result: ApiResult<Vec<Baseline>>) {
        *self.baselines.lock() = result;
    }

    pub fn set_latest_results(&self, result: ApiResult<Vec<serde_json::Value>>) {
        *self.latest_results.lock() = result;
    }

    pub fn set_signatures(&self, result: ApiResult<SignatureStatus>) {
        *self.signatures.lock() = result;
    }

    pub fn set_signatures_update(&self, result: ApiResult<SignatureStatus>) {
        *self.signatures_update.lock() = result;
    }

    pub fn set_metrics_text(&self, result: ApiResult<String>) {
        *self.metrics_text.lock() = result;
    }

    /// Make triggers for `plugin` fail with `error`.
    pub fn fail_plugin(&self, plugin: impl Into<String>, error: ApiError) {
        self.failing_plugins.lock().insert(plugin.into(), error);
    }

    /// Hold every subsequent trigger until a permit is added to the returned gate.
    pub fn hold_triggers(&self) -> Arc<Semaphore> {
        let gate = Arc::new(Semaphore::new(0));
        *self.trigger_gate.lock() = Some(gate.clone());
        gate
    }

    /// Hold the next `GET /signatures/status` call until the returned sender
    /// supplies its result. Each call claims one held slot in arrival order.
    pub fn hold_signatures(&self) -> oneshot::Sender<ApiResult<SignatureStatus>> {
        let (tx, rx) = oneshot::channel();
        self.held_signatures.lock().push_back(rx);
        tx
    }

    /// Get recorded calls.
    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().clone()
    }

    /// Number of recorded calls to `call` (e.g., "GET /status").
    pub fn call_count(&self, call: &str) -> usize {
        self.calls.lock().iter().filter(|c| c.as_str() == call).count()
    }

    fn record(&self, call: impl Into<String>) {
        self.calls.lock().push(call.into());
    }
}

impl DashboardApi for MockDashboardApi {
    fn system_status(&self) -> BoxFuture<'_, ApiResult<SystemStatus>> {
        Box::pin(async move {
            self.record("GET /status");
            self.status.lock().clone()
        })
    }

    fn scanners(&self) -> BoxFuture<'_, ApiResult<ScannersResponse>> {
        Box::pin(async move {
            self.record("GET /scanners");
            self.scanners.lock().clone()
        })
    }

    fn findings(&self) -> BoxFuture<'_, ApiResult<Vec<Finding>>> {
        Box::pin(async move {
            self.record("GET /findings");
            self.findings.lock().clone()
        })
    }

    fn baselines(&self) -> BoxFuture<'_, ApiResult<Vec<Baseline>>> {
        Box::pin(async move {
            self.record("GET /baselines");
            self.baselines.lock().clone()
        })
    }

    fn latest_results(&self) -> BoxFuture<'_, ApiResult<Vec<serde_json::Value>>> {
        Box::pin(async move {
            self.record("GET /results/latest");
            self.latest_results.lock().clone()
        })
    }

    fn trigger_scan<'a>(&'a self, plugin: &'a str) -> BoxFuture<'a, ApiResult<serde_json::Value>> {
        Box::pin(async move {
            self.record(format!("POST /scanners/trigger/{plugin}"));

            let gate = self.trigger_gate.lock().clone();
            if let Some(gate) = gate {
                let permit = gate
                    .acquire()
                    .await
                    .map_err(|e| ApiError::Transport(e.to_string()))?;
                permit.forget();
            }

            if let Some(err) = self.failing_plugins.lock().get(plugin) {
                return Err(err.clone());
            }
            Ok(serde_json::json!({ "plugin": plugin, "status": "ok" }))
        })
    }

    fn signatures_status(&self) -> BoxFuture<'_, ApiResult<SignatureStatus>> {
        Box::pin(async move {
            self.record("GET /signatures/status");

            let held = self.held_signatures.lock().pop_front();
            match held {
                Some(rx) => rx
                    .await
                    .map_err(|e| ApiError::Transport(e.to_string()))?,
                None => self.signatures.lock().clone(),
            }
        })
    }

    fn trigger_signatures_update(&self) -> BoxFuture<'_, ApiResult<SignatureStatus>> {
        Box::pin(async move {
            self.record("POST /signatures/update");
            self.signatures_update.lock().clone()
        })
    }

    fn metrics_text(&self) -> BoxFuture<'_, ApiResult<String>> {
        Box::pin(async move {
            self.record("GET /metrics");
            self.metrics_text.lock().clone()
        })
    }
}
