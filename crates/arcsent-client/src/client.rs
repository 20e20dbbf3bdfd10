//! HTTP client for the ArcSent daemon REST API.
//!
//! Every request carries the current credential verbatim in the
//! `Authorization` header (empty when unset; the daemon decides whether to
//! reject it). Responses are mapped to [`ApiError`]:
//! - 401 → `Unauthorized`
//! - any other non-2xx → `RequestFailed(status text)`
//! - connection/IO failures → `Transport`
//!
//! No retries are performed here; retry policy belongs to the caller.

use std::time::Duration;

use reqwest::header::{HeaderValue, AUTHORIZATION, CONTENT_TYPE};
use reqwest::{Client, Method, StatusCode};
use serde::de::DeserializeOwned;
use tracing::{debug, warn};

use arcsent_core::{Baseline, Finding, ScannersResponse, SignatureStatus, SystemStatus};

use crate::credential::DynCredentialProvider;
use crate::error::{ApiError, ApiResult};

/// Path prefix under which the daemon serves its API.
pub const API_BASE_PATH: &str = "/api";

const JSON_CONTENT_TYPE: &str = "application/json";
const TEXT_CONTENT_TYPE: &str = "text/plain";

/// Map a response status to the client error taxonomy.
///
/// Returns `None` for 2xx statuses.
pub fn status_error(status: StatusCode) -> Option<ApiError> {
    if status.is_success() {
        return None;
    }
    if status == StatusCode::UNAUTHORIZED {
        return Some(ApiError::Unauthorized);
    }
    let text = status
        .canonical_reason()
        .map(str::to_string)
        .unwrap_or_else(|| status.as_u16().to_string());
    Some(ApiError::RequestFailed(text))
}

/// Authenticated client for the daemon API.
#[derive(Clone)]
pub struct ApiClient {
    /// HTTP client.
    http: Client,
    /// Daemon base URL without the `/api` prefix (e.g., "http://127.0.0.1:8788").
    base_url: String,
    /// Credential read before every request.
    credentials: DynCredentialProvider,
}

impl ApiClient {
    /// Create a client that relies on the transport's default timeouts.
    pub fn new(base_url: impl Into<String>, credentials: DynCredentialProvider) -> ApiResult<Self> {
        Self::with_timeout(base_url, credentials, None)
    }

    /// Create a client with an optional overall request timeout.
    pub fn with_timeout(
        base_url: impl Into<String>,
        credentials: DynCredentialProvider,
        timeout: Option<Duration>,
    ) -> ApiResult<Self> {
        let mut builder = Client::builder();
        if let Some(timeout) = timeout {
            builder = builder.timeout(timeout);
        }
        let http = builder
            .build()
            .map_err(|e| ApiError::HttpClient(format!("Failed to create HTTP client: {e}")))?;

        Ok(Self {
            http,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            credentials,
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn credentials(&self) -> &DynCredentialProvider {
        &self.credentials
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}{}", self.base_url, API_BASE_PATH, path)
    }

    fn authorization(&self) -> ApiResult<HeaderValue> {
        let token = self.credentials.get()?.unwrap_or_default();
        HeaderValue::from_str(&token).map_err(|_| {
            ApiError::Credential("Credential contains characters not allowed in a header".into())
        })
    }

    async fn send(
        &self,
        method: Method,
        path: &str,
        content_type: &'static str,
    ) -> ApiResult<reqwest::Response> {
        let url = self.url(path);
        debug!(%method, %url, "Sending API request");

        let response = self
            .http
            .request(method.clone(), &url)
            .header(AUTHORIZATION, self.authorization()?)
            .header(CONTENT_TYPE, content_type)
            .send()
            .await
            .map_err(|e| ApiError::Transport(format!("HTTP request failed: {e}")))?;

        if let Some(err) = status_error(response.status()) {
            warn!(%method, %url, status = %response.status(), "API request rejected");
            return Err(err);
        }
        Ok(response)
    }

    /// Issue a request and decode the JSON body.
    pub async fn request<T: DeserializeOwned>(&self, method: Method, path: &str) -> ApiResult<T> {
        let response = self.send(method, path, JSON_CONTENT_TYPE).await?;
        let body = response
            .bytes()
            .await
            .map_err(|e| ApiError::Transport(format!("Failed to read response: {e}")))?;
        serde_json::from_slice(&body)
            .map_err(|e| ApiError::Decode(format!("Failed to parse response for {path}: {e}")))
    }

    /// Issue a request and return the body as plain text.
    pub async fn request_text(&self, method: Method, path: &str) -> ApiResult<String> {
        let response = self.send(method, path, TEXT_CONTENT_TYPE).await?;
        response
            .text()
            .await
            .map_err(|e| ApiError::Transport(format!("Failed to read response: {e}")))
    }

    pub async fn get_status(&self) -> ApiResult<SystemStatus> {
        self.request(Method::GET, "/status").await
    }

    pub async fn get_scanners(&self) -> ApiResult<ScannersResponse> {
        self.request(Method::GET, "/scanners").await
    }

    pub async fn get_findings(&self) -> ApiResult<Vec<Finding>> {
        self.request::<Option<Vec<Finding>>>(Method::GET, "/findings")
            .await
            .map(Option::unwrap_or_default)
    }

    pub async fn get_baselines(&self) -> ApiResult<Vec<Baseline>> {
        self.request::<Option<Vec<Baseline>>>(Method::GET, "/baselines")
            .await
            .map(Option::unwrap_or_default)
    }

    pub async fn get_latest_results(&self) -> ApiResult<Vec<serde_json::Value>> {
        self.request::<Option<Vec<serde_json::Value>>>(Method::GET, "/results/latest")
            .await
            .map(Option::unwrap_or_default)
    }

    /// Run a scanner once; the response body is passed through untouched.
    pub async fn trigger_scan(&self, plugin: &str) -> ApiResult<serde_json::Value> {
        self.request(Method::POST, &format!("/scanners/trigger/{plugin}"))
            .await
    }

    pub async fn get_signatures_status(&self) -> ApiResult<SignatureStatus> {
        self.request(Method::GET, "/signatures/status").await
    }

    pub async fn trigger_signatures_update(&self) -> ApiResult<SignatureStatus> {
        self.request(Method::POST, "/signatures/update").await
    }

    pub async fn get_metrics_text(&self) -> ApiResult<String> {
        self.request_text(Method::GET, "/metrics").await
    }
}
