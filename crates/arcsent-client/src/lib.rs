//! Authenticated REST client for the ArcSent daemon.
//!
//! - `ApiClient`: reqwest-based client with typed error mapping
//! - `CredentialProvider`: injected source of the `Authorization` token
//! - `DashboardApi`: trait seam consumed by the dashboard aggregator

pub mod api;
pub mod client;
pub mod credential;
pub mod error;

pub use api::{BoxFuture, DashboardApi, DynDashboardApi, MockDashboardApi};
pub use client::{status_error, ApiClient, API_BASE_PATH};
pub use credential::{
    CredentialProvider, DynCredentialProvider, FileCredentialStore, MemoryCredentialStore,
    CREDENTIAL_KEY,
};
pub use error::{ApiError, ApiResult};
