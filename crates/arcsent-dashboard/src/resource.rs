//! Independently refreshable unit of dashboard state.

use chrono::{DateTime, Utc};
use serde::Serialize;

/// Lifecycle of one resource.
///
/// `Idle → Loading → {Success, Failed}`; terminal states go back to
/// `Loading` only through an explicit refresh.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ResourceState {
    Idle,
    Loading,
    Success,
    Failed,
}

/// Value, loading flag and error text for one data source.
///
/// A refresh always ends by clearing `loading` and applying exactly one
/// terminal update: success replaces `value` and clears `error`, failure sets
/// `error` and keeps the previous `value`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RefreshableResource<T> {
    value: Option<T>,
    loading: bool,
    error: Option<String>,
    /// When `value` was last replaced.
    updated_at: Option<DateTime<Utc>>,
}

impl<T> Default for RefreshableResource<T> {
    fn default() -> Self {
        Self {
            value: None,
            loading: false,
            error: None,
            updated_at: None,
        }
    }
}

impl<T> RefreshableResource<T> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn value(&self) -> Option<&T> {
        self.value.as_ref()
    }

    pub fn is_loading(&self) -> bool {
        self.loading
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub fn updated_at(&self) -> Option<DateTime<Utc>> {
        self.updated_at
    }

    pub fn state(&self) -> ResourceState {
        if self.loading {
            ResourceState::Loading
        } else if self.error.is_some() {
            ResourceState::Failed
        } else if self.value.is_some() {
            ResourceState::Success
        } else {
            ResourceState::Idle
        }
    }

    /// Enter `Loading`. Value and error stay visible until the refresh settles.
    pub(crate) fn begin(&mut self) {
        self.loading = true;
    }

    pub(crate) fn succeed(&mut self, value: T) {
        self.value = Some(value);
        self.error = None;
        self.loading = false;
        self.updated_at = Some(Utc::now());
    }

    pub(crate) fn fail(&mut self, message: impl Into<String>) {
        self.error = Some(message.into());
        self.loading = false;
    }

    /// Leave `Loading` without recording an error.
    pub(crate) fn settle(&mut self) {
        self.loading = false;
    }

    pub(crate) fn reset(&mut self) {
        *self = Self::default();
    }
}
