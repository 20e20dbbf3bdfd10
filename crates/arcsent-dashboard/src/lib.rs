//! ArcSent dashboard state.
//!
//! Holds one independently refreshable resource per daemon data source and
//! derives the values the renderers display:
//! - `StatusAggregator`: refresh/trigger operations and state snapshots
//! - `RefreshableResource`: value, loading flag and error text per source
//! - `view`: derived labels and counts for the dashboard cards
//! - `DashboardConfig`: refresh behaviour

pub mod aggregator;
pub mod config;
pub mod resource;
pub mod view;

pub use aggregator::StatusAggregator;
pub use config::DashboardConfig;
pub use resource::{RefreshableResource, ResourceState};
pub use view::{metric_label, privilege_label, status_label, DashboardView, SignatureSummary};
