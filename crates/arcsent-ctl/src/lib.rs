//! `arcsent-ctl`: terminal dashboard and control client for the ArcSent daemon.
//!
//! - `cli`: command-line arguments
//! - `config`: TOML configuration with defaults
//! - `app`: command execution over the status aggregator
//! - `render`: plain-text cards

pub mod app;
pub mod cli;
pub mod config;
pub mod error;
pub mod render;

pub use app::Application;
pub use cli::{Cli, Command};
pub use config::{AppConfig, DEFAULT_CONFIG_PATH};
pub use error::{AppError, AppResult};
