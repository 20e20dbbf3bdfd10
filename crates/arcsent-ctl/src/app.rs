//! Command execution.
//!
//! Wires the credential store, HTTP client and status aggregator together
//! and turns each CLI command into rendered text.

use std::sync::Arc;

use tokio::time::MissedTickBehavior;
use tracing::{debug, info, warn};

use arcsent_client::{
    ApiClient, CredentialProvider, DynCredentialProvider, DynDashboardApi, FileCredentialStore, MemoryCredentialStore,
};
use arcsent_dashboard::{RefreshableResource, StatusAggregator};
use arcsent_telemetry::Metrics;

use crate::cli::{Command, SignaturesAction, TokenAction};
use crate::config::AppConfig;
use crate::error::{AppError, AppResult};
use crate::render;

/// Unwrap a settled resource, turning stored error text into an `AppError`.
fn settled<T: Clone>(resource: &'static str, state: RefreshableResource<T>) -> AppResult<T> {
    if let Some(message) = state.error() {
        return Err(AppError::Refresh {
            resource,
            message: message.to_string(),
        });
    }
    state.value().cloned().ok_or_else(|| AppError::Refresh {
        resource,
        message: "no data received".to_string(),
    })
}

/// Show only the first and last two characters of a token.
fn mask_token(token: &str) -> String {
    let chars: Vec<char> = token.chars().collect();
    if chars.len() <= 4 {
        return "*".repeat(chars.len());
    }
    let head: String = chars[..2].iter().collect();
    let tail: String = chars[chars.len() - 2..].iter().collect();
    format!("{head}{}{tail}", "*".repeat(chars.len() - 4))
}

/// Main application.
pub struct Application {
    config: AppConfig,
    credentials: DynCredentialProvider,
    api: DynDashboardApi,
    aggregator: StatusAggregator,
    /// Credential given on the command line; changes to it are not persisted.
    ephemeral_credential: bool,
}

impl Application {
    /// Build the application against the configured daemon.
    ///
    /// `token` (from `--token` or `ARCSENT_TOKEN`) replaces the credential
    /// file for this process.
    pub fn new(config: AppConfig, token: Option<String>) -> AppResult<Self> {
        let ephemeral_credential = token.is_some();
        let credentials: DynCredentialProvider = match token {
            Some(token) => {
                debug!("Using in-memory credential");
                Arc::new(MemoryCredentialStore::with_token(token))
            }
            None => {
                debug!(path = %config.credential.path.display(), "Using credential file");
                Arc::new(FileCredentialStore::new(config.credential.path.clone()))
            }
        };

        let client = ApiClient::with_timeout(
            config.api.base_url.clone(),
            credentials.clone(),
            config.api.timeout(),
        )?;
        info!(base_url = %client.base_url(), "API client ready");

        let mut app = Self::with_api(config, credentials, Arc::new(client));
        app.ephemeral_credential = ephemeral_credential;
        Ok(app)
    }

    /// Build the application on an existing API backend.
    pub fn with_api(
        config: AppConfig,
        credentials: DynCredentialProvider,
        api: DynDashboardApi,
    ) -> Self {
        let aggregator = StatusAggregator::new(api.clone(), credentials.clone());
        Self {
            config,
            credentials,
            api,
            aggregator,
            ephemeral_credential: false,
        }
    }

    pub fn aggregator(&self) -> &StatusAggregator {
        &self.aggregator
    }

    /// Run a command, printing its output to stdout.
    pub async fn run(&self, command: Command) -> AppResult<()> {
        if matches!(command, Command::Dashboard { watch: true }) {
            return self.watch().await;
        }
        let output = self.execute(&command).await?;
        println!("{output}");
        Ok(())
    }

    /// Run a one-shot command and return its rendered output.
    pub async fn execute(&self, command: &Command) -> AppResult<String> {
        match command {
            Command::Dashboard { .. } => {
                self.aggregator.refresh_all().await;
                Ok(render::render_dashboard(&self.aggregator.view()))
            }
            Command::Status => {
                self.aggregator.refresh_status().await;
                let status = settled("status", self.aggregator.status())?;
                Ok(render::render_status(&status))
            }
            Command::Scanners => {
                self.aggregator.refresh_scanners().await;
                let scanners = settled("scanners", self.aggregator.scanners())?;
                Ok(render::render_scanners(&scanners))
            }
            Command::Findings => {
                self.aggregator.refresh_findings().await;
                let findings = settled("findings", self.aggregator.findings())?;
                Ok(render::render_findings(&findings))
            }
            Command::Baselines => {
                self.aggregator.refresh_baselines().await;
                let baselines = settled("baselines", self.aggregator.baselines())?;
                Ok(render::render_baselines(&baselines))
            }
            Command::Results => {
                let results = self.api.latest_results().await?;
                Ok(serde_json::to_string_pretty(&results)?)
            }
            Command::Trigger { plugins } => self.trigger(plugins).await,
            Command::Signatures { action } => {
                match action {
                    SignaturesAction::Status => self.aggregator.refresh_signatures().await,
                    SignaturesAction::Update => self.aggregator.trigger_signature_update().await,
                }
                let status = settled("signatures", self.aggregator.signatures())?;
                Ok(render::render_signatures(&status))
            }
            Command::Metrics { client } => {
                self.aggregator.refresh_metrics().await;
                let snapshot = settled("metrics", self.aggregator.metrics())?;
                let mut out = render::render_metrics(&snapshot);
                if *client {
                    out.push_str("\n\n# arcsent-ctl\n");
                    out.push_str(Metrics::render()?.trim_end());
                }
                Ok(out)
            }
            Command::Token { action } => self.token(action),
            Command::Logout => {
                self.aggregator.logout().await?;
                Ok(format!(
                    "Logged out\n{}",
                    render::render_dashboard(&self.aggregator.view())
                ))
            }
        }
    }

    async fn trigger(&self, plugins: &[String]) -> AppResult<String> {
        let results = self.aggregator.trigger_scans(plugins).await;

        let mut failed = 0;
        let lines: Vec<String> = plugins
            .iter()
            .zip(&results)
            .map(|(plugin, result)| match result {
                Some(_) => format!("{plugin}: triggered"),
                None => {
                    failed += 1;
                    format!("{plugin}: failed")
                }
            })
            .collect();

        if failed > 0 {
            return Err(AppError::TriggerFailed {
                failed,
                total: plugins.len(),
            });
        }
        Ok(lines.join("\n"))
    }

    fn token(&self, action: &TokenAction) -> AppResult<String> {
        if self.ephemeral_credential && !matches!(action, TokenAction::Show) {
            warn!("Credential was supplied on the command line; change is not persisted");
        }

        match action {
            TokenAction::Set { value } => {
                self.credentials.set(value)?;
                Ok("Token stored".to_string())
            }
            TokenAction::Clear => {
                self.credentials.clear()?;
                Ok("Token cleared".to_string())
            }
            TokenAction::Show => Ok(match self.credentials.get()? {
                Some(token) if !token.is_empty() => format!("Token: {}", mask_token(&token)),
                _ => "No token stored".to_string(),
            }),
        }
    }

    /// Re-render the dashboard at the configured interval until Ctrl-C.
    async fn watch(&self) -> AppResult<()> {
        let mut ticker = tokio::time::interval(self.config.dashboard.watch_interval());
        ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);

        if !self.config.dashboard.refresh_on_start {
            ticker.tick().await;
            println!("{}\n", render::render_dashboard(&self.aggregator.view()));
        }

        info!(
            interval_secs = self.config.dashboard.watch_interval().as_secs(),
            "Watching dashboard"
        );
        let shutdown = tokio::signal::ctrl_c();
        tokio::pin!(shutdown);
        loop {
            tokio::select! {
                _ = ticker.tick() => {
                    // A hung daemon must not delay shutdown
                    tokio::select! {
                        _ = self.aggregator.refresh_all() => {
                            println!("{}\n", render::render_dashboard(&self.aggregator.view()));
                        }
                        result = &mut shutdown => {
                            result?;
                            info!("Shutdown signal received during refresh");
                            return Ok(());
                        }
                    }
                }
                result = &mut shutdown => {
                    result?;
                    info!("Shutdown signal received");
                    return Ok(());
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use arcsent_client::{ApiError, MockDashboardApi};
    use arcsent_core::{SignatureSourceStatus, SignatureStatus, SystemStatus};

    fn setup() -> (Arc<MockDashboardApi>, Arc<MemoryCredentialStore>, Application) {
        let api = Arc::new(MockDashboardApi::new());
        let creds = Arc::new(MemoryCredentialStore::with_token("s3cret-token"));
        let app = Application::with_api(AppConfig::default(), creds.clone(), api.clone());
        (api, creds, app)
    }

    fn signatures() -> SignatureStatus {
        let mut status = SignatureStatus::default();
        for (name, err) in [("clamav", None), ("yara", Some("timeout")), ("sigma", None)] {
            status.sources.insert(
                name.to_string(),
                SignatureSourceStatus {
                    source: name.to_string(),
                    error: err.map(str::to_string),
                    ..Default::default()
                },
            );
        }
        status
    }

    #[tokio::test]
    async fn test_dashboard_renders_all_cards() {
        let (api, _, app) = setup();
        api.set_status(Ok(SystemStatus {
            status: "running".to_string(),
            running_as_root: true,
            version: String::new(),
        }));
        api.set_signatures(Ok(signatures()));
        api.set_metrics_text(Ok("arcsent_plugins_total 4\narcsent_jobs_total x\n".to_string()));

        let out = app
            .execute(&Command::Dashboard { watch: false })
            .await
            .unwrap();

        assert!(out.contains("Status:     running"));
        assert!(out.contains("Running as root (Warning)"));
        assert!(out.contains("2 ok / 1 failed"));
        assert!(out.contains("Plugins:    4"));
        assert!(out.contains("Jobs:       —"));
    }

    #[tokio::test]
    async fn test_dashboard_shows_resource_error() {
        let (api, _, app) = setup();
        api.set_metrics_text(Err(ApiError::Unauthorized));

        let out = app
            .execute(&Command::Dashboard { watch: false })
            .await
            .unwrap();
        assert!(out.contains("Error:      Unauthorized"));
    }

    #[tokio::test]
    async fn test_single_resource_error_surfaces() {
        let (api, _, app) = setup();
        api.set_findings(Err(ApiError::RequestFailed("Internal Server Error".into())));

        let err = app.execute(&Command::Findings).await.unwrap_err();
        assert_eq!(
            err.to_string(),
            "Failed to refresh findings: Request failed: Internal Server Error"
        );
    }

    #[tokio::test]
    async fn test_status_failure_reports_no_data() {
        let (api, _, app) = setup();
        api.set_status(Err(ApiError::Transport("refused".into())));

        let err = app.execute(&Command::Status).await.unwrap_err();
        assert!(matches!(err, AppError::Refresh { resource: "status", .. }));
    }

    #[tokio::test]
    async fn test_trigger_partial_failure() {
        let (api, _, app) = setup();
        api.fail_plugin("yara", ApiError::Unauthorized);

        let ok = app
            .execute(&Command::Trigger {
                plugins: vec!["clamav".to_string()],
            })
            .await
            .unwrap();
        assert_eq!(ok, "clamav: triggered");

        let err = app
            .execute(&Command::Trigger {
                plugins: vec!["clamav".to_string(), "yara".to_string()],
            })
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::TriggerFailed { failed: 1, total: 2 }));
        assert!(!app.aggregator().is_scan_loading("yara"));
    }

    #[tokio::test]
    async fn test_signature_update_command() {
        let (api, _, app) = setup();
        api.set_signatures_update(Ok(signatures()));

        let out = app
            .execute(&Command::Signatures {
                action: SignaturesAction::Update,
            })
            .await
            .unwrap();
        assert!(out.contains("FAILED: timeout"));
        assert_eq!(api.call_count("POST /signatures/update"), 1);
    }

    #[tokio::test]
    async fn test_results_pretty_json() {
        let (api, _, app) = setup();
        api.set_latest_results(Ok(vec![serde_json::json!({"plugin": "clamav"})]));

        let out = app.execute(&Command::Results).await.unwrap();
        assert!(out.contains("\"plugin\": \"clamav\""));
    }

    #[tokio::test]
    async fn test_token_commands() {
        let (_, creds, app) = setup();

        let shown = app
            .execute(&Command::Token {
                action: TokenAction::Show,
            })
            .await
            .unwrap();
        assert_eq!(shown, "Token: s3********en");

        app.execute(&Command::Token {
            action: TokenAction::Set {
                value: "fresh".to_string(),
            },
        })
        .await
        .unwrap();
        assert_eq!(creds.get().unwrap().as_deref(), Some("fresh"));

        app.execute(&Command::Token {
            action: TokenAction::Clear,
        })
        .await
        .unwrap();
        let shown = app
            .execute(&Command::Token {
                action: TokenAction::Show,
            })
            .await
            .unwrap();
        assert_eq!(shown, "No token stored");
    }

    #[tokio::test]
    async fn test_logout_clears_and_reloads() {
        let (api, creds, app) = setup();

        let out = app.execute(&Command::Logout).await.unwrap();

        assert!(out.starts_with("Logged out"));
        assert_eq!(creds.get().unwrap(), None);
        assert_eq!(api.call_count("GET /signatures/status"), 1);
    }

    #[tokio::test]
    async fn test_metrics_with_client_counters() {
        let (api, _, app) = setup();
        api.set_metrics_text(Ok("arcsent_up 1\nbogus line here\n".to_string()));

        let plain = app
            .execute(&Command::Metrics { client: false })
            .await
            .unwrap();
        assert_eq!(plain.trim(), format!("{:<32} 1", "arcsent_up"));

        let out = app
            .execute(&Command::Metrics { client: true })
            .await
            .unwrap();
        assert!(out.contains("# arcsent-ctl"));
        assert!(out.contains("arcsent_dashboard_refresh_total"));
        assert!(out.contains("arcsent_dashboard_exposition_dropped_lines_total"));
    }

    #[test]
    fn test_mask_token() {
        assert_eq!(mask_token("abcd"), "****");
        assert_eq!(mask_token("abcdef"), "ab**ef");
        assert_eq!(mask_token(""), "");
    }
}
