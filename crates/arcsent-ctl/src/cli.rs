//! Command-line interface.

use clap::{Parser, Subcommand};

/// ArcSent dashboard and control client
#[derive(Parser, Debug)]
#[command(name = "arcsent-ctl", version, about, long_about = None)]
pub struct Cli {
    /// Configuration file path (can also be set via ARCSENT_CONFIG env var)
    #[arg(short, long)]
    pub config: Option<String>,

    /// API token, kept in memory only (can also be set via ARCSENT_TOKEN env var)
    #[arg(long)]
    pub token: Option<String>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Show system, signature and metrics cards
    Dashboard {
        /// Re-render at the configured interval until interrupted
        #[arg(short, long)]
        watch: bool,
    },
    /// Show daemon status
    Status,
    /// List scanner plugins and job states
    Scanners,
    /// List findings
    Findings,
    /// List learned baselines
    Baselines,
    /// Print the latest raw scan results
    Results,
    /// Trigger one or more scanners
    Trigger {
        #[arg(required = true)]
        plugins: Vec<String>,
    },
    /// Signature feed status and updates
    Signatures {
        #[command(subcommand)]
        action: SignaturesAction,
    },
    /// Show daemon metrics
    Metrics {
        /// Also print this client's own refresh counters
        #[arg(long)]
        client: bool,
    },
    /// Manage the stored API token
    Token {
        #[command(subcommand)]
        action: TokenAction,
    },
    /// Clear the stored token and reload the dashboard
    Logout,
}

#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum SignaturesAction {
    /// Show per-source signature status
    Status,
    /// Ask the daemon to update signatures now
    Update,
}

#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum TokenAction {
    /// Store a token
    Set { value: String },
    /// Remove the stored token
    Clear,
    /// Show whether a token is stored (masked)
    Show,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_trigger_many() {
        let cli = Cli::try_parse_from(["arcsent-ctl", "trigger", "clamav", "rkhunter"]).unwrap();
        assert_eq!(
            cli.command,
            Command::Trigger {
                plugins: vec!["clamav".to_string(), "rkhunter".to_string()]
            }
        );
    }

    #[test]
    fn test_trigger_requires_plugin() {
        assert!(Cli::try_parse_from(["arcsent-ctl", "trigger"]).is_err());
    }

    #[test]
    fn test_global_flags() {
        let cli = Cli::try_parse_from([
            "arcsent-ctl",
            "--config",
            "/etc/arcsent/ctl.toml",
            "--token",
            "s3cret",
            "dashboard",
            "--watch",
        ])
        .unwrap();

        assert_eq!(cli.config.as_deref(), Some("/etc/arcsent/ctl.toml"));
        assert_eq!(cli.token.as_deref(), Some("s3cret"));
        assert_eq!(cli.command, Command::Dashboard { watch: true });
    }

    #[test]
    fn test_metrics_client_flag() {
        let cli = Cli::try_parse_from(["arcsent-ctl", "metrics", "--client"]).unwrap();
        assert_eq!(cli.command, Command::Metrics { client: true });

        let cli = Cli::try_parse_from(["arcsent-ctl", "metrics"]).unwrap();
        assert_eq!(cli.command, Command::Metrics { client: false });
    }

    #[test]
    fn test_nested_subcommands() {
        let cli = Cli::try_parse_from(["arcsent-ctl", "signatures", "update"]).unwrap();
        assert_eq!(
            cli.command,
            Command::Signatures {
                action: SignaturesAction::Update
            }
        );

        let cli = Cli::try_parse_from(["arcsent-ctl", "token", "set", "abc"]).unwrap();
        assert_eq!(
            cli.command,
            Command::Token {
                action: TokenAction::Set {
                    value: "abc".to_string()
                }
            }
        );
    }
}
