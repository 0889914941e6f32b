//! CLI argument parsing

mod common;

use clap::{Parser, Subcommand};
use std::path::PathBuf;

use crate::config::defaults;
use crate::gitea::ProviderSettings;

pub use common::OutputFormat;

/// Declarative management of Gitea push mirrors and access tokens
#[derive(Parser, Debug)]
#[command(name = "gitea-tf")]
#[command(version)]
#[command(
    about = "Manage Gitea push mirrors and access tokens from a manifest",
    long_about = None
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    /// Gitea base URL, e.g. https://gitea.example.com
    #[arg(long, global = true)]
    pub base_url: Option<String>,

    /// API token (overrides env vars, manifest and credentials file)
    #[arg(short = 't', long, global = true)]
    pub token: Option<String>,

    /// Username for HTTP Basic auth (required by the token endpoints)
    #[arg(short = 'u', long, global = true)]
    pub username: Option<String>,

    /// Password for HTTP Basic auth
    #[arg(short = 'p', long, global = true)]
    pub password: Option<String>,

    /// Skip TLS certificate verification
    #[arg(long, global = true, default_value_t = false)]
    pub insecure: bool,

    /// Manifest describing the desired resources
    #[arg(
        short = 'f',
        long,
        global = true,
        env = defaults::MANIFEST_ENV,
        default_value = defaults::MANIFEST
    )]
    pub file: PathBuf,

    /// State file
    #[arg(
        short = 's',
        long,
        global = true,
        env = defaults::STATE_FILE_ENV,
        default_value = defaults::STATE_FILE
    )]
    pub state: PathBuf,

    /// Log level (error, warn, info, debug, trace)
    #[arg(short, long, global = true, default_value = defaults::LOG_LEVEL)]
    pub log_level: String,

    /// Batch mode: no spinners, no prompts (apply/destroy then need -y)
    #[arg(long, global = true, default_value_t = false)]
    pub batch: bool,
}

impl Cli {
    /// Provider settings given on the command line
    pub fn provider_settings(&self) -> ProviderSettings {
        ProviderSettings {
            base_url: self.base_url.clone(),
            token: self.token.clone(),
            username: self.username.clone(),
            password: self.password.clone(),
            insecure: self.insecure.then_some(true),
        }
    }
}

/// Available commands
#[derive(Subcommand, Debug)]
pub enum Command {
    /// Show what apply would change
    Plan {
        /// Compare against the recorded state without reading from Gitea first
        #[arg(long, default_value_t = false)]
        no_refresh: bool,
    },

    /// Create, update and delete resources to match the manifest
    Apply {
        /// Compare against the recorded state without reading from Gitea first
        #[arg(long, default_value_t = false)]
        no_refresh: bool,

        /// Skip confirmation prompt
        #[arg(short = 'y', long, default_value_t = false)]
        yes: bool,
    },

    /// Read every managed resource from Gitea and update the state
    Refresh,

    /// Delete every resource recorded in the state
    Destroy {
        /// Skip confirmation prompt
        #[arg(short = 'y', long, default_value_t = false)]
        yes: bool,
    },

    /// Bring an existing Gitea object under management
    ///
    ///   gitea_push_mirror  ID is OWNER/REPO/REMOTE_NAME
    ///   gitea_token        ID is the numeric token ID
    #[command(verbatim_doc_comment)]
    Import {
        /// Manifest address, e.g. gitea_token.ci
        address: String,

        /// Remote object ID
        id: String,
    },

    /// Show the resources recorded in the state
    #[command(visible_alias = "state")]
    Show {
        /// Output format
        #[arg(short, long, value_enum, default_value_t = OutputFormat::Table)]
        output: OutputFormat,

        /// Print sensitive values instead of masking them
        #[arg(long, default_value_t = false)]
        show_sensitive: bool,
    },

    /// Describe the supported resource types
    Schema {
        /// Only this resource type
        resource_type: Option<String>,

        /// Output format
        #[arg(short, long, value_enum, default_value_t = OutputFormat::Table)]
        output: OutputFormat,
    },
}

impl Command {
    /// Whether the command talks to the Gitea API
    pub fn needs_provider(&self) -> bool {
        !matches!(self, Command::Show { .. } | Command::Schema { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_default_values() {
        let cli = Cli::parse_from(["gitea-tf", "plan"]);
        assert_eq!(cli.file, PathBuf::from(defaults::MANIFEST));
        assert_eq!(cli.state, PathBuf::from(defaults::STATE_FILE));
        assert_eq!(cli.log_level, defaults::LOG_LEVEL);
        assert!(!cli.batch);
        assert!(!cli.insecure);
        assert!(cli.base_url.is_none());
        assert!(matches!(cli.command, Command::Plan { no_refresh: false }));
    }

    #[test]
    fn test_global_flags_after_subcommand() {
        let cli = Cli::parse_from([
            "gitea-tf",
            "apply",
            "-y",
            "--base-url",
            "https://git.example.com",
            "-f",
            "infra/gitea.yaml",
            "--batch",
        ]);
        assert!(matches!(
            cli.command,
            Command::Apply {
                yes: true,
                no_refresh: false
            }
        ));
        assert_eq!(cli.base_url.as_deref(), Some("https://git.example.com"));
        assert_eq!(cli.file, PathBuf::from("infra/gitea.yaml"));
        assert!(cli.batch);
    }

    #[test]
    fn test_import_args() {
        let cli = Cli::parse_from(["gitea-tf", "import", "gitea_token.ci", "42"]);
        let Command::Import { address, id } = cli.command else {
            panic!("expected import");
        };
        assert_eq!(address, "gitea_token.ci");
        assert_eq!(id, "42");
    }

    #[test]
    fn test_show_alias_and_format() {
        let cli = Cli::parse_from(["gitea-tf", "state", "-o", "yaml"]);
        assert!(matches!(
            cli.command,
            Command::Show {
                output: OutputFormat::Yaml,
                show_sensitive: false
            }
        ));
    }

    #[test]
    fn test_provider_settings_from_flags() {
        let cli = Cli::parse_from([
            "gitea-tf",
            "refresh",
            "-u",
            "alice",
            "-p",
            "secret",
            "--insecure",
        ]);
        let settings = cli.provider_settings();
        assert_eq!(settings.username.as_deref(), Some("alice"));
        assert_eq!(settings.password.as_deref(), Some("secret"));
        assert_eq!(settings.insecure, Some(true));
        assert!(settings.token.is_none());
    }

    #[test]
    fn test_insecure_unset_defers_to_other_sources() {
        let cli = Cli::parse_from(["gitea-tf", "refresh"]);
        assert_eq!(cli.provider_settings().insecure, None);
    }

    #[test]
    fn test_needs_provider() {
        assert!(Command::Refresh.needs_provider());
        assert!(!Command::Schema {
            resource_type: None,
            output: OutputFormat::Table
        }
        .needs_provider());
    }

    #[test]
    fn test_missing_subcommand_is_error() {
        assert!(Cli::try_parse_from(["gitea-tf"]).is_err());
    }
}
