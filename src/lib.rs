//! gitea-tf - Declarative management of Gitea push mirrors and access tokens
//!
//! Resources are described in a manifest, compared against a local state
//! file and reconciled through the Gitea API, Terraform style.
//!
//! # Resource types
//!
//! - `gitea_push_mirror`: a push mirror of a repository
//! - `gitea_token`: an access token of a user
//!
//! # Example
//!
//! ```bash
//! # Show what would change
//! gitea-tf plan --base-url https://gitea.example.com
//!
//! # Apply without prompting
//! gitea-tf apply -y
//!
//! # Adopt an existing push mirror
//! gitea-tf import gitea_push_mirror.backup org/app/remote_mirror_abc
//!
//! # Inspect the state as YAML
//! gitea-tf show -o yaml
//! ```

pub mod cli;
pub mod config;
pub mod error;
pub mod gitea;
pub mod manifest;
pub mod output;
pub mod provider;
pub mod state;
pub mod ui;

pub use cli::{Cli, Command, OutputFormat};
pub use error::{GiteaError, Result};
pub use gitea::{Auth, GiteaClient, ProviderConfig, ProviderResolver, ProviderSettings};
pub use manifest::{DesiredResource, Manifest};
pub use provider::commands::{
    run_apply_command, run_destroy_command, run_import_command, run_plan_command,
    run_refresh_command, run_schema_command, run_show_command,
};
pub use provider::{Action, Plan, ResourceData, ResourceKind};
pub use state::{StateFile, StateStore};
