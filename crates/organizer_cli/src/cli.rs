//! Command line definition for github-organizer.
//!
//! ```bash
//! # Show the effective settings of one repository
//! github-organizer settings my-org api
//!
//! # Preview what a full organization run would change
//! github-organizer --dry-run update-repos my-org
//!
//! # Put an issue on the configured project board
//! github-organizer assign-issue my-org api 42
//! ```

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

#[cfg(test)]
#[path = "cli_tests.rs"]
mod tests;

/// github-organizer: Keep the repositories of a GitHub organization in line with a YAML
/// configuration document.
#[derive(Parser, Debug)]
#[command(name = "github-organizer")]
#[command(about = "Reconcile GitHub organization settings with a configuration document", long_about = None)]
pub struct Cli {
    /// Path to the organizer TOML file (defaults to ./organizer.toml)
    #[arg(long, global = true)]
    pub config: Option<String>,

    /// Plan changes without applying them
    #[arg(long, global = true)]
    pub dry_run: bool,

    /// Write logs as JSON
    #[arg(long, global = true)]
    pub json_logs: bool,

    #[command(flatten)]
    pub credentials: CredentialArgs,

    #[command(subcommand)]
    pub command: Commands,
}

/// GitHub credentials given on the command line or in the environment.
#[derive(Args, Debug, Clone, Default, PartialEq, Eq)]
pub struct CredentialArgs {
    /// GitHub App id
    #[arg(long, env = "GITHUB_APP_ID", global = true)]
    pub app_id: Option<u64>,

    /// Path to the GitHub App private key (PEM)
    #[arg(long, env = "GITHUB_PRIVATE_KEY_PATH", global = true)]
    pub private_key_path: Option<PathBuf>,

    /// GitHub App private key (PEM)
    #[arg(long, env = "GITHUB_PRIVATE_KEY", hide_env_values = true, global = true)]
    pub private_key: Option<String>,

    /// Personal access token, used when no App id is configured
    #[arg(long, env = "GITHUB_TOKEN", hide_env_values = true, global = true)]
    pub token: Option<String>,
}

#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum Commands {
    /// Print the configuration document, or the effective settings of one repository
    Settings { org: String, repo: Option<String> },

    /// Print the operations a repository update would apply
    Plan { org: String, repo: String },

    /// Reconcile one repository
    UpdateRepo { org: String, repo: String },

    /// Reconcile every repository of an organization
    UpdateRepos { org: String },

    /// Reconcile team access to the organization's repositories
    UpdateTeamRepos { org: String },

    /// Reconcile the membership of one configured team
    UpdateTeamMembership { org: String, team: String },

    /// Reconcile the membership of every configured team
    UpdateOrgTeamMembership { org: String },

    /// List the repositories the organizer manages
    ListRepos { org: String },

    /// List the organization's project boards
    ListOrgProjects { org: String },

    /// Look up an organization project by name
    GetOrgProject { org: String, project: String },

    /// Look up a column of an organization project
    GetOrgProjectColumn {
        org: String,
        project: String,
        column: String,
    },

    /// Look up a repository project by name
    GetRepoProject {
        org: String,
        repo: String,
        project: String,
    },

    /// Reconcile the branch protection of one repository
    UpdateBranchProtection { org: String, repo: String },

    /// Put an issue on the configured project board
    AssignIssue { org: String, repo: String, issue: u64 },

    /// Apply the configured labels to an issue
    LabelIssue { org: String, repo: String, issue: u64 },

    /// List the installations of the GitHub App
    AppInfo,

    /// Show the GitHub App installation of one organization
    OrgInfo { org: String },

    /// Show the CLI version
    Version,
}

impl Commands {
    /// Returns the organization a command works on.
    pub fn organization(&self) -> Option<&str> {
        match self {
            Commands::Settings { org, .. }
            | Commands::Plan { org, .. }
            | Commands::UpdateRepo { org, .. }
            | Commands::UpdateRepos { org }
            | Commands::UpdateTeamRepos { org }
            | Commands::UpdateTeamMembership { org, .. }
            | Commands::UpdateOrgTeamMembership { org }
            | Commands::ListRepos { org }
            | Commands::ListOrgProjects { org }
            | Commands::GetOrgProject { org, .. }
            | Commands::GetOrgProjectColumn { org, .. }
            | Commands::GetRepoProject { org, .. }
            | Commands::UpdateBranchProtection { org, .. }
            | Commands::AssignIssue { org, .. }
            | Commands::LabelIssue { org, .. }
            | Commands::OrgInfo { org } => Some(org),
            Commands::AppInfo | Commands::Version => None,
        }
    }
}
