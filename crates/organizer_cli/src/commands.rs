//! Command modules for the github-organizer CLI.
//!
//! - `app_cmd`: GitHub App installation details
//! - `issue_cmd`: issue labelling and project assignment
//! - `project_cmd`: project board lookups
//! - `settings_cmd`: configuration, plan and repository listing output
//! - `update_cmd`: reconciliation runs

use std::sync::Arc;

use organizer_core::Organizer;
use serde::Serialize;
use tracing::{debug, instrument};

use crate::auth::{app_client, organization_client};
use crate::cli::{Cli, Commands};
use crate::config::AppConfig;
use crate::errors::Error;

pub mod app_cmd;
pub mod issue_cmd;
pub mod project_cmd;
pub mod settings_cmd;
pub mod update_cmd;

/// Runs the command selected on the command line.
#[instrument(skip(cli), fields(command = ?cli.command))]
pub async fn execute(cli: &Cli) -> Result<(), Error> {
    if cli.command == Commands::Version {
        println!(
            "github-organizer version {}",
            option_env!("ORGANIZER_VERSION").unwrap_or(env!("CARGO_PKG_VERSION"))
        );
        return Ok(());
    }

    let mut config = AppConfig::load_or_default(cli.config.as_deref())?;
    config.github.apply_overrides(&cli.credentials);
    let credentials = config.github.credentials()?;

    let Some(org) = cli.command.organization() else {
        let client = app_client(&credentials).await?;
        return app_cmd::app_info(&client).await;
    };

    if let Commands::OrgInfo { org } = &cli.command {
        let client = app_client(&credentials).await?;
        return app_cmd::org_info(&client, org).await;
    }

    let client = organization_client(&credentials, org).await?;
    let organizer = Organizer::new(Arc::new(client))
        .with_loader(config.loader())
        .with_cache_policy(config.cache.policy())
        .with_dry_run(cli.dry_run);
    debug!(org = org, dry_run = cli.dry_run, "Organizer ready");

    match &cli.command {
        Commands::Settings { org, repo } => {
            settings_cmd::settings(&organizer, org, repo.as_deref()).await
        }
        Commands::Plan { org, repo } => settings_cmd::plan(&organizer, org, repo).await,
        Commands::ListRepos { org } => settings_cmd::list_repos(&organizer, org).await,
        Commands::UpdateRepo { org, repo } => {
            update_cmd::update_repo(&organizer, org, repo).await
        }
        Commands::UpdateRepos { org } => update_cmd::update_repos(&organizer, org).await,
        Commands::UpdateTeamRepos { org } => {
            update_cmd::update_team_repos(&organizer, org).await
        }
        Commands::UpdateTeamMembership { org, team } => {
            update_cmd::update_team_membership(&organizer, org, team).await
        }
        Commands::UpdateOrgTeamMembership { org } => {
            update_cmd::update_org_team_membership(&organizer, org).await
        }
        Commands::UpdateBranchProtection { org, repo } => {
            update_cmd::update_branch_protection(&organizer, org, repo).await
        }
        Commands::ListOrgProjects { org } => {
            project_cmd::list_org_projects(&organizer, org).await
        }
        Commands::GetOrgProject { org, project } => {
            project_cmd::get_org_project(&organizer, org, project).await
        }
        Commands::GetOrgProjectColumn {
            org,
            project,
            column,
        } => project_cmd::get_org_project_column(&organizer, org, project, column).await,
        Commands::GetRepoProject { org, repo, project } => {
            project_cmd::get_repo_project(&organizer, org, repo, project).await
        }
        Commands::AssignIssue { org, repo, issue } => {
            issue_cmd::assign_issue(&organizer, org, repo, *issue).await
        }
        Commands::LabelIssue { org, repo, issue } => {
            issue_cmd::label_issue(&organizer, org, repo, *issue).await
        }
        Commands::AppInfo | Commands::OrgInfo { .. } | Commands::Version => Ok(()),
    }
}

/// Renders `value` as pretty printed JSON.
pub fn to_json<T: Serialize + ?Sized>(value: &T) -> Result<String, Error> {
    serde_json::to_string_pretty(value).map_err(|e| Error::Output(e.to_string()))
}
