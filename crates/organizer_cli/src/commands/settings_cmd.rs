//! Read-only views of an organization's configuration.
//!
//! ```bash
//! github-organizer settings my-org          # the whole document
//! github-organizer settings my-org api      # effective settings of one repository
//! github-organizer plan my-org api          # operations an update would apply
//! github-organizer list-repos my-org
//! ```

use config_manager::{ConfigDocument, RepoSettings};
use github_client::Repository;
use organizer_core::{Organizer, RepositoryPlan};
use tracing::{info, instrument, warn};

use crate::commands::to_json;
use crate::errors::Error;

#[cfg(test)]
#[path = "settings_cmd_tests.rs"]
mod tests;

#[instrument(skip(organizer))]
pub async fn settings(organizer: &Organizer, org: &str, repo: Option<&str>) -> Result<(), Error> {
    let output = match repo {
        None => render_document(organizer.configuration(org).await.as_ref())?,
        Some(repo) => render_settings(repo, organizer.settings(org, repo).await?.as_ref())?,
    };
    println!("{}", output);
    Ok(())
}

#[instrument(skip(organizer))]
pub async fn plan(organizer: &Organizer, org: &str, repo: &str) -> Result<(), Error> {
    match organizer.plan_repository(org, repo).await? {
        Some(plan) => {
            for failure in &plan.failures {
                warn!(repo = repo, failure = failure.as_str(), "Target could not be planned");
            }
            println!("{}", render_plan(&plan)?)
        }
        None => info!(org = org, repo = repo, "Repository is not managed"),
    }
    Ok(())
}

#[instrument(skip(organizer))]
pub async fn list_repos(organizer: &Organizer, org: &str) -> Result<(), Error> {
    let repositories = organizer.repositories(org).await?;
    println!("{}", render_repositories(&repositories));
    Ok(())
}

/// Renders the configuration document, or a note that the organization has none.
pub fn render_document(document: Option<&ConfigDocument>) -> Result<String, Error> {
    match document {
        Some(document) => document
            .to_yaml()
            .map_err(|e| Error::Output(e.to_string())),
        None => Ok("# organization has no configuration document".to_string()),
    }
}

/// Renders a repository's effective settings as YAML.
pub fn render_settings(repo: &str, settings: Option<&RepoSettings>) -> Result<String, Error> {
    match settings {
        Some(settings) => serde_yaml::to_string(settings).map_err(|e| Error::Output(e.to_string())),
        None => Ok(format!("# no settings apply to {}", repo)),
    }
}

pub fn render_plan(plan: &RepositoryPlan) -> Result<String, Error> {
    to_json(&plan.operations)
}

/// One repository name per line.
pub fn render_repositories(repositories: &[Repository]) -> String {
    repositories
        .iter()
        .map(|repository| repository.name())
        .collect::<Vec<_>>()
        .join("\n")
}
