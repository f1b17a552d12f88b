//! Project board lookups.
//!
//! ```bash
//! github-organizer list-org-projects my-org
//! github-organizer get-org-project my-org Roadmap
//! github-organizer get-org-project-column my-org Roadmap Inbox
//! github-organizer get-repo-project my-org api Backlog
//! ```

use github_client::Project;
use organizer_core::Organizer;
use tracing::instrument;

use crate::errors::Error;

#[cfg(test)]
#[path = "project_cmd_tests.rs"]
mod tests;

#[instrument(skip(organizer))]
pub async fn list_org_projects(organizer: &Organizer, org: &str) -> Result<(), Error> {
    let projects = organizer.client().list_org_projects(org).await?;
    println!("{}", render_projects(&projects));
    Ok(())
}

#[instrument(skip(organizer))]
pub async fn get_org_project(organizer: &Organizer, org: &str, project: &str) -> Result<(), Error> {
    let id = require("project", project, organizer.find_org_project(org, project).await?)?;
    println!("{}", render_id(project, id));
    Ok(())
}

#[instrument(skip(organizer))]
pub async fn get_org_project_column(
    organizer: &Organizer,
    org: &str,
    project: &str,
    column: &str,
) -> Result<(), Error> {
    let project_id = require("project", project, organizer.find_org_project(org, project).await?)?;
    let column_id = require(
        "project column",
        column,
        organizer.find_column(org, project_id, column).await?,
    )?;
    println!("{}", render_id(column, column_id));
    Ok(())
}

#[instrument(skip(organizer))]
pub async fn get_repo_project(
    organizer: &Organizer,
    org: &str,
    repo: &str,
    project: &str,
) -> Result<(), Error> {
    let id = require(
        "project",
        project,
        organizer.find_repo_project(org, repo, project).await?,
    )?;
    println!("{}", render_id(project, id));
    Ok(())
}

/// Turns a missing lookup result into [`Error::NotFound`].
pub fn require(kind: &str, name: &str, id: Option<u64>) -> Result<u64, Error> {
    id.ok_or_else(|| Error::NotFound {
        kind: kind.to_string(),
        name: name.to_string(),
    })
}

pub fn render_id(name: &str, id: u64) -> String {
    format!("{}\t{}", id, name)
}

/// One `id<TAB>name` line per project.
pub fn render_projects(projects: &[Project]) -> String {
    projects
        .iter()
        .map(|project| render_id(&project.name, project.id))
        .collect::<Vec<_>>()
        .join("\n")
}
