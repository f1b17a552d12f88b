//! Issue triage planning: auto-labelling and project auto-assignment.

use config_manager::{LabelSpec, ProjectAutoassign, RepoSettings};
use github_client::Issue;

use crate::Operation;

#[cfg(test)]
#[path = "issues_tests.rs"]
mod tests;

/// Owner of the project board issues are assigned to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProjectOwner {
    Organization,
    Repository(String),
}

impl ProjectOwner {
    /// Returns the owner of the board named by `autoassign` for issues of `repository`.
    pub fn for_autoassign(autoassign: &ProjectAutoassign, repository: &str) -> Self {
        if autoassign.organization {
            ProjectOwner::Organization
        } else {
            ProjectOwner::Repository(
                autoassign
                    .repository
                    .clone()
                    .unwrap_or_else(|| repository.to_string()),
            )
        }
    }
}

/// Plans the auto labels `issue` is missing.
///
/// A label whose spec restricts it to some repositories is only added in those.
/// Returns `None` when the issue already has every applicable label.
pub fn plan_issue_labels(
    repository: &str,
    settings: &RepoSettings,
    labels: &[LabelSpec],
    issue: &Issue,
) -> Option<Operation> {
    let issues = settings.issues.as_ref()?;
    let present = issue.label_names();

    let missing: Vec<String> = issues
        .auto_label
        .iter()
        .filter(|name| !present.contains(*name))
        .filter(|name| {
            labels
                .iter()
                .find(|spec| &spec.name == *name)
                .map_or(true, |spec| spec.applies_to(repository))
        })
        .cloned()
        .collect();

    if missing.is_empty() {
        None
    } else {
        Some(Operation::AddIssueLabels {
            issue: issue.number,
            labels: missing,
        })
    }
}

/// Plans adding `issue` to the auto-assign column unless it is already on a project.
///
/// Pull requests are never assigned.
pub fn plan_project_card(column_id: u64, issue: &Issue, has_projects: bool) -> Option<Operation> {
    if has_projects || issue.is_pull_request() {
        return None;
    }

    Some(Operation::CreateProjectCard {
        column_id,
        issue_id: issue.id,
    })
}
