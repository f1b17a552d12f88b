//! Issue triage settings.

use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// The `issues` group of a repository's settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct IssueSettings {
    /// Put every open issue on the auto-assign project during a full sync.
    #[serde(default)]
    pub auto_assign_project: bool,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub project_autoassign: Option<ProjectAutoassign>,

    /// Labels added to new issues.
    #[serde(default, skip_serializing_if = "BTreeSet::is_empty")]
    pub auto_label: BTreeSet<String>,
}

/// The project board column new issues are placed in.
///
/// The board belongs to the organization when `organization` is set, to `repository`
/// when that is set, and to the issue's own repository otherwise.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProjectAutoassign {
    #[serde(default)]
    pub organization: bool,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub repository: Option<String>,

    /// Project name
    pub name: String,

    /// Column name
    pub column: String,
}

#[cfg(test)]
#[path = "issues_tests.rs"]
mod tests;
