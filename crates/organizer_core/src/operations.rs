//! Mutating operations produced by the planners.
//!
//! Each [`Operation`] carries everything needed to apply it on its own: applying one never
//! depends on another having been applied first, and applying one twice leaves the remote in
//! the same state as applying it once.

use github_client::{BranchProtectionPayload, RepositorySettingsUpdate, TeamRole};
use serde::Serialize;
use std::fmt;

use crate::{OrganizerError, OrganizerResult};

#[cfg(test)]
#[path = "operations_tests.rs"]
mod tests;

/// Access level of a team on a repository, ordered by breadth.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum TeamPermission {
    Pull,
    Push,
    Admin,
}

impl TeamPermission {
    /// Parses a permission level from the configuration.
    ///
    /// # Errors
    ///
    /// Returns [`OrganizerError::PlanValidation`] for anything other than `pull`, `push` or
    /// `admin`. The value is never coerced to a nearby level.
    pub fn parse(field: &str, value: &str) -> OrganizerResult<Self> {
        match value {
            "pull" => Ok(TeamPermission::Pull),
            "push" => Ok(TeamPermission::Push),
            "admin" => Ok(TeamPermission::Admin),
            other => Err(OrganizerError::PlanValidation {
                field: field.to_string(),
                reason: format!(
                    "unknown permission '{}', expected one of pull, push, admin",
                    other
                ),
            }),
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            TeamPermission::Pull => "pull",
            TeamPermission::Push => "push",
            TeamPermission::Admin => "admin",
        }
    }
}

impl fmt::Display for TeamPermission {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A single change to apply to GitHub.
///
/// Repository scoped operations apply to the repository given to the executor. Team
/// repository operations name their repository since a team run spans many repositories.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "operation", rename_all = "snake_case")]
pub enum Operation {
    CreateLabel {
        name: String,
        color: String,
        description: Option<String>,
    },
    UpdateLabel {
        name: String,
        color: String,
        description: Option<String>,
    },
    RenameAndUpdateLabel {
        old_name: String,
        name: String,
        color: String,
        description: Option<String>,
    },
    DeleteLabel {
        name: String,
    },
    SetTeamRepoPermission {
        team: String,
        repository: String,
        permission: TeamPermission,
    },
    RemoveTeamRepoAccess {
        team: String,
        repository: String,
    },
    ApplyBranchProtection {
        branch: String,
        payload: BranchProtectionPayload,
    },
    SetRepoFeatures {
        settings: RepositorySettingsUpdate,
    },
    SetVulnerabilityAlerts {
        enabled: bool,
    },
    SetAutomatedSecurityFixes {
        enabled: bool,
    },
    AddTeamMember {
        team: String,
        username: String,
        role: TeamRole,
    },
    RemoveTeamMember {
        team: String,
        username: String,
    },
    AddIssueLabels {
        issue: u64,
        labels: Vec<String>,
    },
    CreateProjectCard {
        column_id: u64,
        issue_id: u64,
    },
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Operation::CreateLabel { name, color, .. } => {
                write!(f, "create label '{}' ({})", name, color)
            }
            Operation::UpdateLabel { name, color, .. } => {
                write!(f, "update label '{}' ({})", name, color)
            }
            Operation::RenameAndUpdateLabel {
                old_name,
                name,
                color,
                ..
            } => write!(f, "rename label '{}' to '{}' ({})", old_name, name, color),
            Operation::DeleteLabel { name } => write!(f, "delete label '{}'", name),
            Operation::SetTeamRepoPermission {
                team,
                repository,
                permission,
            } => write!(
                f,
                "grant team '{}' {} access to {}",
                team, permission, repository
            ),
            Operation::RemoveTeamRepoAccess { team, repository } => {
                write!(f, "remove team '{}' from {}", team, repository)
            }
            Operation::ApplyBranchProtection { branch, .. } => {
                write!(f, "protect branch '{}'", branch)
            }
            Operation::SetRepoFeatures { .. } => write!(f, "update repository settings"),
            Operation::SetVulnerabilityAlerts { enabled } => {
                write!(f, "set vulnerability alerts to {}", enabled)
            }
            Operation::SetAutomatedSecurityFixes { enabled } => {
                write!(f, "set automated security fixes to {}", enabled)
            }
            Operation::AddTeamMember {
                team,
                username,
                role,
            } => write!(
                f,
                "add {} to team '{}' as {}",
                username,
                team,
                role.as_str()
            ),
            Operation::RemoveTeamMember { team, username } => {
                write!(f, "remove {} from team '{}'", username, team)
            }
            Operation::AddIssueLabels { issue, labels } => {
                write!(f, "label issue #{} with {}", issue, labels.join(", "))
            }
            Operation::CreateProjectCard { column_id, issue_id } => {
                write!(f, "add issue {} to project column {}", issue_id, column_id)
            }
        }
    }
}
