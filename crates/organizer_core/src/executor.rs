//! Applies planned operations to GitHub.

use github_client::OrganizationClient;
use serde::Serialize;
use std::sync::Arc;
use tracing::{info, instrument, warn};

use crate::Operation;

#[cfg(test)]
#[path = "executor_tests.rs"]
mod tests;

/// Applies [`Operation`]s one at a time through an [`OrganizationClient`].
///
/// A failing operation is logged and counted, and the remaining operations are still
/// applied. Since every operation is idempotent, a failed run can simply be repeated.
#[derive(Clone)]
pub struct OperationExecutor {
    client: Arc<dyn OrganizationClient>,
}

impl OperationExecutor {
    pub fn new(client: Arc<dyn OrganizationClient>) -> Self {
        Self { client }
    }

    /// Applies `operations` to `org/repo`.
    #[instrument(skip(self, operations), fields(org = %org, repo = %repo, count = operations.len()))]
    pub async fn apply(&self, org: &str, repo: &str, operations: &[Operation]) -> ApplyResult {
        self.apply_scoped(org, Some(repo), operations).await
    }

    /// Applies organization level operations such as team membership changes.
    ///
    /// Repository scoped operations cannot be applied here and are counted as failed.
    #[instrument(skip(self, operations), fields(org = %org, count = operations.len()))]
    pub async fn apply_organization(&self, org: &str, operations: &[Operation]) -> ApplyResult {
        self.apply_scoped(org, None, operations).await
    }

    async fn apply_scoped(
        &self,
        org: &str,
        repo: Option<&str>,
        operations: &[Operation],
    ) -> ApplyResult {
        let mut result = ApplyResult::new();

        for operation in operations {
            match self.apply_one(org, repo, operation).await {
                Ok(()) => {
                    info!(operation = %operation, "Applied operation");
                    result.applied += 1;
                }
                Err(e) => {
                    warn!(operation = %operation, error = %e, "Failed to apply operation");
                    result.record_failure(operation.to_string());
                }
            }
        }

        info!(
            applied = result.applied,
            failed = result.failed,
            "Operations applied"
        );
        result
    }

    async fn apply_one(
        &self,
        org: &str,
        repo: Option<&str>,
        operation: &Operation,
    ) -> Result<(), github_client::Error> {
        let client = self.client.as_ref();
        let in_repo = || {
            repo.ok_or_else(|| {
                github_client::Error::InvalidContent(format!(
                    "operation '{}' needs a repository",
                    operation
                ))
            })
        };

        match operation {
            Operation::CreateLabel {
                name,
                color,
                description,
            } => {
                client
                    .create_label(org, in_repo()?, name, color, description.as_deref())
                    .await
            }
            Operation::UpdateLabel {
                name,
                color,
                description,
            } => {
                client
                    .update_label(org, in_repo()?, name, name, color, description.as_deref())
                    .await
            }
            Operation::RenameAndUpdateLabel {
                old_name,
                name,
                color,
                description,
            } => {
                client
                    .update_label(
                        org,
                        in_repo()?,
                        old_name,
                        name,
                        color,
                        description.as_deref(),
                    )
                    .await
            }
            Operation::DeleteLabel { name } => client.delete_label(org, in_repo()?, name).await,
            Operation::SetTeamRepoPermission {
                team,
                repository,
                permission,
            } => {
                client
                    .set_team_repository_permission(org, team, org, repository, permission.as_str())
                    .await
            }
            Operation::RemoveTeamRepoAccess { team, repository } => {
                client.remove_team_repository(org, team, org, repository).await
            }
            Operation::ApplyBranchProtection { branch, payload } => {
                client
                    .update_branch_protection(org, in_repo()?, branch, payload)
                    .await
            }
            Operation::SetRepoFeatures { settings } => {
                client
                    .update_repository_settings(org, in_repo()?, settings)
                    .await
            }
            Operation::SetVulnerabilityAlerts { enabled } => {
                client
                    .set_vulnerability_alerts(org, in_repo()?, *enabled)
                    .await
            }
            Operation::SetAutomatedSecurityFixes { enabled } => {
                client
                    .set_automated_security_fixes(org, in_repo()?, *enabled)
                    .await
            }
            Operation::AddTeamMember {
                team,
                username,
                role,
            } => client.set_team_membership(org, team, username, *role).await,
            Operation::RemoveTeamMember { team, username } => {
                client.remove_team_membership(org, team, username).await
            }
            Operation::AddIssueLabels { issue, labels } => {
                client
                    .add_issue_labels(org, in_repo()?, *issue, labels)
                    .await
            }
            Operation::CreateProjectCard { column_id, issue_id } => {
                client.create_project_card(*column_id, *issue_id).await
            }
        }
    }
}

/// Outcome of applying a list of operations.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ApplyResult {
    /// Number of operations applied
    pub applied: usize,

    /// Number of operations that failed
    pub failed: usize,

    /// Descriptions of the failed operations
    pub failed_operations: Vec<String>,
}

impl ApplyResult {
    /// Creates a new empty result.
    pub fn new() -> Self {
        Self {
            applied: 0,
            failed: 0,
            failed_operations: Vec::new(),
        }
    }

    /// Returns true if no operation failed.
    pub fn is_success(&self) -> bool {
        self.failed == 0
    }

    /// Returns true if any operation was applied.
    pub fn has_changes(&self) -> bool {
        self.applied > 0
    }

    pub fn record_failure(&mut self, description: String) {
        self.failed += 1;
        self.failed_operations.push(description);
    }

    /// Adds the counts of `other` to this result.
    pub fn merge(&mut self, other: ApplyResult) {
        self.applied += other.applied;
        self.failed += other.failed;
        self.failed_operations.extend(other.failed_operations);
    }
}

impl Default for ApplyResult {
    fn default() -> Self {
        Self::new()
    }
}
