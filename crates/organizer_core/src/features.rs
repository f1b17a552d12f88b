//! Repository feature, merge and dependency security reconciliation.

use config_manager::RepoSettings;
use github_client::{Repository, RepositorySettingsUpdate};

use crate::Operation;

#[cfg(test)]
#[path = "features_tests.rs"]
mod tests;

/// Observed dependency security state. `None` means the state could not be read.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SecurityState {
    pub vulnerability_alerts: Option<bool>,
    pub automated_security_fixes: Option<bool>,
}

/// Plans the `features`, `merges` and `delete_branch_on_merge` settings of a repository.
///
/// The update holds only configured values that differ from what `repository` reports.
/// Returns `None` when there is nothing to change.
pub fn plan_repository_features(
    settings: &RepoSettings,
    repository: &Repository,
) -> Option<Operation> {
    let mut update = RepositorySettingsUpdate::default();

    if let Some(features) = &settings.features {
        update.has_issues = changed(features.has_issues, repository.has_issues());
        update.has_wiki = changed(features.has_wiki, repository.has_wiki());
        update.has_downloads = changed(features.has_downloads, repository.has_downloads());
        update.has_projects = changed(features.has_projects, repository.has_projects());
    }

    if let Some(merges) = &settings.merges {
        update.allow_rebase_merge =
            changed(merges.allow_rebase_merge, repository.allow_rebase_merge());
        update.allow_squash_merge =
            changed(merges.allow_squash_merge, repository.allow_squash_merge());
        update.allow_merge_commit =
            changed(merges.allow_merge_commit, repository.allow_merge_commit());
    }

    update.delete_branch_on_merge = changed(
        settings.delete_branch_on_merge,
        repository.delete_branch_on_merge(),
    );

    if update.is_empty() {
        None
    } else {
        Some(Operation::SetRepoFeatures { settings: update })
    }
}

fn changed(desired: Option<bool>, current: Option<bool>) -> Option<bool> {
    desired.filter(|value| current != Some(*value))
}

/// Plans the `dependency_security` settings of a repository.
///
/// Alerts are planned before automated fixes since GitHub only enables fixes on a
/// repository with alerts.
pub fn plan_dependency_security(settings: &RepoSettings, current: &SecurityState) -> Vec<Operation> {
    let Some(security) = &settings.dependency_security else {
        return Vec::new();
    };

    let mut operations = Vec::new();
    if let Some(enabled) = changed(security.alerts, current.vulnerability_alerts) {
        operations.push(Operation::SetVulnerabilityAlerts { enabled });
    }
    if let Some(enabled) = changed(security.automatic_fixes, current.automated_security_fixes) {
        operations.push(Operation::SetAutomatedSecurityFixes { enabled });
    }
    operations
}
