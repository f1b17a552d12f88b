//! Branch protection reconciliation.

use config_manager::{BranchProtectionSpec, RepoSettings};
use github_client::{
    BranchProtectionPayload, DismissalRestrictions, RequiredPullRequestReviews,
    RequiredStatusChecks, Restrictions,
};
use std::collections::{BTreeMap, BTreeSet};
use tracing::warn;

use crate::Operation;

#[cfg(test)]
#[path = "branch_protection_tests.rs"]
mod tests;

/// Builds the request body that applies `spec` to a branch.
///
/// The builder is pure: equal specs always produce equal payloads, which serialize to the
/// same bytes.
///
/// - Status checks are sent only when configured.
/// - Pull request reviews are sent only when configured, always with empty dismissal
///   restrictions.
/// - Restrictions are sent when configured, with each unset list as empty.
pub fn build_branch_protection_payload(spec: &BranchProtectionSpec) -> BranchProtectionPayload {
    BranchProtectionPayload {
        required_status_checks: spec
            .required_status_checks
            .as_ref()
            .map(|checks| RequiredStatusChecks {
                strict: checks.strict,
                contexts: checks.contexts.clone(),
            }),
        enforce_admins: spec.enforce_admins,
        required_pull_request_reviews: spec.required_pull_request_reviews.as_ref().map(
            |reviews| RequiredPullRequestReviews {
                dismissal_restrictions: DismissalRestrictions::default(),
                dismiss_stale_reviews: reviews.dismiss_stale_reviews,
                require_code_owner_reviews: reviews.require_code_owner_reviews,
                required_approving_review_count: reviews.required_approving_review_count,
            },
        ),
        restrictions: spec.restrictions.as_ref().map(|r| Restrictions {
            users: r.users.clone(),
            teams: r.teams.clone(),
            apps: r.apps.clone(),
        }),
        required_linear_history: spec.required_linear_history,
        allow_force_pushes: spec.allow_force_pushes,
        allow_deletions: spec.allow_deletions,
    }
}

/// Returns the branch each configured protection applies to.
///
/// An entry with `default: true` applies to `default_branch`; one whose repository has no
/// known default branch is dropped.
pub fn protection_targets<'a>(
    settings: &'a RepoSettings,
    default_branch: Option<&str>,
) -> Vec<(String, &'a BranchProtectionSpec)> {
    settings
        .branches
        .iter()
        .filter_map(|(name, spec)| {
            if spec.default {
                default_branch.map(|branch| (branch.to_string(), spec))
            } else {
                Some((name.clone(), spec))
            }
        })
        .collect()
}

/// Plans branch protection for one repository.
///
/// `current` maps protected branches to their observed protection in payload form. A
/// configured branch that does not exist is skipped with a warning.
pub fn plan_branch_protection(
    settings: &RepoSettings,
    default_branch: Option<&str>,
    existing_branches: &BTreeSet<String>,
    current: &BTreeMap<String, BranchProtectionPayload>,
) -> Vec<Operation> {
    if default_branch.is_none() && settings.branches.values().any(|spec| spec.default) {
        warn!("Repository has no default branch, skipping default branch protection");
    }

    let mut operations = Vec::new();
    for (branch, spec) in protection_targets(settings, default_branch) {
        if !existing_branches.contains(&branch) {
            warn!(branch = branch.as_str(), "Branch not found, skipping protection");
            continue;
        }

        let payload = build_branch_protection_payload(spec);
        if current.get(&branch) == Some(&payload) {
            continue;
        }

        operations.push(Operation::ApplyBranchProtection { branch, payload });
    }

    operations
}
