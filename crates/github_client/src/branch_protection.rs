//! Branch protection domain types.
//!
//! This module contains the request body sent to
//! `PUT /repos/{owner}/{repo}/branches/{branch}/protection` and the shape GitHub reports back
//! from the matching `GET`. The two differ (the response wraps booleans in `{"enabled": ..}`
//! objects and lists users and teams as objects), so the response converts into the request
//! form to allow comparing desired and observed protection directly.

use serde::{Deserialize, Serialize};

#[cfg(test)]
#[path = "branch_protection_tests.rs"]
mod tests;

/// Request body for updating branch protection.
///
/// Every top level key is always serialized. GitHub requires `required_status_checks`,
/// `enforce_admins`, `required_pull_request_reviews` and `restrictions` to be present, with
/// `null` disabling the corresponding rule.
///
/// # Examples
///
/// ```rust
/// use github_client::{BranchProtectionPayload, RequiredStatusChecks};
///
/// let payload = BranchProtectionPayload {
///     required_status_checks: Some(RequiredStatusChecks {
///         strict: true,
///         contexts: vec!["ci".to_string()],
///     }),
///     enforce_admins: true,
///     ..Default::default()
/// };
/// ```
#[derive(Clone, Debug, Default, PartialEq, Eq, Deserialize, Serialize)]
pub struct BranchProtectionPayload {
    pub required_status_checks: Option<RequiredStatusChecks>,
    pub enforce_admins: bool,
    pub required_pull_request_reviews: Option<RequiredPullRequestReviews>,
    pub restrictions: Option<Restrictions>,
    pub required_linear_history: bool,
    pub allow_force_pushes: bool,
    pub allow_deletions: bool,
}

/// Status checks that must pass before merging.
#[derive(Clone, Debug, Default, PartialEq, Eq, Deserialize, Serialize)]
pub struct RequiredStatusChecks {
    /// Require branches to be up to date before merging
    pub strict: bool,
    /// Names of the required checks
    pub contexts: Vec<String>,
}

/// Pull request review requirements.
#[derive(Clone, Debug, Default, PartialEq, Eq, Deserialize, Serialize)]
pub struct RequiredPullRequestReviews {
    pub dismissal_restrictions: DismissalRestrictions,
    /// Whether stale reviews are dismissed when new commits are pushed
    pub dismiss_stale_reviews: bool,
    /// Whether code owner reviews are required
    pub require_code_owner_reviews: bool,
    /// Required number of approving reviews before merging
    pub required_approving_review_count: u8,
}

/// Who may dismiss pull request reviews. Empty lists serialize as `{}`.
#[derive(Clone, Debug, Default, PartialEq, Eq, Deserialize, Serialize)]
pub struct DismissalRestrictions {
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub users: Vec<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub teams: Vec<String>,
}

/// Who may push to the protected branch.
#[derive(Clone, Debug, Default, PartialEq, Eq, Deserialize, Serialize)]
pub struct Restrictions {
    pub users: Vec<String>,
    pub teams: Vec<String>,
    pub apps: Vec<String>,
}

/// Branch protection as reported by `GET /repos/{owner}/{repo}/branches/{branch}/protection`.
#[derive(Clone, Debug, Default, Deserialize, Serialize)]
pub struct BranchProtection {
    #[serde(default)]
    pub required_status_checks: Option<StatusChecksState>,
    #[serde(default)]
    pub enforce_admins: Option<EnabledState>,
    #[serde(default)]
    pub required_pull_request_reviews: Option<PullRequestReviewsState>,
    #[serde(default)]
    pub restrictions: Option<RestrictionsState>,
    #[serde(default)]
    pub required_linear_history: Option<EnabledState>,
    #[serde(default)]
    pub allow_force_pushes: Option<EnabledState>,
    #[serde(default)]
    pub allow_deletions: Option<EnabledState>,
}

/// A rule reported as `{"enabled": bool}`.
#[derive(Clone, Debug, Default, Deserialize, Serialize)]
pub struct EnabledState {
    pub enabled: bool,
}

#[derive(Clone, Debug, Default, Deserialize, Serialize)]
pub struct StatusChecksState {
    #[serde(default)]
    pub strict: bool,
    #[serde(default)]
    pub contexts: Vec<String>,
}

#[derive(Clone, Debug, Default, Deserialize, Serialize)]
pub struct PullRequestReviewsState {
    #[serde(default)]
    pub dismissal_restrictions: Option<ActorsState>,
    #[serde(default)]
    pub dismiss_stale_reviews: bool,
    #[serde(default)]
    pub require_code_owner_reviews: bool,
    #[serde(default)]
    pub required_approving_review_count: u8,
}

#[derive(Clone, Debug, Default, Deserialize, Serialize)]
pub struct RestrictionsState {
    #[serde(default)]
    pub users: Vec<ActorRef>,
    #[serde(default)]
    pub teams: Vec<ActorRef>,
    #[serde(default)]
    pub apps: Vec<ActorRef>,
}

#[derive(Clone, Debug, Default, Deserialize, Serialize)]
pub struct ActorsState {
    #[serde(default)]
    pub users: Vec<ActorRef>,
    #[serde(default)]
    pub teams: Vec<ActorRef>,
}

/// A user, team or app reference. Users carry a `login`, teams and apps a `slug`.
#[derive(Clone, Debug, Default, Deserialize, Serialize)]
pub struct ActorRef {
    #[serde(default)]
    pub login: Option<String>,
    #[serde(default)]
    pub slug: Option<String>,
}

impl ActorRef {
    fn identifier(&self) -> Option<String> {
        self.login.clone().or_else(|| self.slug.clone())
    }
}

fn identifiers(actors: &[ActorRef]) -> Vec<String> {
    actors.iter().filter_map(ActorRef::identifier).collect()
}

fn enabled(state: &Option<EnabledState>) -> bool {
    state.as_ref().map(|s| s.enabled).unwrap_or(false)
}

impl From<&BranchProtection> for BranchProtectionPayload {
    fn from(value: &BranchProtection) -> Self {
        Self {
            required_status_checks: value.required_status_checks.as_ref().map(|checks| {
                RequiredStatusChecks {
                    strict: checks.strict,
                    contexts: checks.contexts.clone(),
                }
            }),
            enforce_admins: enabled(&value.enforce_admins),
            required_pull_request_reviews: value.required_pull_request_reviews.as_ref().map(
                |reviews| RequiredPullRequestReviews {
                    dismissal_restrictions: reviews
                        .dismissal_restrictions
                        .as_ref()
                        .map(|actors| DismissalRestrictions {
                            users: identifiers(&actors.users),
                            teams: identifiers(&actors.teams),
                        })
                        .unwrap_or_default(),
                    dismiss_stale_reviews: reviews.dismiss_stale_reviews,
                    require_code_owner_reviews: reviews.require_code_owner_reviews,
                    required_approving_review_count: reviews.required_approving_review_count,
                },
            ),
            restrictions: value.restrictions.as_ref().map(|r| Restrictions {
                users: identifiers(&r.users),
                teams: identifiers(&r.teams),
                apps: identifiers(&r.apps),
            }),
            required_linear_history: enabled(&value.required_linear_history),
            allow_force_pushes: enabled(&value.allow_force_pushes),
            allow_deletions: enabled(&value.allow_deletions),
        }
    }
}
