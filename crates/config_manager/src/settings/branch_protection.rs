//! Branch protection settings.
//!
//! One [`BranchProtectionSpec`] per entry of a repository's `branches` group. The spec
//! records what the configuration asks for; turning it into a request payload is the
//! job of the branch protection planner.

use serde::{Deserialize, Deserializer, Serialize};

/// Protection requested for one branch.
///
/// # Examples
///
/// ```rust
/// use config_manager::settings::BranchProtectionSpec;
///
/// let yaml = r#"
/// default: true
/// enforce_admins: true
/// required_pull_request_reviews:
///   required_approving_review_count: 2
/// "#;
/// let spec: BranchProtectionSpec = serde_yaml::from_str(yaml).unwrap();
/// assert!(spec.default);
/// assert_eq!(
///     spec.required_pull_request_reviews.unwrap().required_approving_review_count,
///     2
/// );
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct BranchProtectionSpec {
    /// Apply this protection to the repository's default branch instead of the
    /// branch named by the entry key.
    #[serde(default)]
    pub default: bool,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub required_status_checks: Option<StatusChecksSpec>,

    #[serde(default)]
    pub enforce_admins: bool,

    /// Present when pull request reviews are required.
    #[serde(
        default,
        deserialize_with = "deserialize_reviews",
        skip_serializing_if = "Option::is_none"
    )]
    pub required_pull_request_reviews: Option<PullRequestReviewsSpec>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub restrictions: Option<RestrictionsSpec>,

    #[serde(default)]
    pub required_linear_history: bool,

    #[serde(default)]
    pub allow_force_pushes: bool,

    #[serde(default)]
    pub allow_deletions: bool,
}

/// Required status checks.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct StatusChecksSpec {
    /// Require branches to be up to date before merging
    #[serde(default)]
    pub strict: bool,

    #[serde(default)]
    pub contexts: Vec<String>,
}

/// Required pull request reviews.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PullRequestReviewsSpec {
    #[serde(default)]
    pub dismiss_stale_reviews: bool,

    #[serde(default)]
    pub require_code_owner_reviews: bool,

    #[serde(default = "default_review_count")]
    pub required_approving_review_count: u8,
}

impl Default for PullRequestReviewsSpec {
    fn default() -> Self {
        Self {
            dismiss_stale_reviews: false,
            require_code_owner_reviews: false,
            required_approving_review_count: default_review_count(),
        }
    }
}

fn default_review_count() -> u8 {
    1
}

/// Who may push to the branch. Each list defaults to empty.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct RestrictionsSpec {
    #[serde(default)]
    pub users: Vec<String>,

    #[serde(default)]
    pub teams: Vec<String>,

    #[serde(default)]
    pub apps: Vec<String>,
}

/// Reads `required_pull_request_reviews`.
///
/// An empty value or `true` requests reviews with default settings, `false` leaves
/// them off and a mapping configures them.
fn deserialize_reviews<'de, D>(deserializer: D) -> Result<Option<PullRequestReviewsSpec>, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Reviews {
        Toggle(bool),
        Settings(PullRequestReviewsSpec),
        Empty(()),
    }

    Ok(match Reviews::deserialize(deserializer)? {
        Reviews::Toggle(false) => None,
        Reviews::Toggle(true) | Reviews::Empty(()) => Some(PullRequestReviewsSpec::default()),
        Reviews::Settings(settings) => Some(settings),
    })
}

#[cfg(test)]
#[path = "branch_protection_tests.rs"]
mod tests;
