//! Effective repository settings.
//!
//! [`RepoSettings`] is what a repository's entry in the organization document becomes once
//! inheritance and legacy normalization are done. Every group is optional: a group the
//! configuration does not mention is left alone on the remote.

use serde::{Deserialize, Serialize};
use serde_yaml::{Mapping, Value};
use std::collections::BTreeMap;

use super::{BranchProtectionSpec, DependencySecurity, IssueSettings};
use crate::{ConfigurationError, ConfigurationResult};

/// Repository feature toggles.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct Features {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub has_issues: Option<bool>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub has_wiki: Option<bool>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub has_downloads: Option<bool>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub has_projects: Option<bool>,
}

impl Features {
    /// Keys of this group, as they appear in the flat legacy format.
    pub const KEYS: [&'static str; 4] = ["has_issues", "has_wiki", "has_downloads", "has_projects"];
}

/// Allowed pull request merge methods.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct Merges {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub allow_rebase_merge: Option<bool>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub allow_squash_merge: Option<bool>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub allow_merge_commit: Option<bool>,
}

impl Merges {
    /// Keys of this group, as they appear in the flat legacy format.
    pub const KEYS: [&'static str; 3] = [
        "allow_rebase_merge",
        "allow_squash_merge",
        "allow_merge_commit",
    ];
}

/// The effective settings for one repository.
///
/// # Examples
///
/// ```rust
/// use config_manager::settings::RepoSettings;
///
/// let yaml = r#"
/// features:
///   has_wiki: false
/// teams:
///   developers: push
/// teams_clean: true
/// "#;
/// let settings: RepoSettings = serde_yaml::from_str(yaml).unwrap();
/// assert_eq!(settings.features.unwrap().has_wiki, Some(false));
/// assert_eq!(settings.teams.get("developers").map(String::as_str), Some("push"));
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct RepoSettings {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub features: Option<Features>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub merges: Option<Merges>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub delete_branch_on_merge: Option<bool>,

    /// Branch name to requested protection.
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub branches: BTreeMap<String, BranchProtectionSpec>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub issues: Option<IssueSettings>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dependency_security: Option<DependencySecurity>,

    /// Team name to permission level (`pull`, `push` or `admin`).
    ///
    /// Permission strings are validated when access is planned.
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub teams: BTreeMap<String, String>,

    /// Revoke access for teams not listed in `teams`.
    #[serde(default)]
    pub teams_clean: bool,
}

impl RepoSettings {
    /// Builds typed settings from a resolved mapping.
    ///
    /// Unknown keys are ignored. A recognized key with a value of the wrong shape is an
    /// [`ConfigurationError::InvalidSettings`] error naming `repository`.
    pub fn from_mapping(repository: &str, mapping: Mapping) -> ConfigurationResult<Self> {
        serde_yaml::from_value(Value::Mapping(mapping)).map_err(|e| {
            ConfigurationError::InvalidSettings {
                repository: repository.to_string(),
                reason: e.to_string(),
            }
        })
    }

    /// Returns true when no setting is configured.
    pub fn is_empty(&self) -> bool {
        self == &Self::default()
    }
}

#[cfg(test)]
#[path = "repository_tests.rs"]
mod tests;
