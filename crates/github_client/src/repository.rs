//! Repository domain types.
//!
//! This module contains types representing GitHub repositories, the feature and merge
//! settings reported for them, and the payload used to change those settings.

use serde::{Deserialize, Serialize};

#[cfg(test)]
#[path = "repository_tests.rs"]
mod tests;

/// Represents a GitHub repository as reported by the REST API.
///
/// Only the fields the organizer reconciles against are kept. The feature and merge flags
/// are optional because GitHub omits some of them for installations without admin access.
///
/// # Examples
///
/// ```rust
/// use github_client::Repository;
///
/// let repo = Repository::new("my-repo".to_string(), "my-org/my-repo".to_string())
///     .with_default_branch("main");
///
/// assert_eq!(repo.name(), "my-repo");
/// assert_eq!(repo.default_branch(), Some("main"));
/// ```
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Repository {
    /// The name of the repository
    name: String,
    /// The full name of the repository (owner/name)
    full_name: String,
    /// The default branch, absent for empty repositories
    #[serde(default)]
    default_branch: Option<String>,
    #[serde(default)]
    archived: bool,
    #[serde(default)]
    fork: bool,
    #[serde(default)]
    private: bool,
    /// Topics, only present when the API was asked for them
    #[serde(default)]
    topics: Option<Vec<String>>,
    #[serde(default)]
    has_issues: Option<bool>,
    #[serde(default)]
    has_wiki: Option<bool>,
    #[serde(default)]
    has_downloads: Option<bool>,
    #[serde(default)]
    has_projects: Option<bool>,
    #[serde(default)]
    allow_rebase_merge: Option<bool>,
    #[serde(default)]
    allow_squash_merge: Option<bool>,
    #[serde(default)]
    allow_merge_commit: Option<bool>,
    #[serde(default)]
    delete_branch_on_merge: Option<bool>,
}

impl Repository {
    /// Creates a new Repository with no known settings.
    ///
    /// # Arguments
    ///
    /// * `name` - The name of the repository
    /// * `full_name` - The full name including owner (owner/repo)
    pub fn new(name: String, full_name: String) -> Self {
        Self {
            name,
            full_name,
            default_branch: None,
            archived: false,
            fork: false,
            private: false,
            topics: None,
            has_issues: None,
            has_wiki: None,
            has_downloads: None,
            has_projects: None,
            allow_rebase_merge: None,
            allow_squash_merge: None,
            allow_merge_commit: None,
            delete_branch_on_merge: None,
        }
    }

    /// Sets the default branch.
    pub fn with_default_branch(mut self, branch: &str) -> Self {
        self.default_branch = Some(branch.to_string());
        self
    }

    /// Marks the repository as archived or not.
    pub fn with_archived(mut self, archived: bool) -> Self {
        self.archived = archived;
        self
    }

    /// Marks the repository as a fork or not.
    pub fn with_fork(mut self, fork: bool) -> Self {
        self.fork = fork;
        self
    }

    /// Sets the repository topics.
    pub fn with_topics(mut self, topics: Vec<String>) -> Self {
        self.topics = Some(topics);
        self
    }

    /// Applies the fields present in `update` to this repository.
    ///
    /// Used to reflect a successful settings change without fetching the repository again.
    pub fn apply_settings(&mut self, update: &RepositorySettingsUpdate) {
        fn set(target: &mut Option<bool>, value: Option<bool>) {
            if value.is_some() {
                *target = value;
            }
        }

        set(&mut self.has_issues, update.has_issues);
        set(&mut self.has_wiki, update.has_wiki);
        set(&mut self.has_downloads, update.has_downloads);
        set(&mut self.has_projects, update.has_projects);
        set(&mut self.allow_rebase_merge, update.allow_rebase_merge);
        set(&mut self.allow_squash_merge, update.allow_squash_merge);
        set(&mut self.allow_merge_commit, update.allow_merge_commit);
        set(&mut self.delete_branch_on_merge, update.delete_branch_on_merge);
    }

    /// Returns the name of the repository.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the full name of the repository (owner/name).
    pub fn full_name(&self) -> &str {
        &self.full_name
    }

    /// Returns the default branch, if the repository has one.
    pub fn default_branch(&self) -> Option<&str> {
        self.default_branch.as_deref()
    }

    /// Returns whether the repository is archived.
    pub fn is_archived(&self) -> bool {
        self.archived
    }

    /// Returns whether the repository is a fork.
    pub fn is_fork(&self) -> bool {
        self.fork
    }

    /// Returns whether the repository is private.
    pub fn is_private(&self) -> bool {
        self.private
    }

    /// Returns the topics reported with the repository, if they were included.
    pub fn topics(&self) -> Option<&[String]> {
        self.topics.as_deref()
    }

    /// Returns whether issues are enabled, or `None` if unknown.
    pub fn has_issues(&self) -> Option<bool> {
        self.has_issues
    }

    /// Returns whether the wiki is enabled, or `None` if unknown.
    pub fn has_wiki(&self) -> Option<bool> {
        self.has_wiki
    }

    /// Returns whether downloads are enabled, or `None` if unknown.
    pub fn has_downloads(&self) -> Option<bool> {
        self.has_downloads
    }

    /// Returns whether projects are enabled, or `None` if unknown.
    pub fn has_projects(&self) -> Option<bool> {
        self.has_projects
    }

    pub fn allow_rebase_merge(&self) -> Option<bool> {
        self.allow_rebase_merge
    }

    pub fn allow_squash_merge(&self) -> Option<bool> {
        self.allow_squash_merge
    }

    pub fn allow_merge_commit(&self) -> Option<bool> {
        self.allow_merge_commit
    }

    pub fn delete_branch_on_merge(&self) -> Option<bool> {
        self.delete_branch_on_merge
    }
}

/// Represents the settings that can be updated for a repository.
///
/// Only the fields that are set are sent, so an update never resets a setting the
/// configuration does not mention. Use `Default::default()` and modify fields as needed.
#[derive(Serialize, Deserialize, Default, Debug, Clone, PartialEq, Eq)]
pub struct RepositorySettingsUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub has_issues: Option<bool>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub has_wiki: Option<bool>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub has_downloads: Option<bool>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub has_projects: Option<bool>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub allow_rebase_merge: Option<bool>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub allow_squash_merge: Option<bool>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub allow_merge_commit: Option<bool>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub delete_branch_on_merge: Option<bool>,
}

impl RepositorySettingsUpdate {
    /// Returns true when no field is set.
    pub fn is_empty(&self) -> bool {
        self == &Self::default()
    }
}
