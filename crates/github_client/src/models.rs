//! # Models
//!
//! Wire models for the GitHub entities the organizer reads: app installations, teams and
//! their repository grants, classic project boards, issues, branches and file contents.
//!
//! Only the fields the organizer needs are modelled. Unknown fields in API responses are
//! ignored.

use base64::Engine;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

use crate::Error;

#[cfg(test)]
#[path = "models_tests.rs"]
mod tests;

/// Represents a GitHub account (user or organization).
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Account {
    /// The unique ID of the account
    pub id: u64,
    /// The login name of the account
    pub login: String,
    /// The type of account (User or Organization)
    #[serde(rename = "type")]
    pub account_type: String,
}

/// Represents a GitHub App installation.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Installation {
    /// The unique ID of the installation
    pub id: u64,
    /// The account (user or organization) where the app is installed
    pub account: Account,
    /// Either `all` or `selected`
    pub repository_selection: Option<String>,
}

impl From<octocrab::models::Installation> for Installation {
    fn from(value: octocrab::models::Installation) -> Self {
        Self {
            id: *value.id,
            account: Account {
                id: *value.account.id,
                login: value.account.login,
                account_type: value.account.r#type,
            },
            repository_selection: value.repository_selection,
        }
    }
}

/// Represents a GitHub user account.
#[derive(Clone, Debug, Default, PartialEq, Eq, Deserialize, Serialize)]
pub struct User {
    /// The unique numeric ID of the user
    pub id: u64,
    /// The login name of the user
    pub login: String,
}

/// Represents a team in an organization.
#[derive(Clone, Debug, PartialEq, Eq, Deserialize, Serialize)]
pub struct Team {
    pub id: u64,
    /// Display name, as used in the organizer configuration
    pub name: String,
    /// URL-safe name used in API paths
    pub slug: String,
}

/// Role of a user within a team.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum TeamRole {
    Member,
    Maintainer,
}

impl TeamRole {
    pub fn as_str(&self) -> &'static str {
        match self {
            TeamRole::Member => "member",
            TeamRole::Maintainer => "maintainer",
        }
    }
}

/// Permission flags GitHub reports for a team or user on a repository.
///
/// The flags are cumulative: a push grant reports both `pull` and `push`.
#[derive(Clone, Debug, Default, PartialEq, Eq, Deserialize, Serialize)]
pub struct RepositoryPermissions {
    #[serde(default)]
    pub admin: bool,
    #[serde(default)]
    pub push: bool,
    #[serde(default)]
    pub pull: bool,
}

impl RepositoryPermissions {
    /// Returns the names of the granted flags out of `pull`, `push` and `admin`.
    ///
    /// `maintain` and `triage` are not reported so that the flag count matches the
    /// three level ordering used when comparing grants.
    pub fn granted_flags(&self) -> BTreeSet<String> {
        let mut flags = BTreeSet::new();
        if self.pull {
            flags.insert("pull".to_string());
        }
        if self.push {
            flags.insert("push".to_string());
        }
        if self.admin {
            flags.insert("admin".to_string());
        }
        flags
    }
}

/// A repository as listed under a team, with the team's permission flags.
#[derive(Clone, Debug, Deserialize, Serialize)]
pub struct TeamRepository {
    pub name: String,
    #[serde(default)]
    pub permissions: RepositoryPermissions,
}

/// A classic project board.
#[derive(Clone, Debug, PartialEq, Eq, Deserialize, Serialize)]
pub struct Project {
    pub id: u64,
    pub name: String,
}

/// A column of a classic project board.
#[derive(Clone, Debug, PartialEq, Eq, Deserialize, Serialize)]
pub struct ProjectColumn {
    pub id: u64,
    pub name: String,
}

/// A label reference as embedded in an issue.
#[derive(Clone, Debug, PartialEq, Eq, Deserialize, Serialize)]
pub struct IssueLabel {
    pub name: String,
}

/// An issue in a repository.
#[derive(Clone, Debug, PartialEq, Eq, Deserialize, Serialize)]
pub struct Issue {
    /// Global ID, used when attaching the issue to a project card
    pub id: u64,
    /// Repository scoped number
    pub number: u64,
    pub title: String,
    #[serde(default)]
    pub labels: Vec<IssueLabel>,
    /// Present only when the issue is a pull request
    #[serde(default)]
    pub pull_request: Option<serde_json::Value>,
}

impl Issue {
    pub fn is_pull_request(&self) -> bool {
        self.pull_request.is_some()
    }

    pub fn label_names(&self) -> BTreeSet<String> {
        self.labels.iter().map(|l| l.name.clone()).collect()
    }
}

/// A branch of a repository.
#[derive(Clone, Debug, PartialEq, Eq, Deserialize, Serialize)]
pub struct Branch {
    pub name: String,
    #[serde(default)]
    pub protected: bool,
}

/// File metadata and content from the contents API.
#[derive(Clone, Debug, Deserialize, Serialize)]
pub struct FileContent {
    pub path: String,
    #[serde(default)]
    pub content: String,
    #[serde(default)]
    pub encoding: String,
}

impl FileContent {
    /// Decodes the file body to a string.
    ///
    /// GitHub wraps base64 content at 60 characters, so embedded newlines are removed
    /// before decoding.
    pub fn decoded(&self) -> Result<String, Error> {
        if self.encoding != "base64" {
            return Ok(self.content.clone());
        }

        let compact: String = self.content.split_whitespace().collect();
        let bytes = base64::engine::general_purpose::STANDARD
            .decode(compact)
            .map_err(|e| Error::InvalidContent(format!("{}: {}", self.path, e)))?;
        String::from_utf8(bytes).map_err(|e| Error::InvalidContent(format!("{}: {}", self.path, e)))
    }
}
