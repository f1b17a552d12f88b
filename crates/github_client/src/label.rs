//! Label domain types.
//!
//! This module contains types representing GitHub issue and pull request labels, both as
//! they are reported by the API and as they are sent when creating or editing a label.

use serde::{Deserialize, Serialize};

#[cfg(test)]
#[path = "label_tests.rs"]
mod tests;

/// Represents a label defined on a repository.
///
/// # Examples
///
/// ```
/// use github_client::Label;
///
/// let label = Label {
///     name: "bug".to_string(),
///     color: "d73a4a".to_string(),
///     description: Some("Something isn't working".to_string()),
/// };
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Label {
    /// The name of the label
    pub name: String,
    /// The color of the label, as a hex code without the leading `#`
    pub color: String,
    /// The description of the label, if one has been set
    #[serde(default)]
    pub description: Option<String>,
}

/// Request body for creating or editing a label.
///
/// When editing, `new_name` renames the label addressed in the request path.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LabelPayload {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub new_name: Option<String>,

    pub color: String,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

impl LabelPayload {
    /// Builds the body for `POST /repos/{owner}/{repo}/labels`.
    pub fn create(name: &str, color: &str, description: Option<&str>) -> Self {
        Self {
            name: Some(name.to_string()),
            new_name: None,
            color: color.to_string(),
            description: description.map(str::to_string),
        }
    }

    /// Builds the body for `PATCH /repos/{owner}/{repo}/labels/{name}`.
    pub fn update(new_name: &str, color: &str, description: Option<&str>) -> Self {
        Self {
            name: None,
            new_name: Some(new_name.to_string()),
            color: color.to_string(),
            description: description.map(str::to_string),
        }
    }
}
