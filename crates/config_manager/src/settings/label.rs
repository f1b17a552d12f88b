//! Label specifications from the organization document.

use serde::de::{self, Visitor};
use serde::{Deserialize, Deserializer, Serialize};
use std::collections::BTreeSet;
use std::fmt;

/// Color applied to a label that does not configure one.
pub const DEFAULT_LABEL_COLOR: &str = "000000";

fn default_color() -> String {
    DEFAULT_LABEL_COLOR.to_string()
}

/// Reads a color from the scalar's text, so `00e000` or `123456` stay as written.
fn deserialize_color<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    struct ColorVisitor;

    impl<'de> Visitor<'de> for ColorVisitor {
        type Value = String;

        fn expecting(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
            formatter.write_str("a hex color such as d73a4a")
        }

        fn visit_str<E: de::Error>(self, value: &str) -> Result<String, E> {
            Ok(value.trim_start_matches('#').to_string())
        }

        fn visit_u64<E: de::Error>(self, value: u64) -> Result<String, E> {
            Ok(format!("{:06}", value))
        }
    }

    deserializer.deserialize_str(ColorVisitor)
}

/// A label every managed repository should carry.
///
/// # Examples
///
/// ```rust
/// use config_manager::settings::LabelSpec;
///
/// let spec: LabelSpec = serde_yaml::from_str("name: bug").unwrap();
/// assert_eq!(spec.color, "000000");
/// assert!(spec.applies_to("any-repository"));
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LabelSpec {
    /// Label name. Unique within the document.
    pub name: String,

    /// Label color (hex code without #).
    #[serde(default = "default_color", deserialize_with = "deserialize_color")]
    pub color: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    /// Name of an existing label that should be renamed to `name`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub old_name: Option<String>,

    /// Repositories in which issues may be auto-labelled with this label.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub repos: Option<BTreeSet<String>>,
}

impl LabelSpec {
    /// Creates a spec with the default color and no optional fields.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            color: default_color(),
            description: None,
            old_name: None,
            repos: None,
        }
    }

    pub fn with_color(mut self, color: impl Into<String>) -> Self {
        self.color = color.into();
        self
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn with_old_name(mut self, old_name: impl Into<String>) -> Self {
        self.old_name = Some(old_name.into());
        self
    }

    pub fn with_repos<I, S>(mut self, repos: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.repos = Some(repos.into_iter().map(Into::into).collect());
        self
    }

    /// Returns true when auto-labelling may use this label in `repository`.
    pub fn applies_to(&self, repository: &str) -> bool {
        match &self.repos {
            Some(repos) => repos.contains(repository),
            None => true,
        }
    }
}

#[cfg(test)]
#[path = "label_tests.rs"]
mod tests;
