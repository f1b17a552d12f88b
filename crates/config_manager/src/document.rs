//! The organization configuration document.
//!
//! The document is YAML. Its organization-wide sections (`labels`, `labels_clean`, `teams`,
//! `exclude_repositories`, `exclude_forks` and `topics_for_assignment`) are typed when the
//! document is parsed. Repository entries under `repositories` stay untyped until one is
//! resolved, so a malformed entry only affects the repositories that use it.
//!
//! A document without a `repositories` key is in the legacy format: the whole document is
//! the settings of every repository.

use serde::Deserialize;
use serde_yaml::{Mapping, Value};
use std::collections::{BTreeMap, BTreeSet};

use crate::settings::{LabelSpec, TeamSettings};
use crate::{ConfigurationError, ConfigurationResult};

#[cfg(test)]
#[path = "document_tests.rs"]
mod tests;

/// Key holding the repository entries.
pub const REPOSITORIES_KEY: &str = "repositories";

fn default_true() -> bool {
    true
}

#[derive(Debug, Deserialize)]
struct OrganizationSections {
    #[serde(default)]
    labels: Vec<LabelSpec>,

    #[serde(default)]
    labels_clean: bool,

    #[serde(default)]
    exclude_repositories: BTreeSet<String>,

    #[serde(default)]
    exclude_forks: bool,

    #[serde(default = "default_true")]
    topics_for_assignment: bool,
}

/// A parsed organization configuration document.
///
/// # Examples
///
/// ```rust
/// use config_manager::ConfigDocument;
///
/// let yaml = r#"
/// labels:
///   - name: bug
///     color: d73a4a
/// repositories:
///   default:
///     features:
///       has_wiki: false
/// "#;
/// let document = ConfigDocument::parse(yaml).unwrap();
/// assert!(!document.is_legacy());
/// assert_eq!(document.labels().len(), 1);
/// assert!(document.topics_for_assignment());
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct ConfigDocument {
    raw: Mapping,
    labels: Vec<LabelSpec>,
    labels_clean: bool,
    teams: BTreeMap<String, TeamSettings>,
    exclude_repositories: BTreeSet<String>,
    exclude_forks: bool,
    topics_for_assignment: bool,
}

impl ConfigDocument {
    /// Parses YAML text. An empty document is an empty mapping.
    ///
    /// The organization sections are read from the text itself, so a label color that YAML
    /// would resolve to a number, such as `00e000`, keeps its spelling.
    pub fn parse(text: &str) -> ConfigurationResult<Self> {
        let value: Value =
            serde_yaml::from_str(text).map_err(|e| ConfigurationError::ParseError {
                reason: e.to_string(),
            })?;

        match value {
            Value::Mapping(mut raw) => {
                let sections: OrganizationSections =
                    serde_yaml::from_str(text).map_err(|e| ConfigurationError::ParseError {
                        reason: e.to_string(),
                    })?;
                if let Some(Value::Sequence(labels)) = raw.get_mut("labels") {
                    for (label, spec) in labels.iter_mut().zip(&sections.labels) {
                        if let Some(color) = label.get_mut("color") {
                            *color = Value::String(spec.color.clone());
                        }
                    }
                }
                Self::from_sections(raw, sections)
            }
            Value::Null => Self::from_mapping(Mapping::new()),
            _ => Err(ConfigurationError::ParseError {
                reason: "the document must be a mapping".to_string(),
            }),
        }
    }

    /// Builds a document from an already parsed mapping.
    ///
    /// Numeric label colors are read as their decimal digits padded to six characters.
    pub fn from_mapping(raw: Mapping) -> ConfigurationResult<Self> {
        let mut typed = raw.clone();
        if let Some(Value::Sequence(labels)) = typed.get_mut("labels") {
            for color in labels.iter_mut().filter_map(|label| label.get_mut("color")) {
                if let Value::Number(number) = color {
                    let text = match number.as_u64() {
                        Some(digits) => format!("{:06}", digits),
                        None => number.to_string(),
                    };
                    *color = Value::String(text);
                }
            }
        }

        let sections: OrganizationSections = serde_yaml::from_value(Value::Mapping(typed))
            .map_err(|e| ConfigurationError::ParseError {
                reason: e.to_string(),
            })?;
        Self::from_sections(raw, sections)
    }

    fn from_sections(raw: Mapping, sections: OrganizationSections) -> ConfigurationResult<Self> {
        let mut names = BTreeSet::new();
        for label in &sections.labels {
            if !names.insert(label.name.as_str()) {
                return Err(ConfigurationError::InvalidConfiguration {
                    field: "labels".to_string(),
                    reason: format!("duplicate label name '{}'", label.name),
                });
            }
        }

        match raw.get(REPOSITORIES_KEY) {
            None | Some(Value::Null) | Some(Value::Mapping(_)) => {}
            Some(_) => {
                return Err(ConfigurationError::InvalidConfiguration {
                    field: REPOSITORIES_KEY.to_string(),
                    reason: "must be a mapping of repository names to settings".to_string(),
                })
            }
        }

        // In the legacy format `teams` holds the repository's team permissions.
        let teams = if raw.contains_key(REPOSITORIES_KEY) {
            match raw.get("teams") {
                Some(value) if !value.is_null() => serde_yaml::from_value(value.clone())
                    .map_err(|e| ConfigurationError::InvalidConfiguration {
                        field: "teams".to_string(),
                        reason: e.to_string(),
                    })?,
                _ => BTreeMap::new(),
            }
        } else {
            BTreeMap::new()
        };

        Ok(Self {
            raw,
            labels: sections.labels,
            labels_clean: sections.labels_clean,
            teams,
            exclude_repositories: sections.exclude_repositories,
            exclude_forks: sections.exclude_forks,
            topics_for_assignment: sections.topics_for_assignment,
        })
    }

    /// The document as parsed.
    pub fn raw(&self) -> &Mapping {
        &self.raw
    }

    /// Returns true when the document has no `repositories` key.
    pub fn is_legacy(&self) -> bool {
        !self.raw.contains_key(REPOSITORIES_KEY)
    }

    /// Returns the raw entry stored under `key` in `repositories`.
    pub fn repository_entry(&self, key: &str) -> Option<&Value> {
        self.raw
            .get(REPOSITORIES_KEY)
            .and_then(Value::as_mapping)
            .and_then(|repositories| repositories.get(key))
    }

    /// Names of the entries in `repositories`, in document order.
    pub fn repository_keys(&self) -> Vec<String> {
        self.raw
            .get(REPOSITORIES_KEY)
            .and_then(Value::as_mapping)
            .map(|repositories| {
                repositories
                    .keys()
                    .filter_map(|k| k.as_str().map(str::to_string))
                    .collect()
            })
            .unwrap_or_default()
    }

    pub fn labels(&self) -> &[LabelSpec] {
        &self.labels
    }

    /// Returns the label spec named `name`.
    pub fn label(&self, name: &str) -> Option<&LabelSpec> {
        self.labels.iter().find(|label| label.name == name)
    }

    pub fn labels_clean(&self) -> bool {
        self.labels_clean
    }

    /// Team name to membership settings.
    pub fn teams(&self) -> &BTreeMap<String, TeamSettings> {
        &self.teams
    }

    pub fn exclude_repositories(&self) -> &BTreeSet<String> {
        &self.exclude_repositories
    }

    pub fn is_excluded(&self, repository: &str) -> bool {
        self.exclude_repositories.contains(repository)
    }

    pub fn exclude_forks(&self) -> bool {
        self.exclude_forks
    }

    /// Whether repository topics take part in settings routing.
    pub fn topics_for_assignment(&self) -> bool {
        self.topics_for_assignment
    }

    /// Serializes the document back to YAML.
    pub fn to_yaml(&self) -> ConfigurationResult<String> {
        serde_yaml::to_string(&self.raw).map_err(|e| ConfigurationError::ParseError {
            reason: e.to_string(),
        })
    }
}
