//! Effective settings resolution.
//!
//! Resolution picks the entry of `repositories` that applies to a repository and walks its
//! `extends` chain.
//!
//! Entry selection, highest priority first:
//! 1. the entry named after the repository;
//! 2. the entry named by the repository's single `gho-<key>` topic;
//! 3. the `default` entry.
//!
//! A repository with more than one `gho-` topic is not routed by topic. An entry that is a
//! plain string is shorthand for `{extends: <string>}`.
//!
//! Inheritance is shallow: a top-level key in the child replaces the parent's value for
//! that key as a whole. The chain is followed at most `max_depth` hops; past that the
//! remaining ancestors are not merged. This bound is what stops a self-referencing or
//! cyclic chain, there is no cycle detection.

use serde_yaml::{Mapping, Value};
use tracing::debug;

use crate::settings::{Features, Merges, RepoSettings};
use crate::{ConfigDocument, ConfigurationError, ConfigurationResult};

#[cfg(test)]
#[path = "resolver_tests.rs"]
mod tests;

/// Maximum number of `extends` hops followed.
pub const DEFAULT_MAX_DEPTH: u32 = 5;

/// Prefix of topics that route a repository to a named entry.
pub const TOPIC_PREFIX: &str = "gho-";

/// Entry used when nothing more specific matches.
pub const DEFAULT_ENTRY: &str = "default";

const EXTENDS_KEY: &str = "extends";

/// Resolves the effective settings of a repository.
///
/// Returns `Ok(None)` when there is no document or no entry applies to the repository.
/// `Ok(Some(settings))` with empty settings means an entry applies but configures nothing.
/// An `extends` naming a missing entry ends inheritance there, `default` is not used instead.
///
/// # Errors
///
/// Returns [`ConfigurationError::InvalidSettings`] when the selected entry, or one of its
/// ancestors, has the wrong shape.
///
/// # Examples
///
/// ```rust
/// use config_manager::{resolve, ConfigDocument};
///
/// let yaml = r#"
/// repositories:
///   default:
///     features:
///       has_wiki: false
///   api: default
/// "#;
/// let document = ConfigDocument::parse(yaml).unwrap();
///
/// let settings = resolve(Some(&document), "api", &[]).unwrap().unwrap();
/// assert_eq!(settings.features.unwrap().has_wiki, Some(false));
/// ```
pub fn resolve(
    document: Option<&ConfigDocument>,
    repository: &str,
    topics: &[String],
) -> ConfigurationResult<Option<RepoSettings>> {
    resolve_with_depth(document, repository, topics, DEFAULT_MAX_DEPTH)
}

/// [`resolve`] with an explicit inheritance depth bound.
pub fn resolve_with_depth(
    document: Option<&ConfigDocument>,
    repository: &str,
    topics: &[String],
    max_depth: u32,
) -> ConfigurationResult<Option<RepoSettings>> {
    let Some(document) = document else {
        return Ok(None);
    };

    match resolve_mapping(document, repository, topics, max_depth)? {
        Some(mapping) => RepoSettings::from_mapping(repository, mapping).map(Some),
        None => Ok(None),
    }
}

/// Resolves the effective settings of a repository as an untyped mapping.
pub fn resolve_mapping(
    document: &ConfigDocument,
    repository: &str,
    topics: &[String],
    max_depth: u32,
) -> ConfigurationResult<Option<Mapping>> {
    if document.is_legacy() {
        debug!(repository = repository, "Using legacy configuration format");
        return Ok(Some(normalize_legacy(document.raw())));
    }

    let entry = document
        .repository_entry(repository)
        .or_else(|| topic_key(topics).and_then(|key| document.repository_entry(key)))
        .or_else(|| document.repository_entry(DEFAULT_ENTRY));

    match entry {
        Some(value) => resolve_entry(document, repository, value, max_depth).map(Some),
        None => {
            debug!(repository = repository, "No settings entry applies");
            Ok(None)
        }
    }
}

/// Returns the routing key of the repository's only `gho-` topic.
///
/// Returns `None` when there is no such topic or more than one.
pub fn topic_key(topics: &[String]) -> Option<&str> {
    let mut candidates = topics
        .iter()
        .filter_map(|topic| topic.strip_prefix(TOPIC_PREFIX));

    match (candidates.next(), candidates.next()) {
        (Some(key), None) => Some(key),
        _ => None,
    }
}

/// Converts a legacy flat document into grouped settings.
///
/// The feature flags move into `features`, the merge flags into `merges` and the
/// organization's `labels` are dropped.
pub fn normalize_legacy(raw: &Mapping) -> Mapping {
    let mut settings = raw.clone();
    settings.remove("labels");

    move_into_group(&mut settings, "features", &Features::KEYS);
    move_into_group(&mut settings, "merges", &Merges::KEYS);

    settings
}

fn move_into_group(settings: &mut Mapping, group: &str, keys: &[&str]) {
    let mut moved = Mapping::new();
    for key in keys {
        if let Some(value) = settings.remove(*key) {
            moved.insert(Value::String(key.to_string()), value);
        }
    }

    if moved.is_empty() {
        return;
    }

    let mut merged = match settings.remove(group) {
        Some(Value::Mapping(existing)) => existing,
        _ => Mapping::new(),
    };
    for (key, value) in moved {
        merged.insert(key, value);
    }
    settings.insert(Value::String(group.to_string()), Value::Mapping(merged));
}

fn resolve_entry(
    document: &ConfigDocument,
    repository: &str,
    value: &Value,
    max_depth: u32,
) -> ConfigurationResult<Mapping> {
    let mut settings = match value {
        Value::String(parent) => {
            let mut shorthand = Mapping::new();
            shorthand.insert(
                Value::String(EXTENDS_KEY.to_string()),
                Value::String(parent.clone()),
            );
            shorthand
        }
        Value::Mapping(mapping) => mapping.clone(),
        Value::Null => Mapping::new(),
        _ => {
            return Err(ConfigurationError::InvalidSettings {
                repository: repository.to_string(),
                reason: "a repository entry must be a mapping or the name of another entry"
                    .to_string(),
            })
        }
    };

    let Some(extends) = settings.remove(EXTENDS_KEY) else {
        return Ok(settings);
    };

    let parent_name = match extends {
        Value::String(name) => name,
        _ => {
            return Err(ConfigurationError::InvalidSettings {
                repository: repository.to_string(),
                reason: "'extends' must name another entry".to_string(),
            })
        }
    };

    if max_depth == 0 {
        debug!(
            repository = repository,
            parent = parent_name.as_str(),
            "Inheritance depth limit reached"
        );
        return Ok(settings);
    }

    let Some(parent_value) = document.repository_entry(&parent_name) else {
        debug!(
            repository = repository,
            parent = parent_name.as_str(),
            "Parent settings entry not found"
        );
        return Ok(settings);
    };

    let mut merged = resolve_entry(document, repository, parent_value, max_depth - 1)?;
    for (key, value) in settings {
        merged.insert(key, value);
    }
    Ok(merged)
}
