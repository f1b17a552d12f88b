//! Team membership settings.

use serde::{Deserialize, Serialize};

/// Membership of one team, from the organization document's `teams` section.
///
/// # Examples
///
/// ```rust
/// use config_manager::settings::TeamSettings;
///
/// let settings: TeamSettings = serde_yaml::from_str("members: [alice]\nmaintainers: [bob]").unwrap();
/// assert!(!settings.members_clean);
/// assert_eq!(settings.maintainers, vec!["bob".to_string()]);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct TeamSettings {
    #[serde(default)]
    pub members: Vec<String>,

    #[serde(default)]
    pub maintainers: Vec<String>,

    /// Remove members that are not listed.
    #[serde(default)]
    pub members_clean: bool,
}
