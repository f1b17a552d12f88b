//! Dependency security settings.

use serde::{Deserialize, Serialize};

/// The `dependency_security` group. Unset fields are left alone on the remote.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct DependencySecurity {
    /// Vulnerability alerts
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub alerts: Option<bool>,

    /// Automated security fixes. Requires alerts.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub automatic_fixes: Option<bool>,
}
