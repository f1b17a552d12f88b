//! Label reconciliation.
//!
//! Compares the labels of a repository with the organization's label specs and plans the
//! creates, updates, renames and deletions that bring them in line.

use config_manager::LabelSpec;
use github_client::Label;
use std::collections::{BTreeMap, BTreeSet};

use crate::Operation;

#[cfg(test)]
#[path = "labels_tests.rs"]
mod tests;

/// Plans label changes for one repository.
///
/// Operations come out in this order:
/// 1. when `clean` is set, a `DeleteLabel` for each current label that no spec names,
///    either as `name` or as a pending `old_name`;
/// 2. for each spec, in order:
///    - a `RenameAndUpdateLabel` when its `old_name` exists;
///    - otherwise an `UpdateLabel` when a label with its name exists but differs;
///    - otherwise a `CreateLabel` when there is no label with its name.
///
/// # Examples
///
/// ```rust
/// use config_manager::LabelSpec;
/// use organizer_core::{plan_labels, Operation};
/// use std::collections::BTreeMap;
///
/// let desired = vec![LabelSpec::new("bug").with_color("ff0000")];
/// let operations = plan_labels(&BTreeMap::new(), &desired, false);
///
/// assert_eq!(
///     operations,
///     vec![Operation::CreateLabel {
///         name: "bug".to_string(),
///         color: "ff0000".to_string(),
///         description: None,
///     }]
/// );
/// ```
pub fn plan_labels(
    current: &BTreeMap<String, Label>,
    desired: &[LabelSpec],
    clean: bool,
) -> Vec<Operation> {
    let mut operations = Vec::new();

    if clean {
        let mut kept: BTreeSet<&str> = desired.iter().map(|spec| spec.name.as_str()).collect();
        kept.extend(desired.iter().filter_map(|spec| spec.old_name.as_deref()));

        operations.extend(
            current
                .keys()
                .filter(|name| !kept.contains(name.as_str()))
                .map(|name| Operation::DeleteLabel { name: name.clone() }),
        );
    }

    for spec in desired {
        if let Some(old_name) = spec.old_name.as_deref() {
            if current.contains_key(old_name) {
                operations.push(Operation::RenameAndUpdateLabel {
                    old_name: old_name.to_string(),
                    name: spec.name.clone(),
                    color: spec.color.clone(),
                    description: spec.description.clone(),
                });
                continue;
            }
        }

        match current.get(&spec.name) {
            Some(label) if label_matches(spec, label) => {}
            Some(_) => operations.push(Operation::UpdateLabel {
                name: spec.name.clone(),
                color: spec.color.clone(),
                description: spec.description.clone(),
            }),
            None => operations.push(Operation::CreateLabel {
                name: spec.name.clone(),
                color: spec.color.clone(),
                description: spec.description.clone(),
            }),
        }
    }

    operations
}

/// Returns true when `label` already has the color and description of `spec`.
///
/// Colors compare case-insensitively. An empty description is the same as none.
pub fn label_matches(spec: &LabelSpec, label: &Label) -> bool {
    spec.color.eq_ignore_ascii_case(&label.color)
        && non_empty(spec.description.as_deref()) == non_empty(label.description.as_deref())
}

fn non_empty(description: Option<&str>) -> Option<&str> {
    description.filter(|d| !d.is_empty())
}
