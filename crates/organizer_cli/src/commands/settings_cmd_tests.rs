//! Tests for the configuration views.

use super::*;
use organizer_core::Operation;
use std::collections::BTreeMap;

#[test]
fn test_render_document_without_configuration() {
    let output = render_document(None).unwrap();

    assert!(output.starts_with('#'));
}

#[test]
fn test_render_document_round_trips_yaml() {
    let document = ConfigDocument::parse("labels:\n  - name: bug\n    color: d73a4a\n").unwrap();

    let output = render_document(Some(&document)).unwrap();

    assert!(output.contains("bug"));
    assert!(output.contains("d73a4a"));
}

#[test]
fn test_render_settings_skips_unset_groups() {
    let settings = RepoSettings {
        delete_branch_on_merge: Some(true),
        teams: BTreeMap::from([("core".to_string(), "push".to_string())]),
        ..Default::default()
    };

    let output = render_settings("api", Some(&settings)).unwrap();

    assert!(output.contains("delete_branch_on_merge: true"));
    assert!(output.contains("core: push"));
    assert!(!output.contains("features"));
}

#[test]
fn test_render_settings_for_unmanaged_repository() {
    assert_eq!(
        render_settings("api", None).unwrap(),
        "# no settings apply to api"
    );
}

#[test]
fn test_render_plan_lists_tagged_operations() {
    let plan = RepositoryPlan {
        repository: "api".to_string(),
        settings: RepoSettings::default(),
        operations: vec![Operation::DeleteLabel {
            name: "stale".to_string(),
        }],
        failures: Vec::new(),
    };

    let output = render_plan(&plan).unwrap();
    let value: serde_json::Value = serde_json::from_str(&output).unwrap();

    assert_eq!(value[0]["operation"], "delete_label");
    assert_eq!(value[0]["name"], "stale");
}

#[test]
fn test_render_repositories() {
    let repositories = vec![
        Repository::new("api".to_string(), "my-org/api".to_string()),
        Repository::new("docs".to_string(), "my-org/docs".to_string()),
    ];

    assert_eq!(render_repositories(&repositories), "api\ndocs");
    assert_eq!(render_repositories(&[]), "");
}
