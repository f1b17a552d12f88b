//! Tests for effective repository settings.

use super::*;

fn mapping(yaml: &str) -> Mapping {
    serde_yaml::from_str(yaml).expect("Failed to parse mapping")
}

#[test]
fn test_from_mapping_reads_every_group() {
    let yaml = r#"
        features:
          has_issues: true
          has_projects: false
        merges:
          allow_squash_merge: true
        delete_branch_on_merge: true
        branches:
          main:
            enforce_admins: true
        issues:
          auto_label: [triage]
        dependency_security:
          alerts: true
        teams:
          developers: push
        teams_clean: true
    "#;

    let settings = RepoSettings::from_mapping("api", mapping(yaml)).expect("Failed to build");

    let features = settings.features.expect("Expected features");
    assert_eq!(features.has_issues, Some(true));
    assert_eq!(features.has_projects, Some(false));
    assert_eq!(features.has_wiki, None);
    assert_eq!(
        settings.merges.and_then(|m| m.allow_squash_merge),
        Some(true)
    );
    assert_eq!(settings.delete_branch_on_merge, Some(true));
    assert!(settings.branches["main"].enforce_admins);
    assert!(settings.issues.is_some());
    assert_eq!(
        settings.dependency_security.and_then(|d| d.alerts),
        Some(true)
    );
    assert_eq!(settings.teams["developers"], "push");
    assert!(settings.teams_clean);
}

#[test]
fn test_from_mapping_ignores_unknown_keys() {
    let settings = RepoSettings::from_mapping("api", mapping("custom_key: 1"))
        .expect("Failed to build");

    assert!(settings.is_empty());
}

#[test]
fn test_from_mapping_reports_repository_on_bad_shape() {
    let result = RepoSettings::from_mapping("api", mapping("features: [has_issues]"));

    match result {
        Err(ConfigurationError::InvalidSettings { repository, .. }) => {
            assert_eq!(repository, "api")
        }
        other => panic!("Expected InvalidSettings, got {:?}", other),
    }
}

#[test]
fn test_empty_settings_are_empty() {
    let settings = RepoSettings::from_mapping("api", Mapping::new()).expect("Failed to build");

    assert!(settings.is_empty());
    assert!(!settings.teams_clean);
}

#[test]
fn test_group_keys_match_serialized_names() {
    let features = Features {
        has_issues: Some(true),
        has_wiki: Some(true),
        has_downloads: Some(true),
        has_projects: Some(true),
    };
    let value = serde_yaml::to_value(&features).expect("Failed to serialize");

    for key in Features::KEYS {
        assert!(value.get(key).is_some(), "missing {key}");
    }
}
