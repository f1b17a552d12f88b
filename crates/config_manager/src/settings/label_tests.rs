//! Tests for label specifications.

use super::*;

#[test]
fn test_label_spec_defaults() {
    let spec: LabelSpec = serde_yaml::from_str("name: bug").expect("Failed to parse");

    assert_eq!(spec.name, "bug");
    assert_eq!(spec.color, DEFAULT_LABEL_COLOR);
    assert_eq!(spec.description, None);
    assert_eq!(spec.old_name, None);
    assert_eq!(spec.repos, None);
}

#[test]
fn test_label_spec_deserialization() {
    let yaml = r#"
        name: "good first issue"
        color: 7057ff
        description: Good for newcomers
        old_name: beginner
        repos:
          - api
          - web
    "#;

    let spec: LabelSpec = serde_yaml::from_str(yaml).expect("Failed to parse");

    assert_eq!(spec.name, "good first issue");
    assert_eq!(spec.color, "7057ff");
    assert_eq!(spec.description.as_deref(), Some("Good for newcomers"));
    assert_eq!(spec.old_name.as_deref(), Some("beginner"));
    assert!(spec.applies_to("api"));
    assert!(!spec.applies_to("docs"));
}

#[test]
fn test_label_spec_without_repos_applies_everywhere() {
    let spec = LabelSpec::new("triage");

    assert!(spec.applies_to("api"));
    assert!(spec.applies_to("web"));
}

#[test]
fn test_label_spec_builders() {
    let spec = LabelSpec::new("bug")
        .with_color("ff0000")
        .with_description("Something isn't working")
        .with_old_name("defect")
        .with_repos(["api"]);

    assert_eq!(spec.color, "ff0000");
    assert_eq!(spec.description.as_deref(), Some("Something isn't working"));
    assert_eq!(spec.old_name.as_deref(), Some("defect"));
    assert!(spec.applies_to("api"));
}

#[test]
fn test_label_spec_numeric_color_keeps_leading_zeros() {
    let spec: LabelSpec = serde_yaml::from_str("name: bug\ncolor: 000000").expect("Failed to parse");
    assert_eq!(spec.color, "000000");

    let spec: LabelSpec = serde_yaml::from_str("name: bug\ncolor: 012345").expect("Failed to parse");
    assert_eq!(spec.color, "012345");
}

#[test]
fn test_label_spec_color_strips_hash() {
    let spec: LabelSpec =
        serde_yaml::from_str("name: bug\ncolor: '#d73a4a'").expect("Failed to parse");
    assert_eq!(spec.color, "d73a4a");
}

#[test]
fn test_label_spec_color_that_reads_as_float_keeps_its_text() {
    let spec: LabelSpec = serde_yaml::from_str("name: x\ncolor: 00e000").expect("Failed to parse");
    assert_eq!(spec.color, "00e000");

    let spec: LabelSpec = serde_yaml::from_str("name: x\ncolor: 1e0000").expect("Failed to parse");
    assert_eq!(spec.color, "1e0000");
}
