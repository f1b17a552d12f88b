//! Tests for branch protection settings.

use super::*;

#[test]
fn test_branch_protection_spec_defaults() {
    let spec: BranchProtectionSpec = serde_yaml::from_str("{}").expect("Failed to parse");

    assert_eq!(spec, BranchProtectionSpec::default());
    assert!(!spec.default);
    assert!(spec.required_status_checks.is_none());
    assert!(spec.required_pull_request_reviews.is_none());
    assert!(spec.restrictions.is_none());
}

#[test]
fn test_status_checks_default_fields() {
    let spec: BranchProtectionSpec =
        serde_yaml::from_str("required_status_checks: {}").expect("Failed to parse");

    let checks = spec.required_status_checks.expect("Expected status checks");
    assert!(!checks.strict);
    assert!(checks.contexts.is_empty());
}

#[test]
fn test_reviews_mapping_is_parsed() {
    let yaml = r#"
        required_pull_request_reviews:
          dismiss_stale_reviews: true
          require_code_owner_reviews: true
          required_approving_review_count: 3
    "#;

    let spec: BranchProtectionSpec = serde_yaml::from_str(yaml).expect("Failed to parse");

    assert_eq!(
        spec.required_pull_request_reviews,
        Some(PullRequestReviewsSpec {
            dismiss_stale_reviews: true,
            require_code_owner_reviews: true,
            required_approving_review_count: 3,
        })
    );
}

#[test]
fn test_reviews_empty_value_requests_default_reviews() {
    let spec: BranchProtectionSpec =
        serde_yaml::from_str("required_pull_request_reviews:").expect("Failed to parse");

    assert_eq!(
        spec.required_pull_request_reviews,
        Some(PullRequestReviewsSpec::default())
    );
}

#[test]
fn test_reviews_toggle() {
    let on: BranchProtectionSpec =
        serde_yaml::from_str("required_pull_request_reviews: true").expect("Failed to parse");
    let off: BranchProtectionSpec =
        serde_yaml::from_str("required_pull_request_reviews: false").expect("Failed to parse");

    assert_eq!(
        on.required_pull_request_reviews
            .map(|r| r.required_approving_review_count),
        Some(1)
    );
    assert!(off.required_pull_request_reviews.is_none());
}

#[test]
fn test_restrictions_default_each_list() {
    let spec: BranchProtectionSpec =
        serde_yaml::from_str("restrictions:\n  teams: [core]").expect("Failed to parse");

    let restrictions = spec.restrictions.expect("Expected restrictions");
    assert!(restrictions.users.is_empty());
    assert_eq!(restrictions.teams, vec!["core".to_string()]);
    assert!(restrictions.apps.is_empty());
}
