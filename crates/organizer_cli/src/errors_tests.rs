use super::*;

#[test]
fn test_error_messages() {
    assert_eq!(
        Error::Auth("missing token".to_string()).to_string(),
        "Authentication error: missing token"
    );
    assert_eq!(
        Error::NotFound {
            kind: "project".to_string(),
            name: "Roadmap".to_string()
        }
        .to_string(),
        "No project named 'Roadmap' was found"
    );
}

#[test]
fn test_github_error_is_transparent() {
    let error: Error = github_client::Error::NotFound.into();

    assert_eq!(error.to_string(), "Resource not found");
}

#[test]
fn test_organizer_error_converts() {
    let error: Error = organizer_core::OrganizerError::PlanValidation {
        field: "teams.core".to_string(),
        reason: "unknown permission 'write'".to_string(),
    }
    .into();

    assert!(matches!(error, Error::Organizer(_)));
    assert!(error.to_string().contains("teams.core"));
}
