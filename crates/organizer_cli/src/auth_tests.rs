use super::*;

#[tokio::test]
async fn test_app_client_requires_app_credentials() {
    let result = app_client(&Credentials::Token("ghp_test".to_string())).await;

    assert!(matches!(result, Err(Error::Auth(_))));
}

#[tokio::test]
async fn test_invalid_private_key_is_an_auth_error() {
    let credentials = Credentials::App {
        app_id: 1,
        private_key: "not a pem".to_string(),
    };

    let result = app_client(&credentials).await;

    assert!(matches!(
        result,
        Err(Error::GitHub(github_client::Error::AuthError(_)))
    ));
}

#[tokio::test]
async fn test_token_client_needs_no_network() {
    let result = organization_client(&Credentials::Token("ghp_test".to_string()), "my-org").await;

    assert!(result.is_ok());
}
