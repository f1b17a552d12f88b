//! GitHub client construction from the configured credentials.

use github_client::{client_for_organization, create_app_client, create_token_client, GitHubClient};
use tracing::{debug, instrument};

use crate::config::Credentials;
use crate::errors::Error;

#[cfg(test)]
#[path = "auth_tests.rs"]
mod tests;

/// Creates a client that acts on `org`.
///
/// App credentials are exchanged for a token of the organization's installation. A personal
/// access token is used as is.
#[instrument(skip(credentials))]
pub async fn organization_client(
    credentials: &Credentials,
    org: &str,
) -> Result<GitHubClient, Error> {
    match credentials {
        Credentials::App {
            app_id,
            private_key,
        } => {
            debug!(app_id = app_id, "Authenticating as GitHub App installation");
            let app = create_app_client(*app_id, private_key).await?;
            Ok(client_for_organization(&app, org).await?)
        }
        Credentials::Token(token) => {
            debug!("Authenticating with personal access token");
            Ok(GitHubClient::new(create_token_client(token)?))
        }
    }
}

/// Creates a client authenticated as the GitHub App itself.
///
/// # Errors
///
/// Returns `Error::Auth` when only a token is configured, since installations can only be
/// listed with App credentials.
pub async fn app_client(credentials: &Credentials) -> Result<GitHubClient, Error> {
    match credentials {
        Credentials::App {
            app_id,
            private_key,
        } => Ok(GitHubClient::new(
            create_app_client(*app_id, private_key).await?,
        )),
        Credentials::Token(_) => Err(Error::Auth(
            "installation details require GitHub App credentials".to_string(),
        )),
    }
}
