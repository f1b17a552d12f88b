//! GitHub App installation details.
//!
//! Both commands need App credentials, a personal access token cannot list installations.

use github_client::{GitHubClient, Installation};
use tracing::{info, instrument};

use crate::commands::to_json;
use crate::errors::Error;

#[cfg(test)]
#[path = "app_cmd_tests.rs"]
mod tests;

#[instrument(skip(client))]
pub async fn app_info(client: &GitHubClient) -> Result<(), Error> {
    let installations = client.list_installations().await?;
    info!(count = installations.len(), "Found installations");
    println!("{}", to_json(&installations)?);
    Ok(())
}

#[instrument(skip(client))]
pub async fn org_info(client: &GitHubClient, org: &str) -> Result<(), Error> {
    let installations = client.list_installations().await?;
    let installation = find_installation(&installations, org).ok_or_else(|| Error::NotFound {
        kind: "installation for organization".to_string(),
        name: org.to_string(),
    })?;
    println!("{}", to_json(installation)?);
    Ok(())
}

/// Finds the installation on account `org`, ignoring case.
pub fn find_installation<'a>(
    installations: &'a [Installation],
    org: &str,
) -> Option<&'a Installation> {
    installations
        .iter()
        .find(|installation| installation.account.login.eq_ignore_ascii_case(org))
}
