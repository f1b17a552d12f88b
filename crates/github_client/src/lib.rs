//! Crate for interacting with the GitHub REST API on behalf of the organizer.
//!
//! This crate provides the [`OrganizationClient`] capability trait, which lists every remote
//! read and mutation the organizer performs, and [`GitHubClient`], its implementation on top of
//! `octocrab`. It also contains helpers to authenticate as a GitHub App and to obtain a client
//! scoped to one organization's installation.

use async_trait::async_trait;
use http::StatusCode;
use jsonwebtoken::EncodingKey;
use octocrab::{Octocrab, Result as OctocrabResult};
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::json;
use tracing::{debug, error, info, instrument};

pub mod branch_protection;
pub mod errors;
pub mod label;
pub mod models;
pub mod repository;

pub use branch_protection::{
    BranchProtection, BranchProtectionPayload, DismissalRestrictions, RequiredPullRequestReviews,
    RequiredStatusChecks, Restrictions,
};
pub use errors::Error;
pub use label::{Label, LabelPayload};
pub use models::{
    Branch, FileContent, Installation, Issue, Project, ProjectColumn, RepositoryPermissions,
    Team, TeamRepository, TeamRole, User,
};
pub use repository::{Repository, RepositorySettingsUpdate};

// Reference the tests module in the separate file
#[cfg(test)]
#[path = "lib_tests.rs"]
mod tests;

/// Number of items requested per page when listing.
const PAGE_SIZE: usize = 100;

/// Remote capabilities the organizer consumes.
///
/// Every method maps to one GitHub REST (or GraphQL) call, or to a paginated series of
/// calls for the `list_*` methods. Methods return [`Error::NotFound`] when GitHub answers
/// 404 so that callers can tell a missing resource from a failed request.
///
/// Mutations are idempotent on the GitHub side: applying the same call twice leaves the
/// remote in the same state.
#[async_trait]
pub trait OrganizationClient: Send + Sync {
    /// Reads a file from a repository's default branch and returns its decoded text.
    async fn get_file_content(&self, owner: &str, repo: &str, path: &str)
        -> Result<String, Error>;

    /// Lists every repository in an organization.
    async fn list_org_repositories(&self, org: &str) -> Result<Vec<Repository>, Error>;

    /// Fetches a single repository.
    async fn get_repository(&self, owner: &str, repo: &str) -> Result<Repository, Error>;

    /// Lists the topics of a repository.
    async fn get_repository_topics(&self, owner: &str, repo: &str) -> Result<Vec<String>, Error>;

    /// Updates feature and merge settings. Only the fields set in `settings` change.
    async fn update_repository_settings(
        &self,
        owner: &str,
        repo: &str,
        settings: &RepositorySettingsUpdate,
    ) -> Result<(), Error>;

    /// Lists the labels defined on a repository.
    async fn list_labels(&self, owner: &str, repo: &str) -> Result<Vec<Label>, Error>;

    async fn create_label(
        &self,
        owner: &str,
        repo: &str,
        name: &str,
        color: &str,
        description: Option<&str>,
    ) -> Result<(), Error>;

    /// Edits the label currently named `current_name`, renaming it to `new_name`.
    async fn update_label(
        &self,
        owner: &str,
        repo: &str,
        current_name: &str,
        new_name: &str,
        color: &str,
        description: Option<&str>,
    ) -> Result<(), Error>;

    async fn delete_label(&self, owner: &str, repo: &str, name: &str) -> Result<(), Error>;

    /// Lists the teams of an organization.
    async fn list_teams(&self, org: &str) -> Result<Vec<Team>, Error>;

    /// Lists the repositories a team can access, with the team's permission flags.
    async fn list_team_repository_permissions(
        &self,
        org: &str,
        team_slug: &str,
    ) -> Result<Vec<TeamRepository>, Error>;

    async fn set_team_repository_permission(
        &self,
        org: &str,
        team_slug: &str,
        owner: &str,
        repo: &str,
        permission: &str,
    ) -> Result<(), Error>;

    async fn remove_team_repository(
        &self,
        org: &str,
        team_slug: &str,
        owner: &str,
        repo: &str,
    ) -> Result<(), Error>;

    /// Lists the members of a team holding `role`.
    async fn list_team_members(
        &self,
        org: &str,
        team_slug: &str,
        role: TeamRole,
    ) -> Result<Vec<User>, Error>;

    /// Adds a user to a team, or changes their role if they are already a member.
    async fn set_team_membership(
        &self,
        org: &str,
        team_slug: &str,
        username: &str,
        role: TeamRole,
    ) -> Result<(), Error>;

    async fn remove_team_membership(
        &self,
        org: &str,
        team_slug: &str,
        username: &str,
    ) -> Result<(), Error>;

    async fn list_branches(&self, owner: &str, repo: &str) -> Result<Vec<Branch>, Error>;

    /// Returns the protection of a branch, or `None` when the branch is not protected.
    async fn get_branch_protection(
        &self,
        owner: &str,
        repo: &str,
        branch: &str,
    ) -> Result<Option<BranchProtection>, Error>;

    async fn update_branch_protection(
        &self,
        owner: &str,
        repo: &str,
        branch: &str,
        payload: &BranchProtectionPayload,
    ) -> Result<(), Error>;

    async fn get_vulnerability_alerts(&self, owner: &str, repo: &str) -> Result<bool, Error>;

    async fn set_vulnerability_alerts(
        &self,
        owner: &str,
        repo: &str,
        enabled: bool,
    ) -> Result<(), Error>;

    async fn get_automated_security_fixes(&self, owner: &str, repo: &str)
        -> Result<bool, Error>;

    async fn set_automated_security_fixes(
        &self,
        owner: &str,
        repo: &str,
        enabled: bool,
    ) -> Result<(), Error>;

    /// Lists the classic project boards owned by an organization.
    async fn list_org_projects(&self, org: &str) -> Result<Vec<Project>, Error>;

    /// Lists the classic project boards owned by a repository.
    async fn list_repo_projects(&self, owner: &str, repo: &str) -> Result<Vec<Project>, Error>;

    async fn list_project_columns(&self, project_id: u64) -> Result<Vec<ProjectColumn>, Error>;

    /// Adds an issue to a project column as a card.
    async fn create_project_card(&self, column_id: u64, issue_id: u64) -> Result<(), Error>;

    async fn get_issue(&self, owner: &str, repo: &str, number: u64) -> Result<Issue, Error>;

    /// Lists open issues, oldest first. Pull requests are excluded.
    async fn list_open_issues(&self, owner: &str, repo: &str) -> Result<Vec<Issue>, Error>;

    /// Returns true when the issue is on at least one non-archived project card.
    async fn issue_has_projects(&self, owner: &str, repo: &str, number: u64)
        -> Result<bool, Error>;

    async fn add_issue_labels(
        &self,
        owner: &str,
        repo: &str,
        number: u64,
        labels: &[String],
    ) -> Result<(), Error>;
}

/// A client for interacting with the GitHub API.
///
/// The wrapped `Octocrab` instance decides the identity: an installation client obtained
/// from [`client_for_organization`] or a personal token client from [`create_token_client`].
#[derive(Debug, Clone)]
pub struct GitHubClient {
    client: Octocrab,
}

impl GitHubClient {
    /// Creates a new `GitHubClient` around an authenticated `Octocrab` instance.
    pub fn new(client: Octocrab) -> Self {
        Self { client }
    }

    /// Lists all installations for the authenticated GitHub App.
    ///
    /// The wrapped client must be authenticated as the app itself (JWT), not as an
    /// installation.
    ///
    /// # Errors
    ///
    /// Returns an `Error::InvalidResponse` if the API call fails or the response
    /// cannot be parsed.
    #[instrument(skip(self))]
    pub async fn list_installations(&self) -> Result<Vec<Installation>, Error> {
        info!("Listing installations for GitHub App using JWT authentication");

        let installations: Vec<octocrab::models::Installation> =
            self.get_all_pages("Failed to list installations", "/app/installations", &[])
                .await?;

        let converted: Vec<Installation> =
            installations.into_iter().map(Installation::from).collect();

        info!(
            count = converted.len(),
            "Successfully retrieved installations for GitHub App"
        );
        Ok(converted)
    }

    /// Fetches every page of a list endpoint.
    async fn get_all_pages<T: DeserializeOwned>(
        &self,
        message: &str,
        route: &str,
        parameters: &[(&str, &str)],
    ) -> Result<Vec<T>, Error> {
        let mut items = Vec::new();
        let mut page = 1u32;

        loop {
            let mut query: Vec<(&str, String)> = vec![
                ("per_page", PAGE_SIZE.to_string()),
                ("page", page.to_string()),
            ];
            query.extend(parameters.iter().map(|(k, v)| (*k, v.to_string())));

            let batch: Vec<T> = self
                .client
                .get(route, Some(&query))
                .await
                .map_err(|e| map_octocrab_error(message, e))?;

            let count = batch.len();
            items.extend(batch);
            if count < PAGE_SIZE {
                break;
            }
            page += 1;
        }

        debug!(route = route, count = items.len(), "Fetched all pages");
        Ok(items)
    }

    async fn put_without_content<P: Serialize + ?Sized>(
        &self,
        message: &str,
        route: String,
        body: Option<&P>,
    ) -> Result<(), Error> {
        let response = self
            .client
            ._put(route, body)
            .await
            .map_err(|e| map_octocrab_error(message, e))?;
        expect_success(message, response.status())
    }

    async fn delete_without_content(&self, message: &str, route: String) -> Result<(), Error> {
        let response = self
            .client
            ._delete(route, None::<&()>)
            .await
            .map_err(|e| map_octocrab_error(message, e))?;
        expect_success(message, response.status())
    }
}

#[async_trait]
impl OrganizationClient for GitHubClient {
    #[instrument(skip(self), fields(owner = %owner, repo = %repo, path = %path))]
    async fn get_file_content(
        &self,
        owner: &str,
        repo: &str,
        path: &str,
    ) -> Result<String, Error> {
        let route = format!("/repos/{}/{}/contents/{}", owner, repo, path);
        let file: FileContent = self
            .client
            .get(route, None::<&()>)
            .await
            .map_err(|e| map_octocrab_error("Failed to get file content", e))?;
        file.decoded()
    }

    #[instrument(skip(self), fields(org = %org))]
    async fn list_org_repositories(&self, org: &str) -> Result<Vec<Repository>, Error> {
        let route = format!("/orgs/{}/repos", org);
        self.get_all_pages("Failed to list organization repositories", &route, &[])
            .await
    }

    #[instrument(skip(self), fields(owner = %owner, repo = %repo))]
    async fn get_repository(&self, owner: &str, repo: &str) -> Result<Repository, Error> {
        let route = format!("/repos/{}/{}", owner, repo);
        self.client
            .get(route, None::<&()>)
            .await
            .map_err(|e| map_octocrab_error("Failed to get repository", e))
    }

    #[instrument(skip(self), fields(owner = %owner, repo = %repo))]
    async fn get_repository_topics(&self, owner: &str, repo: &str) -> Result<Vec<String>, Error> {
        #[derive(serde::Deserialize)]
        struct Topics {
            names: Vec<String>,
        }

        let route = format!("/repos/{}/{}/topics", owner, repo);
        let topics: Topics = self
            .client
            .get(route, None::<&()>)
            .await
            .map_err(|e| map_octocrab_error("Failed to get repository topics", e))?;
        Ok(topics.names)
    }

    #[instrument(skip(self, settings), fields(owner = %owner, repo = %repo))]
    async fn update_repository_settings(
        &self,
        owner: &str,
        repo: &str,
        settings: &RepositorySettingsUpdate,
    ) -> Result<(), Error> {
        let route = format!("/repos/{}/{}", owner, repo);
        let _: serde_json::Value = self
            .client
            .patch(route, Some(settings))
            .await
            .map_err(|e| map_octocrab_error("Failed to update repository settings", e))?;
        Ok(())
    }

    #[instrument(skip(self), fields(owner = %owner, repo = %repo))]
    async fn list_labels(&self, owner: &str, repo: &str) -> Result<Vec<Label>, Error> {
        let route = format!("/repos/{}/{}/labels", owner, repo);
        self.get_all_pages("Failed to list labels", &route, &[]).await
    }

    #[instrument(skip(self), fields(owner = %owner, repo = %repo, label = %name))]
    async fn create_label(
        &self,
        owner: &str,
        repo: &str,
        name: &str,
        color: &str,
        description: Option<&str>,
    ) -> Result<(), Error> {
        let route = format!("/repos/{}/{}/labels", owner, repo);
        let payload = LabelPayload::create(name, color, description);
        let _: serde_json::Value = self
            .client
            .post(route, Some(&payload))
            .await
            .map_err(|e| map_octocrab_error("Failed to create label", e))?;
        Ok(())
    }

    #[instrument(skip(self), fields(owner = %owner, repo = %repo, label = %current_name))]
    async fn update_label(
        &self,
        owner: &str,
        repo: &str,
        current_name: &str,
        new_name: &str,
        color: &str,
        description: Option<&str>,
    ) -> Result<(), Error> {
        let route = format!(
            "/repos/{}/{}/labels/{}",
            owner,
            repo,
            urlencoding::encode(current_name)
        );
        let payload = LabelPayload::update(new_name, color, description);
        let _: serde_json::Value = self
            .client
            .patch(route, Some(&payload))
            .await
            .map_err(|e| map_octocrab_error("Failed to update label", e))?;
        Ok(())
    }

    #[instrument(skip(self), fields(owner = %owner, repo = %repo, label = %name))]
    async fn delete_label(&self, owner: &str, repo: &str, name: &str) -> Result<(), Error> {
        let route = format!(
            "/repos/{}/{}/labels/{}",
            owner,
            repo,
            urlencoding::encode(name)
        );
        self.delete_without_content("Failed to delete label", route)
            .await
    }

    #[instrument(skip(self), fields(org = %org))]
    async fn list_teams(&self, org: &str) -> Result<Vec<Team>, Error> {
        let route = format!("/orgs/{}/teams", org);
        self.get_all_pages("Failed to list teams", &route, &[]).await
    }

    #[instrument(skip(self), fields(org = %org, team = %team_slug))]
    async fn list_team_repository_permissions(
        &self,
        org: &str,
        team_slug: &str,
    ) -> Result<Vec<TeamRepository>, Error> {
        let route = format!("/orgs/{}/teams/{}/repos", org, team_slug);
        self.get_all_pages("Failed to list team repositories", &route, &[])
            .await
    }

    #[instrument(skip(self), fields(org = %org, team = %team_slug, repo = %repo))]
    async fn set_team_repository_permission(
        &self,
        org: &str,
        team_slug: &str,
        owner: &str,
        repo: &str,
        permission: &str,
    ) -> Result<(), Error> {
        let route = format!("/orgs/{}/teams/{}/repos/{}/{}", org, team_slug, owner, repo);
        let body = json!({ "permission": permission });
        self.put_without_content("Failed to set team repository permission", route, Some(&body))
            .await
    }

    #[instrument(skip(self), fields(org = %org, team = %team_slug, repo = %repo))]
    async fn remove_team_repository(
        &self,
        org: &str,
        team_slug: &str,
        owner: &str,
        repo: &str,
    ) -> Result<(), Error> {
        let route = format!("/orgs/{}/teams/{}/repos/{}/{}", org, team_slug, owner, repo);
        self.delete_without_content("Failed to remove team repository access", route)
            .await
    }

    #[instrument(skip(self), fields(org = %org, team = %team_slug))]
    async fn list_team_members(
        &self,
        org: &str,
        team_slug: &str,
        role: TeamRole,
    ) -> Result<Vec<User>, Error> {
        let route = format!("/orgs/{}/teams/{}/members", org, team_slug);
        self.get_all_pages(
            "Failed to list team members",
            &route,
            &[("role", role.as_str())],
        )
        .await
    }

    #[instrument(skip(self), fields(org = %org, team = %team_slug, user = %username))]
    async fn set_team_membership(
        &self,
        org: &str,
        team_slug: &str,
        username: &str,
        role: TeamRole,
    ) -> Result<(), Error> {
        let route = format!(
            "/orgs/{}/teams/{}/memberships/{}",
            org, team_slug, username
        );
        let body = json!({ "role": role.as_str() });
        let _: serde_json::Value = self
            .client
            .put(route, Some(&body))
            .await
            .map_err(|e| map_octocrab_error("Failed to set team membership", e))?;
        Ok(())
    }

    #[instrument(skip(self), fields(org = %org, team = %team_slug, user = %username))]
    async fn remove_team_membership(
        &self,
        org: &str,
        team_slug: &str,
        username: &str,
    ) -> Result<(), Error> {
        let route = format!(
            "/orgs/{}/teams/{}/memberships/{}",
            org, team_slug, username
        );
        self.delete_without_content("Failed to remove team membership", route)
            .await
    }

    #[instrument(skip(self), fields(owner = %owner, repo = %repo))]
    async fn list_branches(&self, owner: &str, repo: &str) -> Result<Vec<Branch>, Error> {
        let route = format!("/repos/{}/{}/branches", owner, repo);
        self.get_all_pages("Failed to list branches", &route, &[])
            .await
    }

    #[instrument(skip(self), fields(owner = %owner, repo = %repo, branch = %branch))]
    async fn get_branch_protection(
        &self,
        owner: &str,
        repo: &str,
        branch: &str,
    ) -> Result<Option<BranchProtection>, Error> {
        let route = format!(
            "/repos/{}/{}/branches/{}/protection",
            owner,
            repo,
            urlencoding::encode(branch)
        );
        let result: OctocrabResult<BranchProtection> = self.client.get(route, None::<&()>).await;
        match result {
            Ok(protection) => Ok(Some(protection)),
            Err(e) => match map_octocrab_error("Failed to get branch protection", e) {
                Error::NotFound => Ok(None),
                other => Err(other),
            },
        }
    }

    #[instrument(skip(self, payload), fields(owner = %owner, repo = %repo, branch = %branch))]
    async fn update_branch_protection(
        &self,
        owner: &str,
        repo: &str,
        branch: &str,
        payload: &BranchProtectionPayload,
    ) -> Result<(), Error> {
        let route = format!(
            "/repos/{}/{}/branches/{}/protection",
            owner,
            repo,
            urlencoding::encode(branch)
        );
        let _: serde_json::Value = self
            .client
            .put(route, Some(payload))
            .await
            .map_err(|e| map_octocrab_error("Failed to update branch protection", e))?;
        Ok(())
    }

    #[instrument(skip(self), fields(owner = %owner, repo = %repo))]
    async fn get_vulnerability_alerts(&self, owner: &str, repo: &str) -> Result<bool, Error> {
        let route = format!("/repos/{}/{}/vulnerability-alerts", owner, repo);
        let response = self
            .client
            ._get(route)
            .await
            .map_err(|e| map_octocrab_error("Failed to get vulnerability alerts", e))?;
        match expect_success("Failed to get vulnerability alerts", response.status()) {
            Ok(()) => Ok(true),
            Err(Error::NotFound) => Ok(false),
            Err(e) => Err(e),
        }
    }

    #[instrument(skip(self), fields(owner = %owner, repo = %repo, enabled = enabled))]
    async fn set_vulnerability_alerts(
        &self,
        owner: &str,
        repo: &str,
        enabled: bool,
    ) -> Result<(), Error> {
        let route = format!("/repos/{}/{}/vulnerability-alerts", owner, repo);
        if enabled {
            self.put_without_content("Failed to enable vulnerability alerts", route, None::<&()>)
                .await
        } else {
            self.delete_without_content("Failed to disable vulnerability alerts", route)
                .await
        }
    }

    #[instrument(skip(self), fields(owner = %owner, repo = %repo))]
    async fn get_automated_security_fixes(
        &self,
        owner: &str,
        repo: &str,
    ) -> Result<bool, Error> {
        #[derive(serde::Deserialize)]
        struct Status {
            enabled: bool,
        }

        let route = format!("/repos/{}/{}/automated-security-fixes", owner, repo);
        let result: OctocrabResult<Status> = self.client.get(route, None::<&()>).await;
        match result {
            Ok(status) => Ok(status.enabled),
            Err(e) => match map_octocrab_error("Failed to get automated security fixes", e) {
                Error::NotFound => Ok(false),
                other => Err(other),
            },
        }
    }

    #[instrument(skip(self), fields(owner = %owner, repo = %repo, enabled = enabled))]
    async fn set_automated_security_fixes(
        &self,
        owner: &str,
        repo: &str,
        enabled: bool,
    ) -> Result<(), Error> {
        let route = format!("/repos/{}/{}/automated-security-fixes", owner, repo);
        if enabled {
            self.put_without_content(
                "Failed to enable automated security fixes",
                route,
                None::<&()>,
            )
            .await
        } else {
            self.delete_without_content("Failed to disable automated security fixes", route)
                .await
        }
    }

    #[instrument(skip(self), fields(org = %org))]
    async fn list_org_projects(&self, org: &str) -> Result<Vec<Project>, Error> {
        let route = format!("/orgs/{}/projects", org);
        self.get_all_pages("Failed to list organization projects", &route, &[])
            .await
    }

    #[instrument(skip(self), fields(owner = %owner, repo = %repo))]
    async fn list_repo_projects(&self, owner: &str, repo: &str) -> Result<Vec<Project>, Error> {
        let route = format!("/repos/{}/{}/projects", owner, repo);
        self.get_all_pages("Failed to list repository projects", &route, &[])
            .await
    }

    #[instrument(skip(self))]
    async fn list_project_columns(&self, project_id: u64) -> Result<Vec<ProjectColumn>, Error> {
        let route = format!("/projects/{}/columns", project_id);
        self.get_all_pages("Failed to list project columns", &route, &[])
            .await
    }

    #[instrument(skip(self))]
    async fn create_project_card(&self, column_id: u64, issue_id: u64) -> Result<(), Error> {
        let route = format!("/projects/columns/{}/cards", column_id);
        let body = json!({ "content_id": issue_id, "content_type": "Issue" });
        let _: serde_json::Value = self
            .client
            .post(route, Some(&body))
            .await
            .map_err(|e| map_octocrab_error("Failed to create project card", e))?;
        Ok(())
    }

    #[instrument(skip(self), fields(owner = %owner, repo = %repo, issue = number))]
    async fn get_issue(&self, owner: &str, repo: &str, number: u64) -> Result<Issue, Error> {
        let route = format!("/repos/{}/{}/issues/{}", owner, repo, number);
        self.client
            .get(route, None::<&()>)
            .await
            .map_err(|e| map_octocrab_error("Failed to get issue", e))
    }

    #[instrument(skip(self), fields(owner = %owner, repo = %repo))]
    async fn list_open_issues(&self, owner: &str, repo: &str) -> Result<Vec<Issue>, Error> {
        let route = format!("/repos/{}/{}/issues", owner, repo);
        let issues: Vec<Issue> = self
            .get_all_pages(
                "Failed to list issues",
                &route,
                &[("state", "open"), ("sort", "created"), ("direction", "asc")],
            )
            .await?;
        Ok(issues
            .into_iter()
            .filter(|issue| !issue.is_pull_request())
            .collect())
    }

    #[instrument(skip(self), fields(owner = %owner, repo = %repo, issue = number))]
    async fn issue_has_projects(
        &self,
        owner: &str,
        repo: &str,
        number: u64,
    ) -> Result<bool, Error> {
        let query = r#"
            query($owner: String!, $name: String!, $number: Int!) {
              repository(owner: $owner, name: $name) {
                issue(number: $number) {
                  projectCards(archivedStates: NOT_ARCHIVED, first: 1) {
                    totalCount
                  }
                }
              }
            }
        "#;
        let payload = json!({
            "query": query,
            "variables": { "owner": owner, "name": repo, "number": number },
        });

        let response: serde_json::Value = self
            .client
            .graphql(&payload)
            .await
            .map_err(|e| map_octocrab_error("Failed to query issue project cards", e))?;

        let total = response
            .pointer("/data/repository/issue/projectCards/totalCount")
            .and_then(|v| v.as_u64())
            .ok_or_else(|| {
                error!(
                    owner = owner,
                    repo = repo,
                    issue = number,
                    "Project card query returned no count"
                );
                Error::InvalidResponse
            })?;
        Ok(total > 0)
    }

    #[instrument(skip(self, labels), fields(owner = %owner, repo = %repo, issue = number))]
    async fn add_issue_labels(
        &self,
        owner: &str,
        repo: &str,
        number: u64,
        labels: &[String],
    ) -> Result<(), Error> {
        let route = format!("/repos/{}/{}/issues/{}/labels", owner, repo, number);
        let body = json!({ "labels": labels });
        let _: serde_json::Value = self
            .client
            .post(route, Some(&body))
            .await
            .map_err(|e| map_octocrab_error("Failed to add issue labels", e))?;
        Ok(())
    }
}

/// Creates a `GitHubClient` authenticated as the app installation of an organization.
///
/// # Arguments
///
/// * `app_client` - An `Octocrab` client authenticated as the GitHub App (JWT).
/// * `org` - The organization whose installation should be used.
///
/// # Errors
///
/// Returns `Error::AuthError` if the app is not installed on the organization or an
/// installation token cannot be created.
///
/// # Example
///
/// ```rust,no_run
/// use github_client::{client_for_organization, create_app_client, Error};
///
/// #[tokio::main]
/// async fn main() -> Result<(), Error> {
///     let private_key = std::fs::read_to_string("app.pem").unwrap();
///     let app = create_app_client(123456, &private_key).await?;
///     let client = client_for_organization(&app, "my-org").await?;
///     Ok(())
/// }
/// ```
#[instrument(skip(app_client))]
pub async fn client_for_organization(
    app_client: &Octocrab,
    org: &str,
) -> Result<GitHubClient, Error> {
    let route = format!("/orgs/{}/installation", org);
    let installation: octocrab::models::Installation =
        app_client.get(route, None::<&()>).await.map_err(|e| {
            log_octocrab_error("Failed to find organization installation", e);
            Error::AuthError(format!("The app is not installed on organization {}", org))
        })?;

    debug!(
        org = org,
        installation_id = *installation.id,
        "Found installation for organization"
    );

    let (client, _) = app_client
        .installation_and_token(installation.id)
        .await
        .map_err(|e| {
            log_octocrab_error("Failed to create installation token", e);
            Error::AuthError(format!(
                "Failed to create an installation token for organization {}",
                org
            ))
        })?;

    info!(org = org, "Created installation client for organization");
    Ok(GitHubClient::new(client))
}

/// Creates an `Octocrab` client authenticated as a GitHub App using a JWT token.
///
/// # Arguments
///
/// * `app_id` - The ID of the GitHub App.
/// * `private_key` - The private key associated with the GitHub App, in PEM format.
///
/// # Errors
///
/// Returns `Error::AuthError` if the private key cannot be parsed or the client cannot
/// be built.
#[instrument(skip(private_key))]
pub async fn create_app_client(app_id: u64, private_key: &str) -> Result<Octocrab, Error> {
    let key = EncodingKey::from_rsa_pem(private_key.as_bytes()).map_err(|e| {
        error!(
            app_id = app_id,
            error = %e,
            "Failed to parse RSA private key - key format is invalid"
        );
        Error::AuthError(format!(
            "Failed to translate the private key. Error was: {}",
            e
        ))
    })?;

    let octocrab = Octocrab::builder()
        .app(app_id.into(), key)
        .build()
        .map_err(|e| {
            error!(
                app_id = app_id,
                error = ?e,
                "Failed to build Octocrab client with GitHub App credentials"
            );
            Error::AuthError("Failed to build the GitHub App client.".to_string())
        })?;

    info!(app_id = app_id, "Successfully created GitHub App client");
    Ok(octocrab)
}

/// Creates an `Octocrab` client authenticated with a personal access token.
#[instrument(skip(token))]
pub fn create_token_client(token: &str) -> Result<Octocrab, Error> {
    Octocrab::builder()
        .personal_token(token.to_string())
        .build()
        .map_err(|_| Error::ApiError())
}

/// Maps a response status of a request without a response body.
fn expect_success(message: &str, status: StatusCode) -> Result<(), Error> {
    if status.is_success() {
        return Ok(());
    }
    if status == StatusCode::NOT_FOUND {
        return Err(Error::NotFound);
    }
    error!(status = status.as_u16(), "{}. Unexpected response status", message);
    if status == StatusCode::TOO_MANY_REQUESTS {
        return Err(Error::RateLimitExceeded);
    }
    Err(Error::InvalidResponse)
}

/// Maps an octocrab error to a crate error, logging everything except 404s.
fn map_octocrab_error(message: &str, e: octocrab::Error) -> Error {
    if let octocrab::Error::GitHub { source, .. } = &e {
        if source.status_code == StatusCode::NOT_FOUND {
            debug!(error_message = source.message, "{}. Resource not found", message);
            return Error::NotFound;
        }
        if source.status_code == StatusCode::TOO_MANY_REQUESTS
            || (source.status_code == StatusCode::FORBIDDEN
                && source.message.to_lowercase().contains("rate limit"))
        {
            error!(error_message = source.message, "{}. Rate limit exceeded", message);
            return Error::RateLimitExceeded;
        }
    }

    log_octocrab_error(message, e);
    Error::InvalidResponse
}

fn log_octocrab_error(message: &str, e: octocrab::Error) {
    match e {
        octocrab::Error::GitHub { source, backtrace } => error!(
            error_message = source.message,
            status = source.status_code.as_u16(),
            backtrace = backtrace.to_string(),
            "{}. Received an error from GitHub",
            message
        ),
        octocrab::Error::UriParse { source, backtrace } => error!(
            error_message = source.to_string(),
            backtrace = backtrace.to_string(),
            "{}. Failed to parse URI.",
            message
        ),
        octocrab::Error::Uri { source, backtrace } => error!(
            error_message = source.to_string(),
            backtrace = backtrace.to_string(),
            "{}, Failed to parse URI.",
            message
        ),
        octocrab::Error::Serde { source, backtrace } => error!(
            error_message = source.to_string(),
            backtrace = backtrace.to_string(),
            "{}. The response could not be deserialized.",
            message
        ),
        _ => error!(error_message = e.to_string(), "{}", message),
    };
}
