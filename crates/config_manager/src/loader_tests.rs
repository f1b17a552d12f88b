//! Tests for configuration loading.

use super::*;
use async_trait::async_trait;
use github_client::{
    Branch, BranchProtection, BranchProtectionPayload, Error, Issue, Label, Project,
    ProjectColumn, Repository, RepositorySettingsUpdate, Team, TeamRepository, TeamRole, User,
};
use std::sync::Mutex;
use std::time::Duration;

/// Serves a single configuration file and counts how often it is fetched.
struct ConfigFileClient {
    response: Mutex<Result<String, Error>>,
    requests: Mutex<Vec<(String, String, String)>>,
}

impl ConfigFileClient {
    fn serving(text: &str) -> Self {
        Self {
            response: Mutex::new(Ok(text.to_string())),
            requests: Mutex::new(Vec::new()),
        }
    }

    fn failing(error: Error) -> Self {
        Self {
            response: Mutex::new(Err(error)),
            requests: Mutex::new(Vec::new()),
        }
    }

    fn set_response(&self, response: Result<String, Error>) {
        *self.response.lock().unwrap() = response;
    }

    fn request_count(&self) -> usize {
        self.requests.lock().unwrap().len()
    }
}

fn clone_result(result: &Result<String, Error>) -> Result<String, Error> {
    match result {
        Ok(text) => Ok(text.clone()),
        Err(Error::NotFound) => Err(Error::NotFound),
        Err(Error::RateLimitExceeded) => Err(Error::RateLimitExceeded),
        Err(_) => Err(Error::InvalidResponse),
    }
}

#[async_trait]
impl OrganizationClient for ConfigFileClient {
    async fn get_file_content(&self, owner: &str, repo: &str, path: &str) -> Result<String, Error> {
        self.requests
            .lock()
            .unwrap()
            .push((owner.to_string(), repo.to_string(), path.to_string()));
        clone_result(&self.response.lock().unwrap())
    }

    async fn list_org_repositories(&self, _org: &str) -> Result<Vec<Repository>, Error> {
        Err(Error::ApiError())
    }

    async fn get_repository(&self, _owner: &str, _repo: &str) -> Result<Repository, Error> {
        Err(Error::ApiError())
    }

    async fn get_repository_topics(&self, _owner: &str, _repo: &str) -> Result<Vec<String>, Error> {
        Err(Error::ApiError())
    }

    async fn update_repository_settings(&self, _owner: &str, _repo: &str, _settings: &RepositorySettingsUpdate) -> Result<(), Error> {
        Err(Error::ApiError())
    }

    async fn list_labels(&self, _owner: &str, _repo: &str) -> Result<Vec<Label>, Error> {
        Err(Error::ApiError())
    }

    async fn create_label(&self, _owner: &str, _repo: &str, _name: &str, _color: &str, _description: Option<&str>) -> Result<(), Error> {
        Err(Error::ApiError())
    }

    async fn update_label(&self, _owner: &str, _repo: &str, _current_name: &str, _new_name: &str, _color: &str, _description: Option<&str>) -> Result<(), Error> {
        Err(Error::ApiError())
    }

    async fn delete_label(&self, _owner: &str, _repo: &str, _name: &str) -> Result<(), Error> {
        Err(Error::ApiError())
    }

    async fn list_teams(&self, _org: &str) -> Result<Vec<Team>, Error> {
        Err(Error::ApiError())
    }

    async fn list_team_repository_permissions(&self, _org: &str, _team_slug: &str) -> Result<Vec<TeamRepository>, Error> {
        Err(Error::ApiError())
    }

    async fn set_team_repository_permission(&self, _org: &str, _team_slug: &str, _owner: &str, _repo: &str, _permission: &str) -> Result<(), Error> {
        Err(Error::ApiError())
    }

    async fn remove_team_repository(&self, _org: &str, _team_slug: &str, _owner: &str, _repo: &str) -> Result<(), Error> {
        Err(Error::ApiError())
    }

    async fn list_team_members(&self, _org: &str, _team_slug: &str, _role: TeamRole) -> Result<Vec<User>, Error> {
        Err(Error::ApiError())
    }

    async fn set_team_membership(&self, _org: &str, _team_slug: &str, _username: &str, _role: TeamRole) -> Result<(), Error> {
        Err(Error::ApiError())
    }

    async fn remove_team_membership(&self, _org: &str, _team_slug: &str, _username: &str) -> Result<(), Error> {
        Err(Error::ApiError())
    }

    async fn list_branches(&self, _owner: &str, _repo: &str) -> Result<Vec<Branch>, Error> {
        Err(Error::ApiError())
    }

    async fn get_branch_protection(&self, _owner: &str, _repo: &str, _branch: &str) -> Result<Option<BranchProtection>, Error> {
        Err(Error::ApiError())
    }

    async fn update_branch_protection(&self, _owner: &str, _repo: &str, _branch: &str, _payload: &BranchProtectionPayload) -> Result<(), Error> {
        Err(Error::ApiError())
    }

    async fn get_vulnerability_alerts(&self, _owner: &str, _repo: &str) -> Result<bool, Error> {
        Err(Error::ApiError())
    }

    async fn set_vulnerability_alerts(&self, _owner: &str, _repo: &str, _enabled: bool) -> Result<(), Error> {
        Err(Error::ApiError())
    }

    async fn get_automated_security_fixes(&self, _owner: &str, _repo: &str) -> Result<bool, Error> {
        Err(Error::ApiError())
    }

    async fn set_automated_security_fixes(&self, _owner: &str, _repo: &str, _enabled: bool) -> Result<(), Error> {
        Err(Error::ApiError())
    }

    async fn list_org_projects(&self, _org: &str) -> Result<Vec<Project>, Error> {
        Err(Error::ApiError())
    }

    async fn list_repo_projects(&self, _owner: &str, _repo: &str) -> Result<Vec<Project>, Error> {
        Err(Error::ApiError())
    }

    async fn list_project_columns(&self, _project_id: u64) -> Result<Vec<ProjectColumn>, Error> {
        Err(Error::ApiError())
    }

    async fn create_project_card(&self, _column_id: u64, _issue_id: u64) -> Result<(), Error> {
        Err(Error::ApiError())
    }

    async fn get_issue(&self, _owner: &str, _repo: &str, _number: u64) -> Result<Issue, Error> {
        Err(Error::ApiError())
    }

    async fn list_open_issues(&self, _owner: &str, _repo: &str) -> Result<Vec<Issue>, Error> {
        Err(Error::ApiError())
    }

    async fn issue_has_projects(&self, _owner: &str, _repo: &str, _number: u64) -> Result<bool, Error> {
        Err(Error::ApiError())
    }

    async fn add_issue_labels(&self, _owner: &str, _repo: &str, _number: u64, _labels: &[String]) -> Result<(), Error> {
        Err(Error::ApiError())
    }
}

const DOCUMENT: &str = r#"
labels:
  - name: bug
repositories:
  default: {}
"#;

#[tokio::test]
async fn test_load_reads_default_location() {
    let client = ConfigFileClient::serving(DOCUMENT);
    let loader = ConfigurationLoader::new();

    let document = loader.load(&client, "test-org").await;

    assert!(document.is_some());
    assert_eq!(
        client.requests.lock().unwrap()[0],
        (
            "test-org".to_string(),
            ".github".to_string(),
            "organizer.yaml".to_string()
        )
    );
}

#[tokio::test]
async fn test_load_uses_configured_location() {
    let client = ConfigFileClient::serving(DOCUMENT);
    let loader = ConfigurationLoader::with_location("org-config", "settings/organizer.yml");

    loader.load(&client, "test-org").await;

    let requests = client.requests.lock().unwrap();
    assert_eq!(requests[0].1, "org-config");
    assert_eq!(requests[0].2, "settings/organizer.yml");
}

#[tokio::test]
async fn test_load_caches_document() {
    let client = ConfigFileClient::serving(DOCUMENT);
    let loader = ConfigurationLoader::new();

    let first = loader.load(&client, "test-org").await;
    client.set_response(Ok("labels_clean: true".to_string()));
    let second = loader.load(&client, "test-org").await;

    assert_eq!(first, second);
    assert_eq!(client.request_count(), 1);
}

#[tokio::test]
async fn test_load_caches_per_organization() {
    let client = ConfigFileClient::serving(DOCUMENT);
    let loader = ConfigurationLoader::new();

    loader.load(&client, "org-a").await;
    loader.load(&client, "org-b").await;

    assert_eq!(client.request_count(), 2);
}

#[tokio::test]
async fn test_load_refetches_after_expiry() {
    let client = ConfigFileClient::serving(DOCUMENT);
    let loader = ConfigurationLoader::new().with_cache_policy(TtlPolicy::new(
        Duration::ZERO,
        TtlPolicy::DEFAULT_MEDIUM,
        TtlPolicy::DEFAULT_LONG,
    ));

    loader.load(&client, "test-org").await;
    loader.load(&client, "test-org").await;

    assert_eq!(client.request_count(), 2);
}

#[tokio::test]
async fn test_missing_document_is_absent_and_not_cached() {
    let client = ConfigFileClient::failing(Error::NotFound);
    let loader = ConfigurationLoader::new();

    let missing = loader.load(&client, "test-org").await;
    client.set_response(Ok(DOCUMENT.to_string()));
    let created = loader.load(&client, "test-org").await;

    assert!(missing.is_none());
    assert!(created.is_some());
    assert_eq!(client.request_count(), 2);
}

#[tokio::test]
async fn test_fetch_failure_is_absent() {
    let client = ConfigFileClient::failing(Error::RateLimitExceeded);
    let loader = ConfigurationLoader::new();

    assert!(loader.load(&client, "test-org").await.is_none());
}

#[tokio::test]
async fn test_unparseable_document_is_absent() {
    let client = ConfigFileClient::serving("labels: [unclosed");
    let loader = ConfigurationLoader::new();

    assert!(loader.load(&client, "test-org").await.is_none());
}
