//! In-memory GitHub organization used by the unit tests.
//!
//! [`InMemoryGitHub`] keeps a simulated remote for a single organization and applies every
//! mutation to it, so planning again after applying shows what is left to do. Every mutating
//! call is recorded in `calls`.

use async_trait::async_trait;
use github_client::branch_protection::{
    ActorRef, ActorsState, EnabledState, PullRequestReviewsState, RestrictionsState,
    StatusChecksState,
};
use github_client::models::IssueLabel;
use github_client::{
    Branch, BranchProtection, BranchProtectionPayload, Error, Issue, Label, OrganizationClient,
    Project, ProjectColumn, Repository, RepositoryPermissions, RepositorySettingsUpdate, Team,
    TeamRepository, TeamRole, User,
};
use std::collections::{BTreeMap, BTreeSet};
use std::sync::{Mutex, MutexGuard, PoisonError};

#[derive(Debug, Clone)]
pub struct RemoteRepository {
    pub repository: Repository,
    pub topics: Vec<String>,
    pub labels: BTreeMap<String, Label>,
    pub branches: BTreeMap<String, Option<BranchProtectionPayload>>,
    pub vulnerability_alerts: bool,
    pub automated_security_fixes: bool,
    pub issues: Vec<Issue>,
    /// Issue ids already on a project
    pub issues_on_projects: BTreeSet<u64>,
    pub projects: Vec<Project>,
}

impl RemoteRepository {
    pub fn new(name: &str) -> Self {
        let mut branches = BTreeMap::new();
        branches.insert("main".to_string(), None);
        Self {
            repository: Repository::new(name.to_string(), format!("test-org/{}", name))
                .with_default_branch("main"),
            topics: Vec::new(),
            labels: BTreeMap::new(),
            branches,
            vulnerability_alerts: false,
            automated_security_fixes: false,
            issues: Vec::new(),
            issues_on_projects: BTreeSet::new(),
            projects: Vec::new(),
        }
    }

    pub fn with_label(mut self, name: &str, color: &str) -> Self {
        self.labels.insert(
            name.to_string(),
            Label {
                name: name.to_string(),
                color: color.to_string(),
                description: None,
            },
        );
        self
    }

    pub fn with_topics(mut self, topics: &[&str]) -> Self {
        self.topics = topics.iter().map(|t| t.to_string()).collect();
        self
    }

    pub fn with_issue(mut self, id: u64, number: u64, labels: &[&str]) -> Self {
        self.issues.push(Issue {
            id,
            number,
            title: format!("Issue {}", number),
            labels: labels
                .iter()
                .map(|name| IssueLabel {
                    name: name.to_string(),
                })
                .collect(),
            pull_request: None,
        });
        self
    }
}

#[derive(Debug, Clone, Default)]
pub struct RemoteTeam {
    pub team: Option<Team>,
    /// Highest permission per repository
    pub repositories: BTreeMap<String, String>,
    pub members: BTreeMap<String, TeamRole>,
}

#[derive(Debug, Default)]
pub struct RemoteState {
    pub files: BTreeMap<String, String>,
    pub repositories: BTreeMap<String, RemoteRepository>,
    pub teams: BTreeMap<String, RemoteTeam>,
    pub org_projects: Vec<Project>,
    pub columns: BTreeMap<u64, Vec<ProjectColumn>>,
    /// `(column_id, issue_id)` pairs
    pub cards: Vec<(u64, u64)>,
    /// Repositories whose reads fail with an API error
    pub broken_repositories: BTreeSet<String>,
    pub calls: Vec<String>,
    pub list_teams_calls: usize,
    pub list_org_projects_calls: usize,
}

#[derive(Debug, Default)]
pub struct InMemoryGitHub {
    state: Mutex<RemoteState>,
}

impl InMemoryGitHub {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> MutexGuard<'_, RemoteState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn with_config(self, yaml: &str) -> Self {
        self.state()
            .files
            .insert(".github/organizer.yaml".to_string(), yaml.to_string());
        self
    }

    pub fn with_repository(self, repository: RemoteRepository) -> Self {
        self.state()
            .repositories
            .insert(repository.repository.name().to_string(), repository);
        self
    }

    pub fn with_team(self, id: u64, name: &str) -> Self {
        let slug = name.to_lowercase().replace(' ', "-");
        self.state().teams.insert(
            slug.clone(),
            RemoteTeam {
                team: Some(Team {
                    id,
                    name: name.to_string(),
                    slug,
                }),
                ..Default::default()
            },
        );
        self
    }

    pub fn with_team_access(self, slug: &str, repository: &str, permission: &str) -> Self {
        if let Some(team) = self.state().teams.get_mut(slug) {
            team.repositories
                .insert(repository.to_string(), permission.to_string());
        }
        self
    }

    pub fn with_team_member(self, slug: &str, login: &str, role: TeamRole) -> Self {
        if let Some(team) = self.state().teams.get_mut(slug) {
            team.members.insert(login.to_string(), role);
        }
        self
    }

    pub fn with_org_project(self, id: u64, name: &str, columns: &[(u64, &str)]) -> Self {
        {
            let mut state = self.state();
            state.org_projects.push(Project {
                id,
                name: name.to_string(),
            });
            state.columns.insert(
                id,
                columns
                    .iter()
                    .map(|(id, name)| ProjectColumn {
                        id: *id,
                        name: name.to_string(),
                    })
                    .collect(),
            );
        }
        self
    }

    pub fn with_broken_repository(self, name: &str) -> Self {
        self.state().broken_repositories.insert(name.to_string());
        self
    }

    pub fn calls(&self) -> Vec<String> {
        self.state().calls.clone()
    }

    pub fn clear_calls(&self) {
        self.state().calls.clear();
    }

    fn record(&self, call: String) {
        self.state().calls.push(call);
    }

    fn with_repo<T>(
        &self,
        repo: &str,
        f: impl FnOnce(&mut RemoteRepository) -> Result<T, Error>,
    ) -> Result<T, Error> {
        let mut state = self.state();
        if state.broken_repositories.contains(repo) {
            return Err(Error::InvalidResponse);
        }
        match state.repositories.get_mut(repo) {
            Some(repository) => f(repository),
            None => Err(Error::NotFound),
        }
    }

    fn with_team_mut<T>(
        &self,
        slug: &str,
        f: impl FnOnce(&mut RemoteTeam) -> T,
    ) -> Result<T, Error> {
        match self.state().teams.get_mut(slug) {
            Some(team) => Ok(f(team)),
            None => Err(Error::NotFound),
        }
    }
}

fn cumulative_flags(permission: &str) -> RepositoryPermissions {
    RepositoryPermissions {
        pull: true,
        push: matches!(permission, "push" | "admin"),
        admin: permission == "admin",
    }
}

fn enabled(value: bool) -> Option<EnabledState> {
    Some(EnabledState { enabled: value })
}

fn actors(logins: &[String]) -> Vec<ActorRef> {
    logins
        .iter()
        .map(|login| ActorRef {
            login: Some(login.clone()),
            slug: None,
        })
        .collect()
}

fn slugs(names: &[String]) -> Vec<ActorRef> {
    names
        .iter()
        .map(|slug| ActorRef {
            login: None,
            slug: Some(slug.clone()),
        })
        .collect()
}

/// Reports a stored payload the way GitHub's protection endpoint would.
fn reported_protection(payload: &BranchProtectionPayload) -> BranchProtection {
    BranchProtection {
        required_status_checks: payload.required_status_checks.as_ref().map(|checks| {
            StatusChecksState {
                strict: checks.strict,
                contexts: checks.contexts.clone(),
            }
        }),
        enforce_admins: enabled(payload.enforce_admins),
        required_pull_request_reviews: payload.required_pull_request_reviews.as_ref().map(
            |reviews| PullRequestReviewsState {
                dismissal_restrictions: Some(ActorsState {
                    users: actors(&reviews.dismissal_restrictions.users),
                    teams: slugs(&reviews.dismissal_restrictions.teams),
                }),
                dismiss_stale_reviews: reviews.dismiss_stale_reviews,
                require_code_owner_reviews: reviews.require_code_owner_reviews,
                required_approving_review_count: reviews.required_approving_review_count,
            },
        ),
        restrictions: payload.restrictions.as_ref().map(|r| RestrictionsState {
            users: actors(&r.users),
            teams: slugs(&r.teams),
            apps: slugs(&r.apps),
        }),
        required_linear_history: enabled(payload.required_linear_history),
        allow_force_pushes: enabled(payload.allow_force_pushes),
        allow_deletions: enabled(payload.allow_deletions),
    }
}

#[async_trait]
impl OrganizationClient for InMemoryGitHub {
    async fn get_file_content(&self, _owner: &str, repo: &str, path: &str) -> Result<String, Error> {
        self.state()
            .files
            .get(&format!("{}/{}", repo, path))
            .cloned()
            .ok_or(Error::NotFound)
    }

    async fn list_org_repositories(&self, _org: &str) -> Result<Vec<Repository>, Error> {
        Ok(self
            .state()
            .repositories
            .values()
            .map(|r| r.repository.clone())
            .collect())
    }

    async fn get_repository(&self, _owner: &str, repo: &str) -> Result<Repository, Error> {
        self.with_repo(repo, |r| Ok(r.repository.clone()))
    }

    async fn get_repository_topics(&self, _owner: &str, repo: &str) -> Result<Vec<String>, Error> {
        self.with_repo(repo, |r| Ok(r.topics.clone()))
    }

    async fn update_repository_settings(
        &self,
        _owner: &str,
        repo: &str,
        settings: &RepositorySettingsUpdate,
    ) -> Result<(), Error> {
        self.record(format!("update_repository_settings {}", repo));
        self.with_repo(repo, |r| {
            r.repository.apply_settings(settings);
            Ok(())
        })
    }

    async fn list_labels(&self, _owner: &str, repo: &str) -> Result<Vec<Label>, Error> {
        self.with_repo(repo, |r| Ok(r.labels.values().cloned().collect()))
    }

    async fn create_label(
        &self,
        _owner: &str,
        repo: &str,
        name: &str,
        color: &str,
        description: Option<&str>,
    ) -> Result<(), Error> {
        self.record(format!("create_label {} {}", repo, name));
        self.with_repo(repo, |r| {
            r.labels.insert(
                name.to_string(),
                Label {
                    name: name.to_string(),
                    color: color.to_string(),
                    description: description.map(str::to_string),
                },
            );
            Ok(())
        })
    }

    async fn update_label(
        &self,
        _owner: &str,
        repo: &str,
        current_name: &str,
        new_name: &str,
        color: &str,
        description: Option<&str>,
    ) -> Result<(), Error> {
        self.record(format!("update_label {} {} {}", repo, current_name, new_name));
        self.with_repo(repo, |r| {
            r.labels.remove(current_name).ok_or(Error::NotFound)?;
            r.labels.insert(
                new_name.to_string(),
                Label {
                    name: new_name.to_string(),
                    color: color.to_string(),
                    description: description.map(str::to_string),
                },
            );
            Ok(())
        })
    }

    async fn delete_label(&self, _owner: &str, repo: &str, name: &str) -> Result<(), Error> {
        self.record(format!("delete_label {} {}", repo, name));
        self.with_repo(repo, |r| {
            r.labels.remove(name);
            Ok(())
        })
    }

    async fn list_teams(&self, _org: &str) -> Result<Vec<Team>, Error> {
        let mut state = self.state();
        state.list_teams_calls += 1;
        Ok(state.teams.values().filter_map(|t| t.team.clone()).collect())
    }

    async fn list_team_repository_permissions(
        &self,
        _org: &str,
        team_slug: &str,
    ) -> Result<Vec<TeamRepository>, Error> {
        self.with_team_mut(team_slug, |team| {
            team.repositories
                .iter()
                .map(|(name, permission)| TeamRepository {
                    name: name.clone(),
                    permissions: cumulative_flags(permission),
                })
                .collect()
        })
    }

    async fn set_team_repository_permission(
        &self,
        _org: &str,
        team_slug: &str,
        _owner: &str,
        repo: &str,
        permission: &str,
    ) -> Result<(), Error> {
        self.record(format!(
            "set_team_repository_permission {} {} {}",
            team_slug, repo, permission
        ));
        self.with_team_mut(team_slug, |team| {
            team.repositories
                .insert(repo.to_string(), permission.to_string());
        })
    }

    async fn remove_team_repository(
        &self,
        _org: &str,
        team_slug: &str,
        _owner: &str,
        repo: &str,
    ) -> Result<(), Error> {
        self.record(format!("remove_team_repository {} {}", team_slug, repo));
        self.with_team_mut(team_slug, |team| {
            team.repositories.remove(repo);
        })
    }

    async fn list_team_members(
        &self,
        _org: &str,
        team_slug: &str,
        role: TeamRole,
    ) -> Result<Vec<User>, Error> {
        self.with_team_mut(team_slug, |team| {
            team.members
                .iter()
                .filter(|(_, r)| **r == role)
                .enumerate()
                .map(|(index, (login, _))| User {
                    id: index as u64 + 1,
                    login: login.clone(),
                })
                .collect()
        })
    }

    async fn set_team_membership(
        &self,
        _org: &str,
        team_slug: &str,
        username: &str,
        role: TeamRole,
    ) -> Result<(), Error> {
        self.record(format!(
            "set_team_membership {} {} {}",
            team_slug,
            username,
            role.as_str()
        ));
        self.with_team_mut(team_slug, |team| {
            team.members.insert(username.to_string(), role);
        })
    }

    async fn remove_team_membership(
        &self,
        _org: &str,
        team_slug: &str,
        username: &str,
    ) -> Result<(), Error> {
        self.record(format!("remove_team_membership {} {}", team_slug, username));
        self.with_team_mut(team_slug, |team| {
            team.members.remove(username);
        })
    }

    async fn list_branches(&self, _owner: &str, repo: &str) -> Result<Vec<Branch>, Error> {
        self.with_repo(repo, |r| {
            Ok(r.branches
                .iter()
                .map(|(name, protection)| Branch {
                    name: name.clone(),
                    protected: protection.is_some(),
                })
                .collect())
        })
    }

    async fn get_branch_protection(
        &self,
        _owner: &str,
        repo: &str,
        branch: &str,
    ) -> Result<Option<BranchProtection>, Error> {
        self.with_repo(repo, |r| match r.branches.get(branch) {
            Some(protection) => Ok(protection.as_ref().map(reported_protection)),
            None => Err(Error::NotFound),
        })
    }

    async fn update_branch_protection(
        &self,
        _owner: &str,
        repo: &str,
        branch: &str,
        payload: &BranchProtectionPayload,
    ) -> Result<(), Error> {
        self.record(format!("update_branch_protection {} {}", repo, branch));
        self.with_repo(repo, |r| match r.branches.get_mut(branch) {
            Some(protection) => {
                *protection = Some(payload.clone());
                Ok(())
            }
            None => Err(Error::NotFound),
        })
    }

    async fn get_vulnerability_alerts(&self, _owner: &str, repo: &str) -> Result<bool, Error> {
        self.with_repo(repo, |r| Ok(r.vulnerability_alerts))
    }

    async fn set_vulnerability_alerts(
        &self,
        _owner: &str,
        repo: &str,
        enabled: bool,
    ) -> Result<(), Error> {
        self.record(format!("set_vulnerability_alerts {} {}", repo, enabled));
        self.with_repo(repo, |r| {
            r.vulnerability_alerts = enabled;
            Ok(())
        })
    }

    async fn get_automated_security_fixes(
        &self,
        _owner: &str,
        repo: &str,
    ) -> Result<bool, Error> {
        self.with_repo(repo, |r| Ok(r.automated_security_fixes))
    }

    async fn set_automated_security_fixes(
        &self,
        _owner: &str,
        repo: &str,
        enabled: bool,
    ) -> Result<(), Error> {
        self.record(format!("set_automated_security_fixes {} {}", repo, enabled));
        self.with_repo(repo, |r| {
            if enabled && !r.vulnerability_alerts {
                return Err(Error::InvalidResponse);
            }
            r.automated_security_fixes = enabled;
            Ok(())
        })
    }

    async fn list_org_projects(&self, _org: &str) -> Result<Vec<Project>, Error> {
        let mut state = self.state();
        state.list_org_projects_calls += 1;
        Ok(state.org_projects.clone())
    }

    async fn list_repo_projects(&self, _owner: &str, repo: &str) -> Result<Vec<Project>, Error> {
        self.with_repo(repo, |r| Ok(r.projects.clone()))
    }

    async fn list_project_columns(&self, project_id: u64) -> Result<Vec<ProjectColumn>, Error> {
        self.state()
            .columns
            .get(&project_id)
            .cloned()
            .ok_or(Error::NotFound)
    }

    async fn create_project_card(&self, column_id: u64, issue_id: u64) -> Result<(), Error> {
        self.record(format!("create_project_card {} {}", column_id, issue_id));
        let mut state = self.state();
        state.cards.push((column_id, issue_id));
        for repository in state.repositories.values_mut() {
            if repository.issues.iter().any(|issue| issue.id == issue_id) {
                repository.issues_on_projects.insert(issue_id);
            }
        }
        Ok(())
    }

    async fn get_issue(&self, _owner: &str, repo: &str, number: u64) -> Result<Issue, Error> {
        self.with_repo(repo, |r| {
            r.issues
                .iter()
                .find(|issue| issue.number == number)
                .cloned()
                .ok_or(Error::NotFound)
        })
    }

    async fn list_open_issues(&self, _owner: &str, repo: &str) -> Result<Vec<Issue>, Error> {
        self.with_repo(repo, |r| {
            Ok(r.issues
                .iter()
                .filter(|issue| !issue.is_pull_request())
                .cloned()
                .collect())
        })
    }

    async fn issue_has_projects(
        &self,
        _owner: &str,
        repo: &str,
        number: u64,
    ) -> Result<bool, Error> {
        self.with_repo(repo, |r| {
            let issue = r
                .issues
                .iter()
                .find(|issue| issue.number == number)
                .ok_or(Error::NotFound)?;
            Ok(r.issues_on_projects.contains(&issue.id))
        })
    }

    async fn add_issue_labels(
        &self,
        _owner: &str,
        repo: &str,
        number: u64,
        labels: &[String],
    ) -> Result<(), Error> {
        self.record(format!("add_issue_labels {} {} {}", repo, number, labels.join(",")));
        self.with_repo(repo, |r| {
            let issue = r
                .issues
                .iter_mut()
                .find(|issue| issue.number == number)
                .ok_or(Error::NotFound)?;
            for label in labels {
                if !issue.labels.iter().any(|l| &l.name == label) {
                    issue.labels.push(IssueLabel {
                        name: label.clone(),
                    });
                }
            }
            Ok(())
        })
    }
}
