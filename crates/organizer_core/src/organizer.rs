//! Reconciliation runs.
//!
//! [`Organizer`] ties the pieces together: it loads the organization's configuration,
//! resolves the effective settings of each repository, observes the remote state, plans
//! the operations and hands them to the [`OperationExecutor`].
//!
//! All state lives in the `Organizer` value itself, so several organizations can be
//! processed at once by separate instances or by sharing one.

use config_manager::{
    resolve, CacheKey, ConfigDocument, ConfigurationLoader, LookupKind, ProjectAutoassign,
    RepoSettings, ResolutionCache, TeamSettings, TtlClass, TtlPolicy,
};
use github_client::{
    BranchProtectionPayload, Error as GitHubError, OrganizationClient, Repository, Team, TeamRole,
};
use serde::Serialize;
use std::collections::{BTreeMap, BTreeSet};
use std::sync::Arc;
use tracing::{debug, error, info, instrument, warn};

use crate::branch_protection::{plan_branch_protection, protection_targets};
use crate::features::{plan_dependency_security, plan_repository_features, SecurityState};
use crate::issues::{plan_issue_labels, plan_project_card, ProjectOwner};
use crate::labels::plan_labels;
use crate::repository::{RepositoryDescriptor, RepositorySnapshot};
use crate::teams::{plan_team_members, plan_team_permissions};
use crate::{ApplyResult, Operation, OperationExecutor, OrganizerError, OrganizerResult};

#[cfg(test)]
#[path = "organizer_tests.rs"]
mod tests;

/// Planned operations for one repository together with the settings they came from.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RepositoryPlan {
    pub repository: String,
    pub settings: RepoSettings,
    pub operations: Vec<Operation>,
    /// Targets that could not be planned; the other targets are still planned.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub failures: Vec<String>,
}

/// Outcome of reconciling one repository.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RepositoryReport {
    pub repository: String,
    /// False when no settings apply to the repository
    pub managed: bool,
    pub operations: Vec<Operation>,
    pub result: ApplyResult,
}

impl RepositoryReport {
    fn unmanaged(repository: &str) -> Self {
        Self {
            repository: repository.to_string(),
            managed: false,
            operations: Vec::new(),
            result: ApplyResult::new(),
        }
    }
}

/// A repository whose reconciliation failed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RepositoryFailure {
    pub repository: String,
    pub error: String,
}

/// Outcome of reconciling every repository of an organization.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct OrganizationReport {
    pub organization: String,
    /// True when the organization has no configuration document
    pub unmanaged: bool,
    pub repositories: Vec<RepositoryReport>,
    pub failures: Vec<RepositoryFailure>,
}

impl OrganizationReport {
    fn new(organization: &str, unmanaged: bool) -> Self {
        Self {
            organization: organization.to_string(),
            unmanaged,
            repositories: Vec::new(),
            failures: Vec::new(),
        }
    }

    /// Returns true if no repository failed and every operation was applied.
    pub fn is_success(&self) -> bool {
        self.failures.is_empty() && self.repositories.iter().all(|r| r.result.is_success())
    }
}

/// Runs reconciliation against one GitHub client.
///
/// # Examples
///
/// ```rust,no_run
/// use github_client::{create_token_client, GitHubClient};
/// use organizer_core::Organizer;
/// use std::sync::Arc;
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let client = GitHubClient::new(create_token_client("ghp_example")?);
/// let organizer = Organizer::new(Arc::new(client)).with_dry_run(true);
///
/// let report = organizer.update_organization("my-org").await?;
/// println!("{} repositories reconciled", report.repositories.len());
/// # Ok(())
/// # }
/// ```
pub struct Organizer {
    client: Arc<dyn OrganizationClient>,
    executor: OperationExecutor,
    loader: ConfigurationLoader,
    teams: ResolutionCache<Team>,
    ids: ResolutionCache<u64>,
    dry_run: bool,
}

impl Organizer {
    pub fn new(client: Arc<dyn OrganizationClient>) -> Self {
        Self {
            executor: OperationExecutor::new(client.clone()),
            client,
            loader: ConfigurationLoader::new(),
            teams: ResolutionCache::new(),
            ids: ResolutionCache::new(),
            dry_run: false,
        }
    }

    pub fn with_loader(mut self, loader: ConfigurationLoader) -> Self {
        self.loader = loader;
        self
    }

    /// Sets the expiry of cached team, project and column lookups.
    pub fn with_cache_policy(mut self, policy: TtlPolicy) -> Self {
        self.teams = ResolutionCache::with_policy(policy);
        self.ids = ResolutionCache::with_policy(policy);
        self
    }

    /// Plans without applying anything when `dry_run` is set.
    pub fn with_dry_run(mut self, dry_run: bool) -> Self {
        self.dry_run = dry_run;
        self
    }

    pub fn is_dry_run(&self) -> bool {
        self.dry_run
    }

    pub fn client(&self) -> &dyn OrganizationClient {
        self.client.as_ref()
    }

    /// Loads the configuration document of `org`. `None` means the organization is not managed.
    pub async fn configuration(&self, org: &str) -> Option<ConfigDocument> {
        self.loader.load(self.client.as_ref(), org).await
    }

    /// Lists the repositories of `org` that reconciliation applies to.
    ///
    /// Archived repositories are always skipped. Excluded repositories and, when
    /// configured, forks are skipped as well.
    #[instrument(skip(self), fields(org = %org))]
    pub async fn repositories(&self, org: &str) -> OrganizerResult<Vec<Repository>> {
        let document = self.configuration(org).await;
        self.managed_repositories(org, document.as_ref()).await
    }

    async fn managed_repositories(
        &self,
        org: &str,
        document: Option<&ConfigDocument>,
    ) -> OrganizerResult<Vec<Repository>> {
        let repositories = self.client.list_org_repositories(org).await?;

        Ok(repositories
            .into_iter()
            .filter(|repository| {
                let name = repository.name();
                if repository.is_archived() {
                    debug!(repo = name, "Skipping archived repository");
                    return false;
                }
                match document {
                    Some(document) if document.is_excluded(name) => {
                        debug!(repo = name, "Skipping excluded repository");
                        false
                    }
                    Some(document) if document.exclude_forks() && repository.is_fork() => {
                        debug!(repo = name, "Skipping fork");
                        false
                    }
                    _ => true,
                }
            })
            .collect())
    }

    /// Resolves the effective settings of `org/repo`.
    ///
    /// Returns `None` when the organization is not managed or no entry applies.
    #[instrument(skip(self), fields(org = %org, repo = %repo))]
    pub async fn settings(&self, org: &str, repo: &str) -> OrganizerResult<Option<RepoSettings>> {
        let Some(document) = self.configuration(org).await else {
            return Ok(None);
        };
        self.settings_for(org, &document, repo).await
    }

    async fn settings_for(
        &self,
        org: &str,
        document: &ConfigDocument,
        repo: &str,
    ) -> OrganizerResult<Option<RepoSettings>> {
        let topics = if document.topics_for_assignment() {
            self.client.get_repository_topics(org, repo).await?
        } else {
            Vec::new()
        };
        Ok(resolve(Some(document), repo, &topics)?)
    }

    /// Plans every change `org/repo` needs without applying any.
    #[instrument(skip(self), fields(org = %org, repo = %repo))]
    pub async fn plan_repository(
        &self,
        org: &str,
        repo: &str,
    ) -> OrganizerResult<Option<RepositoryPlan>> {
        let Some(document) = self.configuration(org).await else {
            info!(org = org, "Organization is not managed");
            return Ok(None);
        };

        let snapshot = RepositoryDescriptor::new(org, repo)
            .ensure_loaded(self.client.as_ref(), document.topics_for_assignment())
            .await?;
        self.plan_snapshot(&document, &snapshot).await
    }

    async fn plan_snapshot(
        &self,
        document: &ConfigDocument,
        snapshot: &RepositorySnapshot,
    ) -> OrganizerResult<Option<RepositoryPlan>> {
        let repo = snapshot.name();
        let Some(settings) = resolve(Some(document), repo, &snapshot.topics)? else {
            debug!(repo = repo, "No settings apply, repository is not managed");
            return Ok(None);
        };

        let mut operations = Vec::new();
        operations.extend(plan_repository_features(&settings, &snapshot.repository));
        let security = self.security_state(snapshot, &settings).await;
        operations.extend(plan_dependency_security(&settings, &security));
        operations.extend(plan_labels(
            &snapshot.labels,
            document.labels(),
            document.labels_clean(),
        ));

        let mut failures = Vec::new();
        match self.plan_protection(snapshot, &settings).await {
            Ok(planned) => operations.extend(planned),
            Err(e) => failures.push(target_failure(repo, "branch protection", &e)),
        }
        let (planned, team_failures) = self
            .plan_repository_teams(&snapshot.owner, repo, &settings)
            .await;
        operations.extend(planned);
        failures.extend(team_failures);

        debug!(
            repo = repo,
            count = operations.len(),
            failures = failures.len(),
            "Planned repository"
        );
        Ok(Some(RepositoryPlan {
            repository: repo.to_string(),
            settings,
            operations,
            failures,
        }))
    }

    async fn security_state(
        &self,
        snapshot: &RepositorySnapshot,
        settings: &RepoSettings,
    ) -> SecurityState {
        if settings.dependency_security.is_none() {
            return SecurityState::default();
        }

        let (owner, repo) = (snapshot.owner.as_str(), snapshot.name());
        let vulnerability_alerts = match self.client.get_vulnerability_alerts(owner, repo).await {
            Ok(enabled) => Some(enabled),
            Err(e) => {
                warn!(repo = repo, error = %e, "Could not read vulnerability alerts");
                None
            }
        };
        let automated_security_fixes =
            match self.client.get_automated_security_fixes(owner, repo).await {
                Ok(enabled) => Some(enabled),
                Err(e) => {
                    warn!(repo = repo, error = %e, "Could not read automated security fixes");
                    None
                }
            };

        SecurityState {
            vulnerability_alerts,
            automated_security_fixes,
        }
    }

    async fn plan_protection(
        &self,
        snapshot: &RepositorySnapshot,
        settings: &RepoSettings,
    ) -> OrganizerResult<Vec<Operation>> {
        let default_branch = snapshot.default_branch();

        let mut current = BTreeMap::new();
        for (branch, _) in protection_targets(settings, default_branch) {
            if !snapshot.branches.contains(&branch) {
                continue;
            }
            match self
                .client
                .get_branch_protection(&snapshot.owner, snapshot.name(), &branch)
                .await
            {
                Ok(Some(protection)) => {
                    current.insert(branch, BranchProtectionPayload::from(&protection));
                }
                Ok(None) | Err(GitHubError::NotFound) => {}
                Err(e) => return Err(e.into()),
            }
        }

        Ok(plan_branch_protection(
            settings,
            default_branch,
            &snapshot.branches,
            &current,
        ))
    }

    /// Plans team access to `repo`, one team at a time.
    ///
    /// Returns the operations of every team that could be planned and one failure
    /// description per team that could not.
    async fn plan_repository_teams(
        &self,
        org: &str,
        repo: &str,
        settings: &RepoSettings,
    ) -> (Vec<Operation>, Vec<String>) {
        let mut operations = Vec::new();
        let mut failures = Vec::new();

        // Keyed by slug, a team may be listed by name and by slug.
        let mut teams: BTreeMap<String, Team> = BTreeMap::new();
        for name in settings.teams.keys() {
            match self.find_team(org, name).await {
                Ok(Some(team)) => {
                    teams.entry(team.slug.clone()).or_insert(team);
                }
                Ok(None) => warn_not_found("team", name),
                Err(e) => failures.push(target_failure(repo, &format!("team {}", name), &e)),
            }
        }
        if settings.teams_clean {
            match self.client.list_teams(org).await {
                Ok(all) => {
                    for team in all {
                        teams.entry(team.slug.clone()).or_insert(team);
                    }
                }
                Err(e) => failures.push(target_failure(repo, "teams", &e)),
            }
        }

        for team in teams.values() {
            let planned = match self.team_permissions(org, &team.slug).await {
                Ok(current) => plan_team_permissions(
                    &team.slug,
                    repo,
                    desired_permission(settings, team),
                    current.get(repo).unwrap_or(&BTreeSet::new()),
                    settings.teams_clean,
                ),
                Err(e) => Err(e),
            };
            match planned {
                Ok(planned) => operations.extend(planned),
                Err(e) => failures.push(target_failure(repo, &format!("team {}", team.name), &e)),
            }
        }

        (operations, failures)
    }

    /// Returns the permission flags `team_slug` holds on each repository it can access.
    async fn team_permissions(
        &self,
        org: &str,
        team_slug: &str,
    ) -> OrganizerResult<BTreeMap<String, BTreeSet<String>>> {
        Ok(self
            .client
            .list_team_repository_permissions(org, team_slug)
            .await?
            .into_iter()
            .map(|repository| (repository.name, repository.permissions.granted_flags()))
            .collect())
    }

    async fn apply(&self, org: &str, repo: &str, operations: &[Operation]) -> ApplyResult {
        if self.dry_run {
            info!(repo = repo, count = operations.len(), "Dry run, not applying");
            return ApplyResult::new();
        }
        self.executor.apply(org, repo, operations).await
    }

    /// Reconciles settings, labels, branch protection, security and teams of `org/repo`.
    ///
    /// When `issues.auto_assign_project` is set, every open issue is also put on the
    /// auto-assign project.
    #[instrument(skip(self), fields(org = %org, repo = %repo))]
    pub async fn update_repository(&self, org: &str, repo: &str) -> OrganizerResult<RepositoryReport> {
        let Some(document) = self.configuration(org).await else {
            info!(org = org, "Organization is not managed");
            return Ok(RepositoryReport::unmanaged(repo));
        };

        let snapshot = RepositoryDescriptor::new(org, repo)
            .ensure_loaded(self.client.as_ref(), document.topics_for_assignment())
            .await?;
        self.update_snapshot(&document, &snapshot).await
    }

    async fn update_snapshot(
        &self,
        document: &ConfigDocument,
        snapshot: &RepositorySnapshot,
    ) -> OrganizerResult<RepositoryReport> {
        let Some(plan) = self.plan_snapshot(document, snapshot).await? else {
            return Ok(RepositoryReport::unmanaged(snapshot.name()));
        };

        let org = snapshot.owner.as_str();
        let mut result = self.apply(org, &plan.repository, &plan.operations).await;
        for failure in plan.failures {
            result.record_failure(failure);
        }
        let mut operations = plan.operations;

        if plan
            .settings
            .issues
            .as_ref()
            .is_some_and(|issues| issues.auto_assign_project)
        {
            match self
                .assign_open_issues(org, &plan.repository, &plan.settings)
                .await
            {
                Ok((assigned, cards)) => {
                    operations.extend(cards);
                    result.merge(assigned);
                }
                Err(e) => result.record_failure(target_failure(
                    &plan.repository,
                    "project assignment",
                    &e,
                )),
            }
        }

        info!(
            repo = plan.repository.as_str(),
            planned = operations.len(),
            applied = result.applied,
            failed = result.failed,
            "Repository reconciled"
        );

        Ok(RepositoryReport {
            repository: plan.repository,
            managed: true,
            operations,
            result,
        })
    }

    /// Reconciles every repository of `org`.
    ///
    /// A failure in one repository is recorded in the report and does not stop the others.
    ///
    /// # Errors
    ///
    /// Returns an error only when the repositories of `org` cannot be listed.
    #[instrument(skip(self), fields(org = %org))]
    pub async fn update_organization(&self, org: &str) -> OrganizerResult<OrganizationReport> {
        let Some(document) = self.configuration(org).await else {
            info!(org = org, "Organization is not managed");
            return Ok(OrganizationReport::new(org, true));
        };

        let mut report = OrganizationReport::new(org, false);
        for repository in self.managed_repositories(org, Some(&document)).await? {
            let name = repository.name().to_string();
            let outcome = match RepositorySnapshot::load(
                self.client.as_ref(),
                org,
                repository,
                document.topics_for_assignment(),
            )
            .await
            {
                Ok(snapshot) => self.update_snapshot(&document, &snapshot).await,
                Err(e) => Err(e),
            };

            match outcome {
                Ok(repository_report) => report.repositories.push(repository_report),
                Err(e) => {
                    error!(repo = name.as_str(), error = %e, "Failed to reconcile repository");
                    report.failures.push(RepositoryFailure {
                        repository: name,
                        error: e.to_string(),
                    });
                }
            }
        }

        info!(
            repositories = report.repositories.len(),
            failures = report.failures.len(),
            "Organization reconciled"
        );
        Ok(report)
    }

    /// Reconciles only the branch protection of `org/repo`.
    #[instrument(skip(self), fields(org = %org, repo = %repo))]
    pub async fn update_branch_protection(
        &self,
        org: &str,
        repo: &str,
    ) -> OrganizerResult<RepositoryReport> {
        let Some(document) = self.configuration(org).await else {
            return Ok(RepositoryReport::unmanaged(repo));
        };

        let snapshot = RepositoryDescriptor::new(org, repo)
            .ensure_loaded(self.client.as_ref(), document.topics_for_assignment())
            .await?;
        let Some(settings) = resolve(Some(&document), repo, &snapshot.topics)? else {
            return Ok(RepositoryReport::unmanaged(repo));
        };

        let operations = self.plan_protection(&snapshot, &settings).await?;
        let result = self.apply(org, repo, &operations).await;
        Ok(RepositoryReport {
            repository: repo.to_string(),
            managed: true,
            operations,
            result,
        })
    }

    /// Reconciles team access to every managed repository of `org`.
    ///
    /// Every team named in any repository's `teams` group is checked against every managed
    /// repository, so `teams_clean` also removes those teams from repositories that do not
    /// list them. Repositories whose settings cannot be resolved or planned are counted as
    /// failures.
    #[instrument(skip(self), fields(org = %org))]
    pub async fn update_team_repositories(&self, org: &str) -> OrganizerResult<ApplyResult> {
        let mut result = ApplyResult::new();
        let Some(document) = self.configuration(org).await else {
            info!(org = org, "Organization is not managed");
            return Ok(result);
        };

        let mut desired: Vec<(String, RepoSettings)> = Vec::new();
        for repository in self.managed_repositories(org, Some(&document)).await? {
            let name = repository.name().to_string();
            match self.settings_for(org, &document, &name).await {
                Ok(Some(settings)) => desired.push((name, settings)),
                Ok(None) => {}
                Err(e) => {
                    warn!(repo = name.as_str(), error = %e, "Failed to resolve settings");
                    result.record_failure(format!("resolve settings for {}: {}", name, e));
                }
            }
        }

        let team_names: BTreeSet<&String> = desired
            .iter()
            .flat_map(|(_, settings)| settings.teams.keys())
            .collect();

        // One entry per team even when repositories refer to it by name and by slug.
        let mut teams: BTreeMap<String, Team> = BTreeMap::new();
        for name in team_names {
            match self.find_team(org, name).await? {
                Some(team) => {
                    teams.entry(team.slug.clone()).or_insert(team);
                }
                None => warn_not_found("team", name),
            }
        }

        let mut operations: BTreeMap<&str, Vec<Operation>> = BTreeMap::new();
        for team in teams.values() {
            let current = self.team_permissions(org, &team.slug).await?;

            for (repo, settings) in &desired {
                let planned = plan_team_permissions(
                    &team.slug,
                    repo,
                    desired_permission(settings, team),
                    current.get(repo).unwrap_or(&BTreeSet::new()),
                    settings.teams_clean,
                );
                match planned {
                    Ok(planned) => operations.entry(repo.as_str()).or_default().extend(planned),
                    Err(e) => {
                        warn!(repo = repo.as_str(), team = team.slug.as_str(), error = %e, "Invalid team setting");
                        result.record_failure(format!("plan team {} for {}: {}", team.name, repo, e));
                    }
                }
            }
        }

        for (repo, planned) in operations {
            if !planned.is_empty() {
                result.merge(self.apply(org, repo, &planned).await);
            }
        }
        Ok(result)
    }

    /// Reconciles the membership of the configured team `team_name`.
    #[instrument(skip(self), fields(org = %org, team = %team_name))]
    pub async fn update_team_membership(
        &self,
        org: &str,
        team_name: &str,
    ) -> OrganizerResult<ApplyResult> {
        let Some(document) = self.configuration(org).await else {
            info!(org = org, "Organization is not managed");
            return Ok(ApplyResult::new());
        };
        let Some(settings) = document.teams().get(team_name) else {
            warn!(team = team_name, "Team has no membership configuration");
            return Ok(ApplyResult::new());
        };
        self.sync_team_membership(org, team_name, settings).await
    }

    /// Reconciles the membership of every configured team.
    ///
    /// A team that fails is counted as a failure and the others still run.
    #[instrument(skip(self), fields(org = %org))]
    pub async fn update_org_team_membership(&self, org: &str) -> OrganizerResult<ApplyResult> {
        let mut result = ApplyResult::new();
        let Some(document) = self.configuration(org).await else {
            info!(org = org, "Organization is not managed");
            return Ok(result);
        };

        for (name, settings) in document.teams() {
            match self.sync_team_membership(org, name, settings).await {
                Ok(team_result) => result.merge(team_result),
                Err(e) => {
                    error!(team = name.as_str(), error = %e, "Failed to update team membership");
                    result.record_failure(format!("update membership of {}: {}", name, e));
                }
            }
        }
        Ok(result)
    }

    async fn sync_team_membership(
        &self,
        org: &str,
        team_name: &str,
        settings: &TeamSettings,
    ) -> OrganizerResult<ApplyResult> {
        let Some(team) = self.find_team(org, team_name).await? else {
            warn_not_found("team", team_name);
            return Ok(ApplyResult::new());
        };

        let mut current = BTreeMap::new();
        for role in [TeamRole::Member, TeamRole::Maintainer] {
            for user in self.client.list_team_members(org, &team.slug, role).await? {
                current.insert(user.login, role);
            }
        }

        let operations = plan_team_members(&team.slug, settings, &current);
        if self.dry_run {
            info!(team = team_name, count = operations.len(), "Dry run, not applying");
            return Ok(ApplyResult::new());
        }
        Ok(self.executor.apply_organization(org, &operations).await)
    }

    /// Adds the configured auto labels to issue `number` of `org/repo`.
    #[instrument(skip(self), fields(org = %org, repo = %repo, issue = number))]
    pub async fn label_issue(&self, org: &str, repo: &str, number: u64) -> OrganizerResult<ApplyResult> {
        let Some(document) = self.configuration(org).await else {
            return Ok(ApplyResult::new());
        };
        let Some(settings) = self.settings_for(org, &document, repo).await? else {
            return Ok(ApplyResult::new());
        };

        let issue = self.client.get_issue(org, repo, number).await?;
        let operations: Vec<Operation> =
            plan_issue_labels(repo, &settings, document.labels(), &issue)
                .into_iter()
                .collect();
        Ok(self.apply(org, repo, &operations).await)
    }

    /// Puts issue `number` of `org/repo` on the auto-assign project if it is on none yet.
    #[instrument(skip(self), fields(org = %org, repo = %repo, issue = number))]
    pub async fn assign_issue(&self, org: &str, repo: &str, number: u64) -> OrganizerResult<ApplyResult> {
        let Some(settings) = self.settings(org, repo).await? else {
            return Ok(ApplyResult::new());
        };
        let Some(autoassign) = autoassign(&settings) else {
            debug!(repo = repo, "No project auto-assignment configured");
            return Ok(ApplyResult::new());
        };
        let Some(column_id) = self.autoassign_column(org, repo, autoassign).await? else {
            return Ok(ApplyResult::new());
        };

        let issue = self.client.get_issue(org, repo, number).await?;
        let has_projects = self.client.issue_has_projects(org, repo, number).await?;
        let operations: Vec<Operation> = plan_project_card(column_id, &issue, has_projects)
            .into_iter()
            .collect();
        Ok(self.apply(org, repo, &operations).await)
    }

    /// Puts every open issue of `org/repo` that is on no project on the auto-assign project.
    #[instrument(skip(self), fields(org = %org, repo = %repo))]
    pub async fn assign_all_issues(&self, org: &str, repo: &str) -> OrganizerResult<ApplyResult> {
        let Some(settings) = self.settings(org, repo).await? else {
            return Ok(ApplyResult::new());
        };
        let (result, _) = self.assign_open_issues(org, repo, &settings).await?;
        Ok(result)
    }

    async fn assign_open_issues(
        &self,
        org: &str,
        repo: &str,
        settings: &RepoSettings,
    ) -> OrganizerResult<(ApplyResult, Vec<Operation>)> {
        let Some(autoassign) = autoassign(settings) else {
            return Ok((ApplyResult::new(), Vec::new()));
        };
        let Some(column_id) = self.autoassign_column(org, repo, autoassign).await? else {
            return Ok((ApplyResult::new(), Vec::new()));
        };

        let mut operations = Vec::new();
        for issue in self.client.list_open_issues(org, repo).await? {
            let has_projects = self
                .client
                .issue_has_projects(org, repo, issue.number)
                .await?;
            operations.extend(plan_project_card(column_id, &issue, has_projects));
        }

        let result = self.apply(org, repo, &operations).await;
        Ok((result, operations))
    }

    async fn autoassign_column(
        &self,
        org: &str,
        repo: &str,
        autoassign: &ProjectAutoassign,
    ) -> OrganizerResult<Option<u64>> {
        let project_id = match ProjectOwner::for_autoassign(autoassign, repo) {
            ProjectOwner::Organization => self.find_org_project(org, &autoassign.name).await?,
            ProjectOwner::Repository(owner_repo) => {
                self.find_repo_project(org, &owner_repo, &autoassign.name)
                    .await?
            }
        };
        let Some(project_id) = project_id else {
            warn_not_found("project", &autoassign.name);
            return Ok(None);
        };

        let column_id = self
            .find_column(org, project_id, &autoassign.column)
            .await?;
        if column_id.is_none() {
            warn_not_found("project column", &autoassign.column);
        }
        Ok(column_id)
    }

    /// Looks up a team by name or slug.
    pub async fn find_team(&self, org: &str, name: &str) -> OrganizerResult<Option<Team>> {
        let key = CacheKey::new(org, LookupKind::Team, name);
        self.teams
            .try_get_or_compute(key, TtlClass::Medium, || async {
                let teams = self.client.list_teams(org).await?;
                Ok::<_, OrganizerError>(
                    teams
                        .into_iter()
                        .find(|team| team.name == name || team.slug == name),
                )
            })
            .await
    }

    /// Looks up the id of an organization project by name.
    pub async fn find_org_project(&self, org: &str, name: &str) -> OrganizerResult<Option<u64>> {
        let key = CacheKey::new(org, LookupKind::Project, name);
        self.ids
            .try_get_or_compute(key, TtlClass::Medium, || async {
                let projects = self.client.list_org_projects(org).await?;
                Ok::<_, OrganizerError>(
                    projects
                        .into_iter()
                        .find(|project| project.name == name)
                        .map(|project| project.id),
                )
            })
            .await
    }

    /// Looks up the id of a repository project by name.
    pub async fn find_repo_project(
        &self,
        org: &str,
        repo: &str,
        name: &str,
    ) -> OrganizerResult<Option<u64>> {
        let key = CacheKey::new(org, LookupKind::Project, format!("{}/{}", repo, name));
        self.ids
            .try_get_or_compute(key, TtlClass::Medium, || async {
                let projects = self.client.list_repo_projects(org, repo).await?;
                Ok::<_, OrganizerError>(
                    projects
                        .into_iter()
                        .find(|project| project.name == name)
                        .map(|project| project.id),
                )
            })
            .await
    }

    /// Looks up the id of a column of project `project_id` by name.
    pub async fn find_column(
        &self,
        org: &str,
        project_id: u64,
        name: &str,
    ) -> OrganizerResult<Option<u64>> {
        let key = CacheKey::new(org, LookupKind::Column, format!("{}/{}", project_id, name));
        self.ids
            .try_get_or_compute(key, TtlClass::Medium, || async {
                let columns = self.client.list_project_columns(project_id).await?;
                Ok::<_, OrganizerError>(
                    columns
                        .into_iter()
                        .find(|column| column.name == name)
                        .map(|column| column.id),
                )
            })
            .await
    }
}

fn autoassign(settings: &RepoSettings) -> Option<&ProjectAutoassign> {
    settings
        .issues
        .as_ref()
        .and_then(|issues| issues.project_autoassign.as_ref())
}

/// The permission `settings` asks for `team`, whether listed by name or by slug.
fn desired_permission<'a>(settings: &'a RepoSettings, team: &Team) -> Option<&'a str> {
    settings
        .teams
        .get(&team.name)
        .or_else(|| settings.teams.get(&team.slug))
        .map(String::as_str)
}

fn target_failure(repo: &str, target: &str, error: &impl std::fmt::Display) -> String {
    warn!(repo = repo, target = target, error = %error, "Failed to plan target, skipping it");
    format!("plan {} for {}: {}", target, repo, error)
}

fn warn_not_found(kind: &str, name: &str) {
    let error = OrganizerError::LookupNotFound {
        kind: kind.to_string(),
        name: name.to_string(),
    };
    warn!(error = %error, "Lookup failed, skipping");
}
