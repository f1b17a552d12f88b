//! Observed repository state.
//!
//! A [`RepositoryDescriptor`] only names a repository. Calling
//! [`ensure_loaded`](RepositoryDescriptor::ensure_loaded) fetches everything the planners
//! compare against and returns it as a [`RepositorySnapshot`].

use github_client::{Label, OrganizationClient, Repository};
use std::collections::{BTreeMap, BTreeSet};
use tracing::{debug, instrument};

use crate::OrganizerResult;

#[cfg(test)]
#[path = "repository_tests.rs"]
mod tests;

/// Names a repository without fetching anything.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct RepositoryDescriptor {
    pub owner: String,
    pub name: String,
}

impl RepositoryDescriptor {
    pub fn new(owner: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            owner: owner.into(),
            name: name.into(),
        }
    }

    /// Fetches the repository and its labels, branches and topics.
    ///
    /// Topics are left empty unless `fetch_topics` is set.
    pub async fn ensure_loaded(
        &self,
        client: &dyn OrganizationClient,
        fetch_topics: bool,
    ) -> OrganizerResult<RepositorySnapshot> {
        let repository = client.get_repository(&self.owner, &self.name).await?;
        RepositorySnapshot::load(client, &self.owner, repository, fetch_topics).await
    }
}

/// Remote state of one repository at the time it was loaded.
#[derive(Debug, Clone)]
pub struct RepositorySnapshot {
    pub owner: String,
    pub repository: Repository,
    pub topics: Vec<String>,
    /// Labels keyed by name
    pub labels: BTreeMap<String, Label>,
    pub branches: BTreeSet<String>,
}

impl RepositorySnapshot {
    /// Completes an already fetched `repository` with its labels, branches and topics.
    ///
    /// Topics already present on `repository` are reused rather than fetched again.
    #[instrument(skip(client, repository), fields(repo = %repository.name()))]
    pub async fn load(
        client: &dyn OrganizationClient,
        owner: &str,
        repository: Repository,
        fetch_topics: bool,
    ) -> OrganizerResult<Self> {
        let name = repository.name().to_string();

        let topics = if !fetch_topics {
            Vec::new()
        } else if let Some(topics) = repository.topics() {
            topics.to_vec()
        } else {
            client.get_repository_topics(owner, &name).await?
        };

        let labels = client
            .list_labels(owner, &name)
            .await?
            .into_iter()
            .map(|label| (label.name.clone(), label))
            .collect::<BTreeMap<_, _>>();

        let branches = client
            .list_branches(owner, &name)
            .await?
            .into_iter()
            .map(|branch| branch.name)
            .collect::<BTreeSet<_>>();

        debug!(
            labels = labels.len(),
            branches = branches.len(),
            topics = topics.len(),
            "Loaded repository snapshot"
        );

        Ok(Self {
            owner: owner.to_string(),
            repository,
            topics,
            labels,
            branches,
        })
    }

    pub fn name(&self) -> &str {
        self.repository.name()
    }

    pub fn default_branch(&self) -> Option<&str> {
        self.repository.default_branch()
    }
}
