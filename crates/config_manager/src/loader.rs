//! Organization configuration loading.
//!
//! [`ConfigurationLoader`] reads an organization's configuration document from a file in a
//! well-known repository, `.github/organizer.yaml` by default, and caches the parsed result
//! for the SHORT TTL.
//!
//! A document that cannot be read or parsed means the organization is not managed. The
//! loader reports that as `None` and never as an error.

use github_client::{Error as GitHubError, OrganizationClient};
use tracing::{info, instrument, warn};

use crate::cache::{CacheKey, LookupKind, ResolutionCache, TtlClass, TtlPolicy};
use crate::ConfigDocument;

#[cfg(test)]
#[path = "loader_tests.rs"]
mod tests;

/// Repository holding the configuration document.
pub const DEFAULT_CONFIG_REPOSITORY: &str = ".github";

/// Path of the configuration document inside its repository.
pub const DEFAULT_CONFIG_FILE: &str = "organizer.yaml";

/// Loads and caches organization configuration documents.
#[derive(Debug)]
pub struct ConfigurationLoader {
    repository: String,
    file: String,
    cache: ResolutionCache<ConfigDocument>,
}

impl ConfigurationLoader {
    /// Creates a loader for `.github/organizer.yaml` with the default cache policy.
    pub fn new() -> Self {
        Self::with_location(DEFAULT_CONFIG_REPOSITORY, DEFAULT_CONFIG_FILE)
    }

    /// Creates a loader reading `file` from `repository`.
    pub fn with_location(repository: impl Into<String>, file: impl Into<String>) -> Self {
        Self {
            repository: repository.into(),
            file: file.into(),
            cache: ResolutionCache::new(),
        }
    }

    pub fn with_cache_policy(mut self, policy: TtlPolicy) -> Self {
        self.cache = ResolutionCache::with_policy(policy);
        self
    }

    pub fn repository(&self) -> &str {
        &self.repository
    }

    pub fn file(&self) -> &str {
        &self.file
    }

    /// Loads the configuration document of `org`.
    ///
    /// Returns `None` when the document is missing, cannot be fetched or cannot be parsed.
    #[instrument(skip(self, client), fields(org = %org))]
    pub async fn load(&self, client: &dyn OrganizationClient, org: &str) -> Option<ConfigDocument> {
        let key = CacheKey::new(
            org,
            LookupKind::Configuration,
            format!("{}/{}", self.repository, self.file),
        );

        self.cache
            .get_or_compute_async(key, TtlClass::Short, || self.fetch(client, org))
            .await
    }

    async fn fetch(&self, client: &dyn OrganizationClient, org: &str) -> Option<ConfigDocument> {
        let text = match client
            .get_file_content(org, &self.repository, &self.file)
            .await
        {
            Ok(text) => text,
            Err(GitHubError::NotFound) => {
                warn!(
                    org = org,
                    repository = self.repository.as_str(),
                    file = self.file.as_str(),
                    "No configuration document found, organization is not managed"
                );
                return None;
            }
            Err(e) => {
                warn!(
                    org = org,
                    error = %e,
                    "Failed to fetch configuration document"
                );
                return None;
            }
        };

        match ConfigDocument::parse(&text) {
            Ok(document) => {
                info!(org = org, "Loaded configuration document");
                Some(document)
            }
            Err(e) => {
                warn!(
                    org = org,
                    error = %e,
                    "Configuration document could not be parsed, organization is not managed"
                );
                None
            }
        }
    }
}

impl Default for ConfigurationLoader {
    fn default() -> Self {
        Self::new()
    }
}
