//! Configuration for the github-organizer CLI.
//!
//! Settings are read from an optional TOML file. GitHub credentials can also be given on
//! the command line or through `GITHUB_APP_ID`, `GITHUB_PRIVATE_KEY`,
//! `GITHUB_PRIVATE_KEY_PATH` and `GITHUB_TOKEN`, which take precedence over the file.

use std::{
    fs,
    path::{Path, PathBuf},
    time::Duration,
};

use config_manager::{
    ConfigurationLoader, TtlPolicy, DEFAULT_CONFIG_FILE, DEFAULT_CONFIG_REPOSITORY,
};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::cli::CredentialArgs;
use crate::errors::Error;

/// Default configuration file name
pub const DEFAULT_CONFIG_FILENAME: &str = "organizer.toml";

#[cfg(test)]
#[path = "config_tests.rs"]
mod tests;

/// Main configuration structure for the github-organizer CLI.
///
/// # Example TOML Configuration
///
/// ```toml
/// [github]
/// app_id = 12345
/// private_key_path = "/etc/organizer/app.pem"
///
/// [organizer]
/// config_repository = ".github"
/// config_file = "organizer.yaml"
///
/// [cache]
/// short_ttl_secs = 300
/// medium_ttl_secs = 3600
/// long_ttl_secs = 86400
/// ```
#[derive(Debug, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct AppConfig {
    #[serde(default)]
    pub github: GitHubConfig,

    #[serde(default)]
    pub organizer: OrganizerConfig,

    #[serde(default)]
    pub cache: CacheConfig,
}

impl AppConfig {
    /// Loads configuration from a TOML file at the specified path.
    ///
    /// # Errors
    ///
    /// Returns `Error::Config` if the file does not exist, cannot be read or is not valid
    /// TOML for this structure.
    pub fn load(path: &Path) -> Result<Self, Error> {
        debug!("Loading configuration from {:?}", path);

        if !path.exists() {
            return Err(Error::Config(format!(
                "Configuration file not found: {:?}",
                path
            )));
        }

        let content = fs::read_to_string(path)
            .map_err(|e| Error::Config(format!("Failed to read configuration file: {}", e)))?;

        toml::from_str(&content)
            .map_err(|e| Error::Config(format!("Failed to parse configuration file: {}", e)))
    }

    /// Loads the file named on the command line, or `organizer.toml` if it exists.
    ///
    /// A missing default file yields the default configuration. A missing file that was
    /// named explicitly is an error.
    pub fn load_or_default(config_path: Option<&str>) -> Result<Self, Error> {
        let path = get_config_path(config_path);
        if config_path.is_none() && !path.exists() {
            debug!("No configuration file found, using defaults");
            return Ok(Self::default());
        }
        Self::load(&path)
    }

    /// Creates the loader for organization configuration documents.
    pub fn loader(&self) -> ConfigurationLoader {
        ConfigurationLoader::with_location(
            self.organizer.config_repository.clone(),
            self.organizer.config_file.clone(),
        )
        .with_cache_policy(self.cache.policy())
    }
}

/// GitHub credentials. Either an App id with its private key, or a token.
#[derive(Debug, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct GitHubConfig {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub app_id: Option<u64>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub private_key_path: Option<PathBuf>,

    /// PEM encoded key. Only accepted from the environment or the command line.
    #[serde(skip)]
    pub private_key: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub token: Option<String>,
}

impl GitHubConfig {
    /// Replaces file values with the ones given on the command line or in the environment.
    pub fn apply_overrides(&mut self, args: &CredentialArgs) {
        if let Some(app_id) = args.app_id {
            self.app_id = Some(app_id);
        }
        if let Some(path) = &args.private_key_path {
            self.private_key_path = Some(path.clone());
        }
        if let Some(key) = &args.private_key {
            self.private_key = Some(key.clone());
        }
        if let Some(token) = &args.token {
            self.token = Some(token.clone());
        }
    }

    /// Returns the credentials to authenticate with.
    ///
    /// App credentials win over a token when both are configured.
    ///
    /// # Errors
    ///
    /// Returns `Error::Auth` when no credentials are configured or an App id has no key,
    /// and `Error::LoadFile` when the key file cannot be read.
    pub fn credentials(&self) -> Result<Credentials, Error> {
        if let Some(app_id) = self.app_id {
            let private_key = match (&self.private_key, &self.private_key_path) {
                (Some(key), _) => key.clone(),
                (None, Some(path)) => fs::read_to_string(path).map_err(Error::LoadFile)?,
                (None, None) => {
                    return Err(Error::Auth(
                        "GITHUB_APP_ID is set but no private key was given".to_string(),
                    ))
                }
            };
            return Ok(Credentials::App {
                app_id,
                private_key,
            });
        }

        match &self.token {
            Some(token) => Ok(Credentials::Token(token.clone())),
            None => Err(Error::Auth(
                "no GitHub credentials, set GITHUB_APP_ID and a private key or GITHUB_TOKEN"
                    .to_string(),
            )),
        }
    }
}

/// How to authenticate with GitHub.
#[derive(Clone, PartialEq, Eq)]
pub enum Credentials {
    App { app_id: u64, private_key: String },
    Token(String),
}

impl std::fmt::Debug for Credentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Credentials::App { app_id, .. } => f
                .debug_struct("App")
                .field("app_id", app_id)
                .finish_non_exhaustive(),
            Credentials::Token(_) => f.write_str("Token(..)"),
        }
    }
}

/// Where organization configuration documents live.
#[derive(Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct OrganizerConfig {
    #[serde(default = "OrganizerConfig::default_config_repository")]
    pub config_repository: String,

    #[serde(default = "OrganizerConfig::default_config_file")]
    pub config_file: String,
}

impl OrganizerConfig {
    fn default_config_repository() -> String {
        DEFAULT_CONFIG_REPOSITORY.to_string()
    }

    fn default_config_file() -> String {
        DEFAULT_CONFIG_FILE.to_string()
    }
}

impl Default for OrganizerConfig {
    fn default() -> Self {
        Self {
            config_repository: Self::default_config_repository(),
            config_file: Self::default_config_file(),
        }
    }
}

/// Expiry of cached lookups, in seconds.
#[derive(Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct CacheConfig {
    #[serde(default = "CacheConfig::default_short")]
    pub short_ttl_secs: u64,

    #[serde(default = "CacheConfig::default_medium")]
    pub medium_ttl_secs: u64,

    #[serde(default = "CacheConfig::default_long")]
    pub long_ttl_secs: u64,
}

impl CacheConfig {
    fn default_short() -> u64 {
        TtlPolicy::DEFAULT_SHORT.as_secs()
    }

    fn default_medium() -> u64 {
        TtlPolicy::DEFAULT_MEDIUM.as_secs()
    }

    fn default_long() -> u64 {
        TtlPolicy::DEFAULT_LONG.as_secs()
    }

    pub fn policy(&self) -> TtlPolicy {
        TtlPolicy::new(
            Duration::from_secs(self.short_ttl_secs),
            Duration::from_secs(self.medium_ttl_secs),
            Duration::from_secs(self.long_ttl_secs),
        )
    }
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            short_ttl_secs: Self::default_short(),
            medium_ttl_secs: Self::default_medium(),
            long_ttl_secs: Self::default_long(),
        }
    }
}

/// Resolves the path to the configuration file.
///
/// Uses `config_path` when given and `./organizer.toml` otherwise.
pub fn get_config_path(config_path: Option<&str>) -> PathBuf {
    if let Some(path) = config_path {
        PathBuf::from(path)
    } else {
        let current_dir = std::env::current_dir().unwrap_or_else(|_| PathBuf::from("."));
        current_dir.join(DEFAULT_CONFIG_FILENAME)
    }
}
