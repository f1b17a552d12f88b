//! Configuration management for the organizer.
//!
//! This crate owns everything between the YAML document stored in an organization and the
//! typed settings the planners consume:
//!
//! - [`ConfigDocument`]: the parsed organization document;
//! - [`ConfigurationLoader`]: fetches and caches the document, reporting a missing or
//!   broken document as absent;
//! - [`resolve`]: computes a repository's effective [`RepoSettings`] through name and topic
//!   routing and `extends` inheritance;
//! - [`ResolutionCache`]: the TTL cache in front of remote lookups.

pub mod cache;
pub mod document;
pub mod errors;
pub mod loader;
pub mod resolver;
pub mod settings;

pub use cache::{CacheKey, LookupKind, ResolutionCache, TtlClass, TtlPolicy};
pub use document::ConfigDocument;
pub use errors::{ConfigurationError, ConfigurationResult};
pub use loader::{ConfigurationLoader, DEFAULT_CONFIG_FILE, DEFAULT_CONFIG_REPOSITORY};
pub use resolver::{resolve, resolve_mapping, resolve_with_depth, topic_key, DEFAULT_MAX_DEPTH};
pub use settings::{
    BranchProtectionSpec, DependencySecurity, Features, IssueSettings, LabelSpec, Merges,
    ProjectAutoassign, RepoSettings, TeamSettings, DEFAULT_LABEL_COLOR,
};
