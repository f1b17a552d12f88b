//! Error types for reconciliation.

use config_manager::ConfigurationError;
use thiserror::Error;

#[cfg(test)]
#[path = "errors_tests.rs"]
mod tests;

/// Errors raised while resolving, planning or applying reconciliation for a repository.
///
/// None of these abort an organization-wide run: they are reported for the repository or
/// target that raised them.
#[derive(Error, Debug)]
pub enum OrganizerError {
    #[error("Configuration error: {0}")]
    Configuration(#[from] ConfigurationError),

    #[error("GitHub API error: {0}")]
    GitHub(#[from] github_client::Error),

    #[error("Invalid setting {field}: {reason}")]
    PlanValidation { field: String, reason: String },

    #[error("No {kind} named '{name}' was found")]
    LookupNotFound { kind: String, name: String },
}

/// Result type alias for organizer operations.
pub type OrganizerResult<T> = Result<T, OrganizerError>;
