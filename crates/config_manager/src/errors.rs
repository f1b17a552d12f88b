//! Configuration system error types.
//!
//! Domain-specific errors for parsing the organization configuration document and for
//! turning a resolved repository entry into typed settings.
//!
//! A missing or unparseable document is not an error at the loader boundary: the
//! loader reports it as an absent document instead. These errors surface only from
//! direct parsing and from resolution.

use thiserror::Error;

/// Configuration system errors.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ConfigurationError {
    #[error("Failed to parse configuration: {reason}")]
    ParseError { reason: String },

    #[error("Invalid configuration: {field} - {reason}")]
    InvalidConfiguration { field: String, reason: String },

    #[error("Invalid settings for repository {repository}: {reason}")]
    InvalidSettings { repository: String, reason: String },
}

/// Result type alias for configuration operations.
pub type ConfigurationResult<T> = Result<T, ConfigurationError>;

#[cfg(test)]
#[path = "errors_tests.rs"]
mod tests;
