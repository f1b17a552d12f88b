use std::io;

use thiserror::Error;

#[cfg(test)]
#[path = "errors_tests.rs"]
mod tests;

/// Errors that can occur in the github-organizer CLI.
#[derive(Error, Debug)]
pub enum Error {
    /// No usable GitHub credentials, or the credentials were rejected.
    #[error("Authentication error: {0}")]
    Auth(String),

    /// The organizer TOML file could not be read or parsed.
    #[error("Configuration error: {0}")]
    Config(String),

    /// Invalid command-line arguments were provided.
    #[error("Invalid arguments: {0}")]
    InvalidArguments(String),

    /// A named team, project or column does not exist.
    #[error("No {kind} named '{name}' was found")]
    NotFound { kind: String, name: String },

    /// Failed to load a file from the filesystem.
    #[error("Failed to load file: {0}")]
    LoadFile(io::Error),

    /// A run finished but some operations or repositories failed.
    #[error("Reconciliation incomplete: {0}")]
    Incomplete(String),

    /// Output could not be rendered.
    #[error("Failed to render output: {0}")]
    Output(String),

    #[error(transparent)]
    GitHub(#[from] github_client::Error),

    #[error(transparent)]
    Organizer(#[from] organizer_core::OrganizerError),
}
