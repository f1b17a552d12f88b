//! Typed settings groups.
//!
//! The organization document is kept as an untyped YAML mapping until a repository's
//! entry has been resolved. The types in this module are what the resolved entry, and
//! the organization-wide label and team sections, deserialize into.

pub mod branch_protection;
pub mod issues;
pub mod label;
pub mod repository;
pub mod security;
pub mod team;

pub use branch_protection::{
    BranchProtectionSpec, PullRequestReviewsSpec, RestrictionsSpec, StatusChecksSpec,
};
pub use issues::{IssueSettings, ProjectAutoassign};
pub use label::{LabelSpec, DEFAULT_LABEL_COLOR};
pub use repository::{Features, Merges, RepoSettings};
pub use security::DependencySecurity;
pub use team::TeamSettings;
