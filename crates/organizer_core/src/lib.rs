//! Reconciliation of GitHub organizations against their configuration document.
//!
//! The planners in this crate compare a repository's effective settings with what GitHub
//! reports and return the [`Operation`]s that close the gap. They are pure functions:
//!
//! - [`plan_labels`], [`plan_team_permissions`], [`plan_team_members`];
//! - [`plan_branch_protection`] and [`build_branch_protection_payload`];
//! - [`plan_repository_features`] and [`plan_dependency_security`];
//! - [`plan_issue_labels`] and [`plan_project_card`].
//!
//! [`OperationExecutor`] applies operations through a
//! [`github_client::OrganizationClient`], and [`Organizer`] runs whole reconciliation
//! passes for a repository, a team or an organization.

pub mod branch_protection;
pub mod errors;
pub mod executor;
pub mod features;
pub mod issues;
pub mod labels;
pub mod operations;
pub mod organizer;
pub mod repository;
pub mod teams;

#[cfg(test)]
pub(crate) mod testing;

pub use branch_protection::{
    build_branch_protection_payload, plan_branch_protection, protection_targets,
};
pub use errors::{OrganizerError, OrganizerResult};
pub use executor::{ApplyResult, OperationExecutor};
pub use features::{plan_dependency_security, plan_repository_features, SecurityState};
pub use issues::{plan_issue_labels, plan_project_card, ProjectOwner};
pub use labels::{label_matches, plan_labels};
pub use operations::{Operation, TeamPermission};
pub use organizer::{
    OrganizationReport, Organizer, RepositoryFailure, RepositoryPlan, RepositoryReport,
};
pub use repository::{RepositoryDescriptor, RepositorySnapshot};
pub use teams::{plan_team_members, plan_team_permissions};
