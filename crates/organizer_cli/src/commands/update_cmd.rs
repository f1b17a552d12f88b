//! Reconciliation runs.
//!
//! Each command prints a JSON report of what was planned and applied. A run that leaves
//! failed operations behind returns an error so the process exits non-zero.

use organizer_core::{ApplyResult, OrganizationReport, Organizer, RepositoryReport};
use tracing::{info, instrument};

use crate::commands::to_json;
use crate::errors::Error;

#[cfg(test)]
#[path = "update_cmd_tests.rs"]
mod tests;

#[instrument(skip(organizer))]
pub async fn update_repo(organizer: &Organizer, org: &str, repo: &str) -> Result<(), Error> {
    let report = organizer.update_repository(org, repo).await?;
    println!("{}", to_json(&report)?);
    check_repository(&report)
}

#[instrument(skip(organizer))]
pub async fn update_repos(organizer: &Organizer, org: &str) -> Result<(), Error> {
    let report = organizer.update_organization(org).await?;
    println!("{}", to_json(&report)?);
    check_organization(&report)
}

#[instrument(skip(organizer))]
pub async fn update_team_repos(organizer: &Organizer, org: &str) -> Result<(), Error> {
    let result = organizer.update_team_repositories(org).await?;
    println!("{}", to_json(&result)?);
    check_result("team repository access", &result)
}

#[instrument(skip(organizer))]
pub async fn update_team_membership(
    organizer: &Organizer,
    org: &str,
    team: &str,
) -> Result<(), Error> {
    let result = organizer.update_team_membership(org, team).await?;
    println!("{}", to_json(&result)?);
    check_result("team membership", &result)
}

#[instrument(skip(organizer))]
pub async fn update_org_team_membership(organizer: &Organizer, org: &str) -> Result<(), Error> {
    let result = organizer.update_org_team_membership(org).await?;
    println!("{}", to_json(&result)?);
    check_result("team membership", &result)
}

#[instrument(skip(organizer))]
pub async fn update_branch_protection(
    organizer: &Organizer,
    org: &str,
    repo: &str,
) -> Result<(), Error> {
    let report = organizer.update_branch_protection(org, repo).await?;
    println!("{}", to_json(&report)?);
    check_repository(&report)
}

pub fn check_repository(report: &RepositoryReport) -> Result<(), Error> {
    if !report.managed {
        info!(repo = %report.repository, "Repository is not managed");
    }
    check_result(&report.repository, &report.result)
}

pub fn check_organization(report: &OrganizationReport) -> Result<(), Error> {
    if report.unmanaged {
        info!(org = %report.organization, "Organization is not managed");
    }
    if report.is_success() {
        return Ok(());
    }

    let failed_repositories = report.failures.len()
        + report
            .repositories
            .iter()
            .filter(|r| !r.result.is_success())
            .count();
    Err(Error::Incomplete(format!(
        "{} of {} repositories in {} did not reconcile cleanly",
        failed_repositories,
        report.repositories.len() + report.failures.len(),
        report.organization
    )))
}

/// Fails when any operation of `result` failed.
pub fn check_result(subject: &str, result: &ApplyResult) -> Result<(), Error> {
    if result.is_success() {
        Ok(())
    } else {
        Err(Error::Incomplete(format!(
            "{} operation(s) failed for {}: {}",
            result.failed,
            subject,
            result.failed_operations.join(", ")
        )))
    }
}
