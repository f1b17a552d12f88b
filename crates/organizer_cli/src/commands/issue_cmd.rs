//! Issue triage commands.

use organizer_core::Organizer;
use tracing::{info, instrument};

use crate::commands::to_json;
use crate::commands::update_cmd::check_result;
use crate::errors::Error;

#[instrument(skip(organizer))]
pub async fn assign_issue(
    organizer: &Organizer,
    org: &str,
    repo: &str,
    issue: u64,
) -> Result<(), Error> {
    let result = organizer.assign_issue(org, repo, issue).await?;
    if !result.has_changes() {
        info!(repo = repo, issue = issue, "Issue needs no project card");
    }
    println!("{}", to_json(&result)?);
    check_result(&format!("{}#{}", repo, issue), &result)
}

#[instrument(skip(organizer))]
pub async fn label_issue(
    organizer: &Organizer,
    org: &str,
    repo: &str,
    issue: u64,
) -> Result<(), Error> {
    let result = organizer.label_issue(org, repo, issue).await?;
    if !result.has_changes() {
        info!(repo = repo, issue = issue, "Issue already carries its labels");
    }
    println!("{}", to_json(&result)?);
    check_result(&format!("{}#{}", repo, issue), &result)
}
