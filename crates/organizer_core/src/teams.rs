//! Team reconciliation.
//!
//! Two planners live here: one for the access a team has to a repository and one for the
//! membership of a team.

use config_manager::TeamSettings;
use github_client::TeamRole;
use std::collections::{BTreeMap, BTreeSet};

use crate::{Operation, OrganizerResult, TeamPermission};

#[cfg(test)]
#[path = "teams_tests.rs"]
mod tests;

/// Plans the access of `team` to `repository`.
///
/// `current` holds the permission flags GitHub reports for the pair. They are cumulative:
/// a push grant shows up as `{pull, push}` and an admin grant as `{pull, push, admin}`.
///
/// A desired permission is applied unless it is already in place. It counts as in place
/// when its flag is in `current`, except that `pull` is re-applied when more than one flag
/// is set and `push` when more than two are set, which narrows a broader grant. Without a
/// desired permission, access is removed when `teams_clean` is set and the team has any.
///
/// # Errors
///
/// Returns [`crate::OrganizerError::PlanValidation`] when `desired` is not a known level.
pub fn plan_team_permissions(
    team: &str,
    repository: &str,
    desired: Option<&str>,
    current: &BTreeSet<String>,
    teams_clean: bool,
) -> OrganizerResult<Vec<Operation>> {
    let Some(desired) = desired else {
        if teams_clean && !current.is_empty() {
            return Ok(vec![Operation::RemoveTeamRepoAccess {
                team: team.to_string(),
                repository: repository.to_string(),
            }]);
        }
        return Ok(Vec::new());
    };

    let permission = TeamPermission::parse(&format!("teams.{}", team), desired)?;
    if permission_in_place(permission, current) {
        return Ok(Vec::new());
    }

    Ok(vec![Operation::SetTeamRepoPermission {
        team: team.to_string(),
        repository: repository.to_string(),
        permission,
    }])
}

fn permission_in_place(permission: TeamPermission, current: &BTreeSet<String>) -> bool {
    match permission {
        TeamPermission::Pull if current.len() > 1 => false,
        TeamPermission::Push if current.len() > 2 => false,
        _ => current.contains(permission.as_str()),
    }
}

/// Plans the membership of `team`.
///
/// `current` maps each member's login to their role. Logins compare case-insensitively. A
/// login listed as both member and maintainer is a maintainer.
///
/// Additions and role changes come first, in login order, followed by removals of unlisted
/// members when `members_clean` is set.
pub fn plan_team_members(
    team: &str,
    settings: &TeamSettings,
    current: &BTreeMap<String, TeamRole>,
) -> Vec<Operation> {
    let mut desired: BTreeMap<String, (&str, TeamRole)> = BTreeMap::new();
    for login in &settings.members {
        desired.insert(login.to_lowercase(), (login.as_str(), TeamRole::Member));
    }
    for login in &settings.maintainers {
        desired.insert(login.to_lowercase(), (login.as_str(), TeamRole::Maintainer));
    }

    let current: BTreeMap<String, (&str, TeamRole)> = current
        .iter()
        .map(|(login, role)| (login.to_lowercase(), (login.as_str(), *role)))
        .collect();

    let mut operations: Vec<Operation> = desired
        .iter()
        .filter(|(key, (_, role))| current.get(*key).map(|(_, r)| r) != Some(role))
        .map(|(_, (login, role))| Operation::AddTeamMember {
            team: team.to_string(),
            username: login.to_string(),
            role: *role,
        })
        .collect();

    if settings.members_clean {
        operations.extend(
            current
                .iter()
                .filter(|(key, _)| !desired.contains_key(*key))
                .map(|(_, (login, _))| Operation::RemoveTeamMember {
                    team: team.to_string(),
                    username: login.to_string(),
                }),
        );
    }

    operations
}
