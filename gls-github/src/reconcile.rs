//! Milestone create-or-update and cross-repository sync

use chrono::{DateTime, Utc};
use serde::Serialize;
use tracing::{debug, info, warn};

use crate::resolve::{find_milestone_by_title, resolve_milestone};
use crate::{
    BulkReport, GitHubApi, Milestone, MilestoneState, MilestoneUpdate, NewMilestone, RepoAction,
    RepoOutcome, Result,
};

/// The milestone fields carried from a source to a target repository
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MilestoneDraft {
    pub title: String,
    pub description: Option<String>,
    pub due_on: Option<DateTime<Utc>>,
    pub state: MilestoneState,
}

impl From<&Milestone> for MilestoneDraft {
    fn from(milestone: &Milestone) -> Self {
        Self {
            title: milestone.title.clone(),
            description: milestone.description.clone(),
            due_on: milestone.due_on,
            state: milestone.state,
        }
    }
}

impl MilestoneDraft {
    fn to_new(&self) -> NewMilestone {
        NewMilestone {
            title: self.title.clone(),
            description: self.description.clone().filter(|d| !d.is_empty()),
            due_on: self.due_on,
            state: Some(self.state),
        }
    }

    /// Overwrites every mutable field, clearing what the draft lacks
    fn to_update(&self) -> MilestoneUpdate {
        MilestoneUpdate {
            title: Some(self.title.clone()),
            description: Some(self.description.clone().unwrap_or_default()),
            due_on: Some(self.due_on),
            state: Some(self.state),
        }
    }
}

/// Result of reconciling one repository
#[derive(Debug, Clone, Serialize)]
pub struct Reconciled {
    /// [`RepoAction::Created`] or [`RepoAction::Updated`]
    pub action: RepoAction,
    pub milestone: Milestone,
}

/// Create or update the milestone titled `draft.title` in `repo`
///
/// The lookup and the write are separate requests, so a milestone created or
/// renamed by someone else in between is not seen; whichever write lands
/// last wins. GitHub offers no conditional write to close this gap.
pub async fn reconcile_milestone<A>(
    api: &A,
    repo: &str,
    draft: &MilestoneDraft,
) -> Result<Reconciled>
where
    A: GitHubApi + ?Sized,
{
    match find_milestone_by_title(api, repo, &draft.title).await? {
        Some(existing) => {
            debug!(repo, number = existing.number, title = %draft.title, "Milestone exists, updating");
            let milestone = api
                .update_milestone(repo, existing.number, &draft.to_update())
                .await?;
            Ok(Reconciled {
                action: RepoAction::Updated,
                milestone,
            })
        }
        None => {
            debug!(repo, title = %draft.title, "Milestone missing, creating");
            let milestone = api.create_milestone(repo, &draft.to_new()).await?;
            Ok(Reconciled {
                action: RepoAction::Created,
                milestone,
            })
        }
    }
}

/// Result of syncing a milestone from its source repository
#[derive(Debug, Clone, Serialize)]
pub struct SyncReport {
    /// Repository the milestone was read from
    pub repository: String,
    pub source: Milestone,
    #[serde(flatten)]
    pub report: BulkReport,
}

/// Copy a milestone from `source_repo` into every other repository of the scope
///
/// Failing to resolve the source milestone or to list repositories aborts
/// the sync. After that every repository is attempted and its outcome
/// recorded, whatever happened in the others.
pub async fn sync_milestone<A>(
    api: &A,
    source_repo: &str,
    identifier: &str,
) -> Result<SyncReport>
where
    A: GitHubApi + ?Sized,
{
    let source = resolve_milestone(api, source_repo, identifier).await?;
    info!(repo = source_repo, number = source.number, title = %source.title, "Found source milestone");

    let draft = MilestoneDraft::from(&source);
    let repos = api.list_repositories().await?;
    let mut report = BulkReport::new(source.title.clone());

    for repo in &repos {
        if repo.name == source_repo {
            report.push(RepoOutcome::skipped(&repo.name));
            continue;
        }

        match reconcile_milestone(api, &repo.name, &draft).await {
            Ok(reconciled) => report.push(RepoOutcome::done(
                &repo.name,
                reconciled.action,
                reconciled.milestone.number,
            )),
            Err(e) => {
                warn!(repo = %repo.name, error = %e, "Failed to sync milestone");
                debug!(repo = %repo.name, error = ?e, "Sync error detail");
                report.push(RepoOutcome::failed(&repo.name, &e));
            }
        }
    }

    info!(
        title = %source.title,
        succeeded = report.succeeded(),
        failed = report.failed(),
        "Milestone sync finished"
    );

    Ok(SyncReport {
        repository: source_repo.to_string(),
        source,
        report,
    })
}
