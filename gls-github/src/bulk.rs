//! Milestone and label operations applied to every repository of the scope

use tracing::{debug, info, warn};

use crate::resolve::find_milestone_by_title;
use crate::{
    BulkReport, Error, GitHubApi, Label, Milestone, MilestoneStateFilter, MilestoneUpdate,
    RepoAction, RepoListing, RepoOutcome, Result,
};

/// Apply `update` to the milestone titled `title` in every repository
///
/// Repositories without the title are reported as missing. An empty update
/// is rejected before anything is fetched.
pub async fn edit_milestone_everywhere<A>(
    api: &A,
    title: &str,
    update: &MilestoneUpdate,
) -> Result<BulkReport>
where
    A: GitHubApi + ?Sized,
{
    if update.is_empty() {
        return Err(Error::NothingToUpdate);
    }

    let repos = api.list_repositories().await?;
    info!(title, repos = repos.len(), "Updating milestone in all repositories");

    let mut report = BulkReport::new(title);
    for repo in &repos {
        let result = match find_milestone_by_title(api, &repo.name, title).await {
            Ok(Some(milestone)) => api
                .update_milestone(&repo.name, milestone.number, update)
                .await
                .map(|m| RepoOutcome::done(&repo.name, RepoAction::Updated, m.number)),
            Ok(None) => Ok(RepoOutcome::missing(&repo.name)),
            Err(e) => Err(e),
        };
        report.push(record(&repo.name, result));
    }

    Ok(report)
}

/// Delete the milestone titled `title` from every repository
pub async fn delete_milestone_everywhere<A>(api: &A, title: &str) -> Result<BulkReport>
where
    A: GitHubApi + ?Sized,
{
    let repos = api.list_repositories().await?;
    info!(title, repos = repos.len(), "Deleting milestone from all repositories");

    let mut report = BulkReport::new(title);
    for repo in &repos {
        let result = match find_milestone_by_title(api, &repo.name, title).await {
            Ok(Some(milestone)) => api
                .delete_milestone(&repo.name, milestone.number)
                .await
                .map(|()| RepoOutcome::done(&repo.name, RepoAction::Deleted, milestone.number)),
            Ok(None) => Ok(RepoOutcome::missing(&repo.name)),
            Err(e) => Err(e),
        };
        report.push(record(&repo.name, result));
    }

    Ok(report)
}

/// Labels of every repository; a failing repository carries its error
pub async fn list_labels_everywhere<A>(api: &A) -> Result<Vec<RepoListing<Label>>>
where
    A: GitHubApi + ?Sized,
{
    let repos = api.list_repositories().await?;
    let mut listings = Vec::with_capacity(repos.len());

    for repo in &repos {
        listings.push(listing(&repo.name, api.list_labels(&repo.name).await));
    }

    Ok(listings)
}

/// Milestones of every repository; a failing repository carries its error
pub async fn list_milestones_everywhere<A>(
    api: &A,
    filter: MilestoneStateFilter,
) -> Result<Vec<RepoListing<Milestone>>>
where
    A: GitHubApi + ?Sized,
{
    let repos = api.list_repositories().await?;
    let mut listings = Vec::with_capacity(repos.len());

    for repo in &repos {
        listings.push(listing(
            &repo.name,
            api.list_milestones(&repo.name, filter).await,
        ));
    }

    Ok(listings)
}

fn record(repo: &str, result: Result<RepoOutcome>) -> RepoOutcome {
    result.unwrap_or_else(|e| {
        warn!(repo, error = %e, "Milestone operation failed");
        debug!(repo, error = ?e, "Milestone operation error detail");
        RepoOutcome::failed(repo, &e)
    })
}

fn listing<T>(repo: &str, result: Result<Vec<T>>) -> RepoListing<T> {
    match result {
        Ok(items) => RepoListing {
            repository: repo.to_string(),
            items,
            error: None,
        },
        Err(e) => {
            warn!(repo, error = %e, "Failed to list repository");
            RepoListing {
                repository: repo.to_string(),
                items: Vec::new(),
                error: Some(e.to_string()),
            }
        }
    }
}
