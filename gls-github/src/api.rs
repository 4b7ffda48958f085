//! The GitHub operations gls depends on

use async_trait::async_trait;

use crate::{
    Label, Milestone, MilestoneStateFilter, MilestoneUpdate, NewMilestone, Repository, Result,
    Scope,
};

/// Repository, label and milestone access for one authenticated session
///
/// Implementations return complete (all pages) listings and map remote 404s
/// onto the not-found variants of [`crate::Error`]. Mutations are sent
/// exactly once.
#[async_trait]
pub trait GitHubApi: Send + Sync {
    /// The account whose repositories are operated on
    fn scope(&self) -> &Scope;

    /// Repositories directly owned by [`GitHubApi::scope`], in listing order
    async fn list_repositories(&self) -> Result<Vec<Repository>>;

    /// Labels of a repository
    async fn list_labels(&self, repo: &str) -> Result<Vec<Label>>;

    /// Milestones of a repository matching `filter`, in listing order
    async fn list_milestones(
        &self,
        repo: &str,
        filter: MilestoneStateFilter,
    ) -> Result<Vec<Milestone>>;

    /// A single milestone by number
    async fn get_milestone(&self, repo: &str, number: u64) -> Result<Milestone>;

    async fn create_milestone(&self, repo: &str, milestone: &NewMilestone) -> Result<Milestone>;

    async fn update_milestone(
        &self,
        repo: &str,
        number: u64,
        update: &MilestoneUpdate,
    ) -> Result<Milestone>;

    async fn delete_milestone(&self, repo: &str, number: u64) -> Result<()>;
}
