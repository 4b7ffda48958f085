//! Milestone lookup by number or title

use std::fmt;

use tracing::debug;

use crate::{Error, GitHubApi, Milestone, MilestoneStateFilter, Result};

/// A user-supplied milestone identifier
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MilestoneRef {
    /// Milestone number
    Number(u64),
    /// Milestone title
    Title(String),
}

impl MilestoneRef {
    /// Classify an identifier
    ///
    /// Only plain ASCII digits are a number; anything else, including a
    /// digit string too large for `u64`, is a title.
    pub fn parse(identifier: &str) -> Self {
        if !identifier.is_empty() && identifier.bytes().all(|b| b.is_ascii_digit()) {
            if let Ok(number) = identifier.parse() {
                return MilestoneRef::Number(number);
            }
        }
        MilestoneRef::Title(identifier.to_string())
    }
}

impl fmt::Display for MilestoneRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MilestoneRef::Number(number) => write!(f, "#{}", number),
            MilestoneRef::Title(title) => write!(f, "\"{}\"", title),
        }
    }
}

/// Resolve `identifier` to exactly one milestone of `repo`
///
/// Numbers are fetched directly. Titles are matched exactly against all
/// milestones (open and closed); when several share the title, the one
/// listed last wins.
pub async fn resolve_milestone<A>(api: &A, repo: &str, identifier: &str) -> Result<Milestone>
where
    A: GitHubApi + ?Sized,
{
    match MilestoneRef::parse(identifier) {
        MilestoneRef::Number(number) => api.get_milestone(repo, number).await,
        MilestoneRef::Title(title) => find_milestone_by_title(api, repo, &title)
            .await?
            .ok_or_else(|| Error::MilestoneNotFound {
                title,
                repository: repo.to_string(),
            }),
    }
}

/// Find a milestone by exact title, `None` when no milestone has it
pub async fn find_milestone_by_title<A>(
    api: &A,
    repo: &str,
    title: &str,
) -> Result<Option<Milestone>>
where
    A: GitHubApi + ?Sized,
{
    let milestones = api.list_milestones(repo, MilestoneStateFilter::All).await?;
    let found = last_with_title(milestones, title);

    let number = found.as_ref().map(|m| m.number);
    debug!(repo, title, ?number, "Looked up milestone by title");

    Ok(found)
}

/// The last milestone in listing order whose title equals `title`
pub fn last_with_title(milestones: Vec<Milestone>, title: &str) -> Option<Milestone> {
    milestones.into_iter().rev().find(|m| m.title == title)
}
