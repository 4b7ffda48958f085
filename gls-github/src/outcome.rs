//! Per-repository results of operations spanning all repositories

use std::fmt;

use serde::Serialize;

use crate::Error;

/// What happened in one repository
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum RepoAction {
    Created,
    Updated,
    Deleted,
    /// Deliberately left alone (the source repository of a sync)
    Skipped,
    /// The milestone does not exist there
    Missing,
    Error,
}

impl RepoAction {
    pub fn is_success(&self) -> bool {
        matches!(
            self,
            RepoAction::Created | RepoAction::Updated | RepoAction::Deleted
        )
    }
}

impl fmt::Display for RepoAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            RepoAction::Created => "created",
            RepoAction::Updated => "updated",
            RepoAction::Deleted => "deleted",
            RepoAction::Skipped => "skipped",
            RepoAction::Missing => "missing",
            RepoAction::Error => "error",
        };
        f.write_str(s)
    }
}

/// Outcome for a single repository
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RepoOutcome {
    pub repository: String,
    pub action: RepoAction,
    /// Number of the milestone acted on, when there was one
    #[serde(skip_serializing_if = "Option::is_none")]
    pub milestone: Option<u64>,
    /// Error message for failures
    #[serde(skip_serializing_if = "Option::is_none")]
    pub detail: Option<String>,
}

impl RepoOutcome {
    pub fn done(repository: impl Into<String>, action: RepoAction, milestone: u64) -> Self {
        Self {
            repository: repository.into(),
            action,
            milestone: Some(milestone),
            detail: None,
        }
    }

    pub fn skipped(repository: impl Into<String>) -> Self {
        Self::without_milestone(repository, RepoAction::Skipped)
    }

    pub fn missing(repository: impl Into<String>) -> Self {
        Self::without_milestone(repository, RepoAction::Missing)
    }

    pub fn failed(repository: impl Into<String>, error: &Error) -> Self {
        Self {
            detail: Some(error.to_string()),
            ..Self::without_milestone(repository, RepoAction::Error)
        }
    }

    fn without_milestone(repository: impl Into<String>, action: RepoAction) -> Self {
        Self {
            repository: repository.into(),
            action,
            milestone: None,
            detail: None,
        }
    }
}

/// Outcomes of one milestone operation across repositories, in listing order
#[derive(Debug, Clone, Default, Serialize)]
pub struct BulkReport {
    /// Title of the milestone operated on
    pub milestone: String,
    pub outcomes: Vec<RepoOutcome>,
}

impl BulkReport {
    pub fn new(milestone: impl Into<String>) -> Self {
        Self {
            milestone: milestone.into(),
            outcomes: Vec::new(),
        }
    }

    pub fn push(&mut self, outcome: RepoOutcome) {
        self.outcomes.push(outcome);
    }

    /// Number of repositories with the given action
    pub fn count(&self, action: RepoAction) -> usize {
        self.outcomes.iter().filter(|o| o.action == action).count()
    }

    pub fn succeeded(&self) -> usize {
        self.outcomes.iter().filter(|o| o.action.is_success()).count()
    }

    pub fn failed(&self) -> usize {
        self.count(RepoAction::Error)
    }

    pub fn outcome(&self, repository: &str) -> Option<&RepoOutcome> {
        self.outcomes.iter().find(|o| o.repository == repository)
    }
}

/// Listing of one repository, or the reason it could not be listed
#[derive(Debug, Clone, Serialize)]
pub struct RepoListing<T> {
    pub repository: String,
    pub items: Vec<T>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_report_counts() {
        let mut report = BulkReport::new("v1.0");
        report.push(RepoOutcome::skipped("template"));
        report.push(RepoOutcome::done("api", RepoAction::Created, 1));
        report.push(RepoOutcome::done("web", RepoAction::Updated, 4));
        report.push(RepoOutcome::failed(
            "docs",
            &Error::ValidationFailed("bad".to_string()),
        ));

        assert_eq!(report.succeeded(), 2);
        assert_eq!(report.failed(), 1);
        assert_eq!(report.count(RepoAction::Skipped), 1);
        assert_eq!(
            report.outcome("docs").unwrap().detail.as_deref(),
            Some("Validation failed: bad")
        );
    }

    #[test]
    fn test_outcome_serialization() {
        let value = serde_json::to_value(RepoOutcome::done("api", RepoAction::Created, 3)).unwrap();
        assert_eq!(
            value,
            serde_json::json!({ "repository": "api", "action": "created", "milestone": 3 })
        );

        let value = serde_json::to_value(RepoOutcome::missing("web")).unwrap();
        assert_eq!(
            value,
            serde_json::json!({ "repository": "web", "action": "missing" })
        );
    }
}
