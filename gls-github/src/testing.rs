//! In-memory GitHub used by the unit tests

use std::collections::{HashMap, HashSet};
use std::sync::Mutex;

use async_trait::async_trait;

use crate::repos::filter_owned;
use crate::{
    Error, GitHubApi, Label, Milestone, MilestoneState, MilestoneStateFilter, MilestoneUpdate,
    NewMilestone, Owner, OwnerType, Repository, Result, Scope,
};

/// Fake GitHub holding milestones per repository and recording mutations
pub struct FakeGitHub {
    scope: Scope,
    repos: Vec<Repository>,
    labels: HashMap<String, Vec<Label>>,
    milestones: Mutex<HashMap<String, Vec<Milestone>>>,
    rejected: HashSet<String>,
    broken: HashSet<String>,
    calls: Mutex<Vec<String>>,
}

impl FakeGitHub {
    pub fn new(org: &str) -> Self {
        Self {
            scope: Scope::Organization(org.to_string()),
            repos: Vec::new(),
            labels: HashMap::new(),
            milestones: Mutex::new(HashMap::new()),
            rejected: HashSet::new(),
            broken: HashSet::new(),
            calls: Mutex::new(Vec::new()),
        }
    }

    /// Add a repository owned by the scope
    pub fn with_repo(self, name: &str) -> Self {
        let login = self.scope.login().to_string();
        self.with_foreign_repo(name, &login, OwnerType::Organization)
    }

    /// Add a repository with an arbitrary owner
    pub fn with_foreign_repo(mut self, name: &str, login: &str, owner_type: OwnerType) -> Self {
        self.repos.push(Repository {
            name: name.to_string(),
            full_name: Some(format!("{}/{}", login, name)),
            owner: Owner {
                login: login.to_string(),
                owner_type,
            },
            private: false,
            fork: false,
            html_url: None,
        });
        self.milestones
            .get_mut()
            .unwrap()
            .entry(name.to_string())
            .or_default();
        self
    }

    pub fn with_milestone(self, repo: &str, title: &str, state: MilestoneState) -> Self {
        {
            let mut all = self.milestones.lock().unwrap();
            let list = all.entry(repo.to_string()).or_default();
            let number = list.iter().map(|m| m.number).max().unwrap_or(0) + 1;
            list.push(milestone(number, title, state));
        }
        self
    }

    pub fn with_label(mut self, repo: &str, name: &str, color: &str) -> Self {
        self.labels.entry(repo.to_string()).or_default().push(Label {
            name: name.to_string(),
            color: color.to_string(),
            description: None,
        });
        self
    }

    /// Creates and updates in `repo` fail with a validation error
    pub fn rejecting(mut self, repo: &str) -> Self {
        self.rejected.insert(repo.to_string());
        self
    }

    /// Every call touching `repo` fails with a server error
    pub fn broken(mut self, repo: &str) -> Self {
        self.broken.insert(repo.to_string());
        self
    }

    /// Mutations performed so far, e.g. `create api v1.0`
    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }

    pub fn milestones(&self, repo: &str) -> Vec<Milestone> {
        self.milestones
            .lock()
            .unwrap()
            .get(repo)
            .cloned()
            .unwrap_or_default()
    }

    fn check(&self, repo: &str) -> Result<()> {
        if self.broken.contains(repo) {
            return Err(Error::Remote {
                status: 500,
                message: "Server Error".to_string(),
            });
        }
        if !self.milestones.lock().unwrap().contains_key(repo) {
            return Err(Error::RepositoryNotFound(repo.to_string()));
        }
        Ok(())
    }

    fn record(&self, call: String) {
        self.calls.lock().unwrap().push(call);
    }
}

pub fn milestone(number: u64, title: &str, state: MilestoneState) -> Milestone {
    Milestone {
        id: 1000 + number,
        number,
        title: title.to_string(),
        description: None,
        due_on: None,
        state,
        open_issues: 0,
        closed_issues: 0,
        html_url: None,
    }
}

#[async_trait]
impl GitHubApi for FakeGitHub {
    fn scope(&self) -> &Scope {
        &self.scope
    }

    async fn list_repositories(&self) -> Result<Vec<Repository>> {
        Ok(filter_owned(self.repos.clone(), &self.scope))
    }

    async fn list_labels(&self, repo: &str) -> Result<Vec<Label>> {
        self.check(repo)?;
        Ok(self.labels.get(repo).cloned().unwrap_or_default())
    }

    async fn list_milestones(
        &self,
        repo: &str,
        filter: MilestoneStateFilter,
    ) -> Result<Vec<Milestone>> {
        self.check(repo)?;
        Ok(self
            .milestones(repo)
            .into_iter()
            .filter(|m| filter.matches(m.state))
            .collect())
    }

    async fn get_milestone(&self, repo: &str, number: u64) -> Result<Milestone> {
        self.check(repo)?;
        self.milestones(repo)
            .into_iter()
            .find(|m| m.number == number)
            .ok_or_else(|| Error::MilestoneNumberNotFound {
                number,
                repository: repo.to_string(),
            })
    }

    async fn create_milestone(&self, repo: &str, new: &NewMilestone) -> Result<Milestone> {
        self.check(repo)?;
        self.record(format!("create {} {}", repo, new.title));
        if self.rejected.contains(repo) {
            return Err(Error::ValidationFailed("Validation Failed (custom)".to_string()));
        }

        let mut all = self.milestones.lock().unwrap();
        let list = all.entry(repo.to_string()).or_default();
        let number = list.iter().map(|m| m.number).max().unwrap_or(0) + 1;
        let mut created = milestone(number, &new.title, new.state.unwrap_or(MilestoneState::Open));
        created.description = new.description.clone();
        created.due_on = new.due_on;
        list.push(created.clone());
        Ok(created)
    }

    async fn update_milestone(
        &self,
        repo: &str,
        number: u64,
        update: &MilestoneUpdate,
    ) -> Result<Milestone> {
        self.check(repo)?;
        self.record(format!("update {} #{}", repo, number));
        if update.is_empty() {
            return Err(Error::NothingToUpdate);
        }
        if self.rejected.contains(repo) {
            return Err(Error::ValidationFailed("Validation Failed (custom)".to_string()));
        }

        let mut all = self.milestones.lock().unwrap();
        let existing = all
            .get_mut(repo)
            .and_then(|list| list.iter_mut().find(|m| m.number == number))
            .ok_or_else(|| Error::MilestoneNumberNotFound {
                number,
                repository: repo.to_string(),
            })?;
        update.apply_to(existing);
        Ok(existing.clone())
    }

    async fn delete_milestone(&self, repo: &str, number: u64) -> Result<()> {
        self.check(repo)?;
        self.record(format!("delete {} #{}", repo, number));

        let mut all = self.milestones.lock().unwrap();
        let list = all.entry(repo.to_string()).or_default();
        let before = list.len();
        list.retain(|m| m.number != number);
        if list.len() == before {
            return Err(Error::MilestoneNumberNotFound {
                number,
                repository: repo.to_string(),
            });
        }
        Ok(())
    }
}
