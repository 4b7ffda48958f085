//! Repository, label and milestone representations

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Kind of account owning a repository
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum OwnerType {
    User,
    Organization,
    /// Bots and anything GitHub adds later
    #[serde(other)]
    Other,
}

/// Repository owner
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Owner {
    pub login: String,
    #[serde(rename = "type")]
    pub owner_type: OwnerType,
}

/// GitHub repository
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Repository {
    /// Repository name (unique within the owner)
    pub name: String,
    #[serde(default)]
    pub full_name: Option<String>,
    pub owner: Owner,
    #[serde(default)]
    pub private: bool,
    #[serde(default)]
    pub fork: bool,
    #[serde(default)]
    pub html_url: Option<String>,
}

/// Issue label
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Label {
    pub name: String,
    /// Hex color without the leading `#`
    pub color: String,
    #[serde(default)]
    pub description: Option<String>,
}

/// Milestone state
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MilestoneState {
    Open,
    Closed,
}

impl fmt::Display for MilestoneState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MilestoneState::Open => write!(f, "open"),
            MilestoneState::Closed => write!(f, "closed"),
        }
    }
}

/// State filter for listing milestones
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum MilestoneStateFilter {
    #[default]
    Open,
    Closed,
    All,
}

impl MilestoneStateFilter {
    /// Value of the `state` query parameter
    pub fn as_param(&self) -> &'static str {
        match self {
            MilestoneStateFilter::Open => "open",
            MilestoneStateFilter::Closed => "closed",
            MilestoneStateFilter::All => "all",
        }
    }

    /// Whether a milestone in `state` passes this filter
    pub fn matches(&self, state: MilestoneState) -> bool {
        match self {
            MilestoneStateFilter::Open => state == MilestoneState::Open,
            MilestoneStateFilter::Closed => state == MilestoneState::Closed,
            MilestoneStateFilter::All => true,
        }
    }
}

/// GitHub milestone
///
/// `number` is the only reliable identity; titles may be duplicated.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Milestone {
    #[serde(default)]
    pub id: u64,
    pub number: u64,
    pub title: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub due_on: Option<DateTime<Utc>>,
    pub state: MilestoneState,
    #[serde(default)]
    pub open_issues: u64,
    #[serde(default)]
    pub closed_issues: u64,
    #[serde(default)]
    pub html_url: Option<String>,
}

/// Payload for creating a milestone
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NewMilestone {
    pub title: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub due_on: Option<DateTime<Utc>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub state: Option<MilestoneState>,
}

impl NewMilestone {
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            description: None,
            due_on: None,
            state: None,
        }
    }
}

/// Partial update of a milestone
///
/// Unset fields are left untouched. `due_on: Some(None)` clears the due date.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct MilestoneUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub due_on: Option<Option<DateTime<Utc>>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub state: Option<MilestoneState>,
}

impl MilestoneUpdate {
    /// True when no field would be changed
    pub fn is_empty(&self) -> bool {
        self.title.is_none()
            && self.description.is_none()
            && self.due_on.is_none()
            && self.state.is_none()
    }

    /// Apply this update to a local copy of a milestone
    pub fn apply_to(&self, milestone: &mut Milestone) {
        if let Some(title) = &self.title {
            milestone.title = title.clone();
        }
        if let Some(description) = &self.description {
            milestone.description = Some(description.clone()).filter(|d| !d.is_empty());
        }
        if let Some(due_on) = self.due_on {
            milestone.due_on = due_on;
        }
        if let Some(state) = self.state {
            milestone.state = state;
        }
    }
}

/// The account whose repositories are operated on
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "type", content = "login", rename_all = "lowercase")]
pub enum Scope {
    Organization(String),
    User(String),
}

impl Scope {
    pub fn login(&self) -> &str {
        match self {
            Scope::Organization(login) | Scope::User(login) => login,
        }
    }

    pub fn owner_type(&self) -> OwnerType {
        match self {
            Scope::Organization(_) => OwnerType::Organization,
            Scope::User(_) => OwnerType::User,
        }
    }

    /// Whether `owner` is exactly this scope
    pub fn owns(&self, owner: &Owner) -> bool {
        owner.owner_type == self.owner_type() && owner.login == self.login()
    }
}

impl fmt::Display for Scope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Scope::Organization(login) => write!(f, "organization {}", login),
            Scope::User(login) => write!(f, "user {}", login),
        }
    }
}
