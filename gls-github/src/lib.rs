//! gls GitHub - repository, label and milestone access for gls
//!
//! This crate talks to the GitHub REST API and implements the milestone
//! logic on top of it: resolving a milestone by number or title, the
//! create-or-update reconciler, and the operations that span every
//! repository of an organization or user.

mod api;
mod bulk;
mod client;
mod error;
mod models;
mod outcome;
mod reconcile;
mod repos;
mod resolve;

#[cfg(test)]
mod testing;

pub use api::GitHubApi;
pub use bulk::{
    delete_milestone_everywhere, edit_milestone_everywhere, list_labels_everywhere,
    list_milestones_everywhere,
};
pub use client::GitHubClient;
pub use error::{Error, Result};
pub use models::{
    Label, Milestone, MilestoneState, MilestoneStateFilter, MilestoneUpdate, NewMilestone, Owner,
    OwnerType, Repository, Scope,
};
pub use outcome::{BulkReport, RepoAction, RepoListing, RepoOutcome};
pub use reconcile::{reconcile_milestone, sync_milestone, MilestoneDraft, Reconciled, SyncReport};
pub use repos::filter_owned;
pub use resolve::{find_milestone_by_title, last_with_title, resolve_milestone, MilestoneRef};
