//! Milestone management commands

use chrono::{DateTime, NaiveDate, TimeZone, Utc};
use clap::{Args, Subcommand, ValueEnum};
use gls_github::{
    delete_milestone_everywhere, edit_milestone_everywhere, find_milestone_by_title,
    list_milestones_everywhere, resolve_milestone, sync_milestone, Error, GitHubApi, Milestone,
    MilestoneRef, MilestoneState, MilestoneStateFilter, MilestoneUpdate, NewMilestone,
};
use serde::Serialize;

use super::Context;
use crate::output;

/// Milestone management commands
#[derive(Args, Debug)]
pub struct MilestonesArgs {
    #[command(subcommand)]
    pub command: MilestonesCommand,
}

#[derive(Subcommand, Debug)]
pub enum MilestonesCommand {
    /// List milestones of one repository
    #[command(visible_alias = "ls")]
    List {
        /// Repository name (defaults to the template repository)
        #[arg(short, long, visible_alias = "repo")]
        repository: Option<String>,

        /// Include closed milestones
        #[arg(long)]
        include_closed: bool,
    },

    /// List milestones of every repository
    #[command(visible_alias = "ls-all")]
    ListAll {
        /// Include closed milestones
        #[arg(long)]
        include_closed: bool,
    },

    /// Create a milestone in one repository
    #[command(visible_alias = "create")]
    Add {
        /// Milestone title
        title: String,

        /// Repository name (defaults to the template repository)
        #[arg(short, long, visible_alias = "repo")]
        repository: Option<String>,

        #[command(flatten)]
        fields: FieldArgs,
    },

    /// Edit a milestone, given by number or title, in one repository
    #[command(visible_alias = "update")]
    Edit {
        /// Milestone number or title
        milestone: String,

        /// Repository name (defaults to the template repository)
        #[arg(short, long, visible_alias = "repo")]
        repository: Option<String>,

        /// New title
        #[arg(long)]
        title: Option<String>,

        #[command(flatten)]
        fields: FieldArgs,
    },

    /// Edit the milestone with this title in every repository
    #[command(visible_alias = "update-all")]
    EditAll {
        /// Milestone title
        milestone: String,

        /// New title
        #[arg(long)]
        title: Option<String>,

        #[command(flatten)]
        fields: FieldArgs,
    },

    /// Delete a milestone, given by number or title, from one repository
    #[command(visible_aliases = ["del", "remove", "rm"])]
    Delete {
        /// Milestone number or title
        milestone: String,

        /// Repository name (defaults to the template repository)
        #[arg(short, long, visible_alias = "repo")]
        repository: Option<String>,
    },

    /// Delete the milestone with this title from every repository
    #[command(visible_aliases = ["del-all", "remove-all", "rm-all"])]
    DeleteAll {
        /// Milestone title
        milestone: String,
    },

    /// Copy a milestone to every other repository, creating or updating it
    Sync {
        /// Milestone number or title in the source repository
        milestone: String,

        /// Source repository (defaults to the template repository)
        #[arg(short, long, visible_alias = "repo")]
        repository: Option<String>,
    },
}

/// Optional milestone fields shared by add and the edit commands
#[derive(Args, Debug, Clone, Default)]
pub struct FieldArgs {
    /// Milestone description
    #[arg(short, long)]
    pub description: Option<String>,

    /// Due date, RFC 3339 or YYYY-MM-DD
    #[arg(long, value_parser = parse_due_on)]
    pub due_on: Option<DateTime<Utc>>,

    /// Milestone state
    #[arg(short, long)]
    pub state: Option<StateArg>,
}

impl FieldArgs {
    fn to_update(&self, title: Option<String>) -> MilestoneUpdate {
        MilestoneUpdate {
            title,
            description: self.description.clone(),
            due_on: self.due_on.map(Some),
            state: self.state.map(MilestoneState::from),
        }
    }
}

#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum StateArg {
    Open,
    Closed,
}

impl From<StateArg> for MilestoneState {
    fn from(state: StateArg) -> Self {
        match state {
            StateArg::Open => MilestoneState::Open,
            StateArg::Closed => MilestoneState::Closed,
        }
    }
}

fn state_filter(include_closed: bool) -> MilestoneStateFilter {
    if include_closed {
        MilestoneStateFilter::All
    } else {
        MilestoneStateFilter::Open
    }
}

/// Parse a due date given as RFC 3339 or as a plain date at midnight UTC
pub fn parse_due_on(value: &str) -> Result<DateTime<Utc>, String> {
    if let Ok(datetime) = DateTime::parse_from_rfc3339(value) {
        return Ok(datetime.with_timezone(&Utc));
    }

    NaiveDate::parse_from_str(value, "%Y-%m-%d")
        .ok()
        .and_then(|date| date.and_hms_opt(0, 0, 0))
        .map(|naive| Utc.from_utc_datetime(&naive))
        .ok_or_else(|| {
            format!(
                "invalid date '{}', expected YYYY-MM-DD or an RFC 3339 timestamp",
                value
            )
        })
}

#[derive(Serialize)]
struct MilestoneListing<'a> {
    repository: &'a str,
    items: &'a [Milestone],
}

#[derive(Serialize)]
struct MilestoneDeleted<'a> {
    repository: &'a str,
    milestone: u64,
    deleted: bool,
}

impl MilestonesArgs {
    /// Execute the milestones command
    pub async fn execute(&self, ctx: &Context) -> anyhow::Result<()> {
        match &self.command {
            MilestonesCommand::List {
                repository,
                include_closed,
            } => list(ctx, repository.as_deref(), *include_closed).await,
            MilestonesCommand::ListAll { include_closed } => {
                let listings =
                    list_milestones_everywhere(&ctx.client, state_filter(*include_closed)).await?;
                output::emit(ctx.format, &listings, || {
                    output::listings(&listings, output::milestones)
                })
            }
            MilestonesCommand::Add {
                title,
                repository,
                fields,
            } => add(ctx, title, repository.as_deref(), fields).await,
            MilestonesCommand::Edit {
                milestone,
                repository,
                title,
                fields,
            } => {
                let update = fields.to_update(title.clone());
                edit(ctx, milestone, repository.as_deref(), &update).await
            }
            MilestonesCommand::EditAll {
                milestone,
                title,
                fields,
            } => {
                let update = fields.to_update(title.clone());
                let report = edit_milestone_everywhere(&ctx.client, milestone, &update).await?;
                output::emit(ctx.format, &report, || {
                    output::bulk("Updating", "from", &report)
                })
            }
            MilestonesCommand::Delete {
                milestone,
                repository,
            } => delete(ctx, milestone, repository.as_deref()).await,
            MilestonesCommand::DeleteAll { milestone } => {
                let report = delete_milestone_everywhere(&ctx.client, milestone).await?;
                output::emit(ctx.format, &report, || {
                    output::bulk("Deleting", "from", &report)
                })
            }
            MilestonesCommand::Sync {
                milestone,
                repository,
            } => {
                let repo = ctx.client.repository_or_template(repository.as_deref())?;
                let report = sync_milestone(&ctx.client, &repo, milestone).await?;
                output::emit(ctx.format, &report, || output::sync(&report))
            }
        }
    }
}

async fn list(ctx: &Context, repository: Option<&str>, include_closed: bool) -> anyhow::Result<()> {
    let repo = ctx.client.repository_or_template(repository)?;
    let milestones = ctx
        .client
        .list_milestones(&repo, state_filter(include_closed))
        .await?;

    let listing = MilestoneListing {
        repository: &repo,
        items: &milestones,
    };
    output::emit(ctx.format, &listing, || {
        output::milestones(&repo, &milestones)
    })
}

async fn add(
    ctx: &Context,
    title: &str,
    repository: Option<&str>,
    fields: &FieldArgs,
) -> anyhow::Result<()> {
    let repo = ctx.client.repository_or_template(repository)?;
    let new = NewMilestone {
        title: title.to_string(),
        description: fields.description.clone(),
        due_on: fields.due_on,
        state: fields.state.map(MilestoneState::from),
    };

    let milestone = ctx.client.create_milestone(&repo, &new).await?;
    output::emit(ctx.format, &milestone, || {
        format!("\"{}\" is created successfully.\n", milestone.title)
    })
}

async fn edit(
    ctx: &Context,
    identifier: &str,
    repository: Option<&str>,
    update: &MilestoneUpdate,
) -> anyhow::Result<()> {
    if update.is_empty() {
        return Err(Error::NothingToUpdate.into());
    }

    let repo = ctx.client.repository_or_template(repository)?;
    let existing = resolve_milestone(&ctx.client, &repo, identifier).await?;
    let milestone = ctx
        .client
        .update_milestone(&repo, existing.number, update)
        .await?;

    output::emit(ctx.format, &milestone, || {
        format!("\"{}\" is updated successfully.\n", milestone.title)
    })
}

async fn delete(ctx: &Context, identifier: &str, repository: Option<&str>) -> anyhow::Result<()> {
    let repo = ctx.client.repository_or_template(repository)?;

    let reference = MilestoneRef::parse(identifier);
    let number = match &reference {
        MilestoneRef::Number(number) => *number,
        MilestoneRef::Title(title) => {
            find_milestone_by_title(&ctx.client, &repo, title)
                .await?
                .ok_or_else(|| Error::MilestoneNotFound {
                    title: title.clone(),
                    repository: repo.clone(),
                })?
                .number
        }
    };

    ctx.client.delete_milestone(&repo, number).await?;

    let deleted = MilestoneDeleted {
        repository: &repo,
        milestone: number,
        deleted: true,
    };
    output::emit(ctx.format, &deleted, || match reference {
        MilestoneRef::Number(number) => format!("Milestone #{} is deleted successfully.\n", number),
        MilestoneRef::Title(title) => {
            format!("Milestone \"{}\" is deleted successfully.\n", title)
        }
    })
}
