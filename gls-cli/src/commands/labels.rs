//! Label listing

use clap::{Args, Subcommand};
use gls_github::{list_labels_everywhere, GitHubApi};
use serde::Serialize;

use super::Context;
use crate::output;

/// Label commands
#[derive(Args, Debug)]
pub struct LabelsArgs {
    #[command(subcommand)]
    pub command: LabelsCommand,
}

#[derive(Subcommand, Debug)]
pub enum LabelsCommand {
    /// List labels of one repository
    #[command(visible_alias = "ls")]
    List {
        /// Repository name (defaults to the template repository)
        #[arg(short, long, visible_alias = "repo")]
        repository: Option<String>,
    },

    /// List labels of every repository
    #[command(visible_alias = "ls-all")]
    ListAll,
}

#[derive(Serialize)]
struct LabelListing<'a> {
    repository: &'a str,
    items: &'a [gls_github::Label],
}

impl LabelsArgs {
    /// Execute the labels command
    pub async fn execute(&self, ctx: &Context) -> anyhow::Result<()> {
        match &self.command {
            LabelsCommand::List { repository } => {
                let repo = ctx.client.repository_or_template(repository.as_deref())?;
                let labels = ctx.client.list_labels(&repo).await?;
                let listing = LabelListing {
                    repository: &repo,
                    items: &labels,
                };
                output::emit(ctx.format, &listing, || output::labels(&repo, &labels))
            }
            LabelsCommand::ListAll => {
                let listings = list_labels_everywhere(&ctx.client).await?;
                output::emit(ctx.format, &listings, || {
                    output::listings(&listings, output::labels)
                })
            }
        }
    }
}
