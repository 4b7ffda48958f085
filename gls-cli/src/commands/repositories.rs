//! Repository listing

use clap::{Args, Subcommand};
use gls_github::GitHubApi;

use super::Context;
use crate::output;

/// Repository commands
#[derive(Args, Debug)]
pub struct RepositoriesArgs {
    #[command(subcommand)]
    pub command: Option<RepositoriesCommand>,
}

#[derive(Subcommand, Debug)]
pub enum RepositoriesCommand {
    /// List repositories owned by the organization or user
    #[command(visible_alias = "ls")]
    List,
}

impl RepositoriesArgs {
    /// Execute the repositories command; listing is the default
    pub async fn execute(&self, ctx: &Context) -> anyhow::Result<()> {
        match self.command {
            Some(RepositoriesCommand::List) | None => list(ctx).await,
        }
    }
}

async fn list(ctx: &Context) -> anyhow::Result<()> {
    let repos = ctx.client.list_repositories().await?;
    output::emit(ctx.format, &repos, || {
        output::repositories(&repos, ctx.client.scope(), ctx.client.template_repo())
    })
}
