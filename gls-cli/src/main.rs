//! gls CLI - keep GitHub labels and milestones in sync
//!
//! Lists repositories, labels and milestones of an organization or user and
//! copies milestones from a template repository to all the others.

mod commands;
mod output;

use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};
use gls_core::{Config, ConfigOverrides, OutputFormat, Secrets};
use gls_github::GitHubClient;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use commands::{Context, LabelsArgs, MilestonesArgs, RepositoriesArgs};

/// gls: sync GitHub labels and milestones from a template repository
#[derive(Parser, Debug)]
#[command(name = "gls")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    /// GitHub personal access token
    #[arg(long, global = true, env = "GITHUB_TOKEN", hide_env_values = true)]
    token: Option<String>,

    /// GitHub user name for basic auth
    #[arg(short, long, global = true, env = "GLS_USERNAME")]
    username: Option<String>,

    /// GitHub password for basic auth
    #[arg(short, long, global = true, env = "GLS_PASSWORD", hide_env_values = true)]
    password: Option<String>,

    /// Organization to operate on (defaults to the authenticated user)
    #[arg(short, long, global = true, env = "GLS_ORGANIZATION")]
    organization: Option<String>,

    /// Template repository name
    #[arg(short, long, global = true, env = "GLS_TEMPLATE_REPO")]
    template_repo: Option<String>,

    /// Output format
    #[arg(short, long, global = true, env = "GLS_FORMAT", value_enum)]
    format: Option<FormatArg>,

    /// Path to the config file
    #[arg(short, long, global = true, env = "GLS_CONFIG")]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum FormatArg {
    Plain,
    Json,
}

impl From<FormatArg> for OutputFormat {
    fn from(format: FormatArg) -> Self {
        match format {
            FormatArg::Plain => OutputFormat::Plain,
            FormatArg::Json => OutputFormat::Json,
        }
    }
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Show version information
    Version,

    /// List repositories of the organization or user
    #[command(visible_aliases = ["repos", "repo", "rp"])]
    Repositories(RepositoriesArgs),

    /// List labels
    Labels(LabelsArgs),

    /// Manage and sync milestones
    #[command(visible_alias = "ms")]
    Milestones(MilestonesArgs),

    /// Show current configuration
    Config,
}

fn init_tracing(verbose: bool) {
    let default = if verbose {
        "warn,gls=debug,gls_core=debug,gls_github=debug"
    } else {
        "warn"
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));

    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(filter)
        .init();
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    init_tracing(cli.verbose);
    output::init_colors();

    let verbose = cli.verbose;
    let result = run(cli).await;

    if let Err(e) = &result {
        if verbose {
            tracing::debug!(error = ?e, "Command failed");
        }
    }

    result
}

async fn run(cli: Cli) -> anyhow::Result<()> {
    let overrides = ConfigOverrides {
        organization: cli.organization.clone(),
        template_repo: cli.template_repo.clone(),
        format: cli.format.map(OutputFormat::from),
    };
    let config = Config::load_with_overrides(cli.config.as_deref(), overrides)?;

    tracing::debug!(
        organization = ?config.github.organization,
        template_repo = ?config.github.template_repo,
        format = %config.output.format,
        "Configuration loaded"
    );

    let command = match cli.command {
        Some(Commands::Version) => {
            println!("gls {}", env!("CARGO_PKG_VERSION"));
            return Ok(());
        }
        Some(Commands::Config) => {
            let secrets = Secrets::load()?;
            let credentials = secrets.credentials(cli.token, cli.username, cli.password);
            print_config(&config, credentials.map(|c| c.describe()));
            return Ok(());
        }
        None => {
            println!("gls - sync GitHub labels and milestones from a template repository");
            println!();
            println!("Use --help for usage information");
            return Ok(());
        }
        Some(command) => command,
    };

    let credentials = Secrets::load()?.credentials(cli.token, cli.username, cli.password);
    let ctx = Context {
        client: GitHubClient::connect(credentials, &config.github).await?,
        format: config.output.format,
    };

    match command {
        Commands::Repositories(args) => args.execute(&ctx).await,
        Commands::Labels(args) => args.execute(&ctx).await,
        Commands::Milestones(args) => args.execute(&ctx).await,
        Commands::Version | Commands::Config => Ok(()),
    }
}

fn print_config(config: &Config, credentials: Option<String>) {
    println!("gls Configuration");
    println!("=================");
    println!();
    println!("GitHub Settings:");
    println!(
        "  organization: {}",
        config
            .github
            .organization
            .as_deref()
            .unwrap_or("(authenticated user)")
    );
    println!(
        "  template_repo: {}",
        config.github.template_repo.as_deref().unwrap_or("(not set)")
    );
    println!(
        "  credentials: {}",
        credentials.as_deref().unwrap_or("(none)")
    );
    println!();
    println!("Output Settings:");
    println!("  format: {}", config.output.format);
    println!();
    for (label, path) in [
        ("Config file", Config::default_config_path()),
        ("Secrets file", Secrets::default_secrets_path()),
    ] {
        if let Some(path) = path {
            println!("{}: {}", label, path.display());
            if path.exists() {
                println!("  (exists)");
            } else {
                println!("  (not found - using defaults)");
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_is_well_formed() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_global_flags_after_subcommand() {
        let cli = Cli::try_parse_from([
            "gls", "ms", "sync", "v1.0", "-o", "acme", "-t", "template", "-f", "json",
        ])
        .unwrap();

        assert_eq!(cli.organization.as_deref(), Some("acme"));
        assert_eq!(cli.template_repo.as_deref(), Some("template"));
        assert!(matches!(cli.format, Some(FormatArg::Json)));
        assert!(matches!(cli.command, Some(Commands::Milestones(_))));
    }

    #[test]
    fn test_repositories_aliases() {
        for alias in ["repositories", "repos", "repo", "rp"] {
            let cli = Cli::try_parse_from(["gls", alias, "ls"]).unwrap();
            assert!(matches!(cli.command, Some(Commands::Repositories(_))));
        }
    }
}
