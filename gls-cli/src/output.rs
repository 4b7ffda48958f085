//! Plain-text and JSON rendering of command results

use std::io::IsTerminal;

use colored::{ColoredString, Colorize};
use gls_core::OutputFormat;
use gls_github::{
    BulkReport, Label, Milestone, MilestoneState, RepoAction, RepoListing, RepoOutcome,
    Repository, Scope, SyncReport,
};
use serde::Serialize;

/// Turn off colors when stdout is not a terminal
pub fn init_colors() {
    if !std::io::stdout().is_terminal() {
        colored::control::set_override(false);
    }
}

/// Print `value` as JSON, or `plain` otherwise
pub fn emit<T: Serialize>(
    format: OutputFormat,
    value: &T,
    plain: impl FnOnce() -> String,
) -> anyhow::Result<()> {
    match format {
        OutputFormat::Json => println!("{}", serde_json::to_string(value)?),
        OutputFormat::Plain => print!("{}", plain()),
    }
    Ok(())
}

pub fn repositories(repos: &[Repository], scope: &Scope, template: Option<&str>) -> String {
    let mut out = format!(
        "Total {} repositories in {}:\n\n",
        repos.len(),
        highlight_scope(scope)
    );
    for repo in repos {
        out.push_str(&format!(" - {}", repo.name));
        if Some(repo.name.as_str()) == template {
            out.push_str(&format!(" {}", "<== template repository".green()));
        }
        out.push('\n');
    }
    out
}

fn highlight_scope(scope: &Scope) -> String {
    match scope {
        Scope::Organization(login) => format!("organization {}", login.blue()),
        Scope::User(login) => format!("user {}", login.blue()),
    }
}

pub fn labels(repo: &str, labels: &[Label]) -> String {
    let mut out = format!(
        "Total {} label(s) in repository {}:\n\n",
        labels.len(),
        repo.blue()
    );
    for label in labels {
        out.push_str(&format!(" - {}\n", label_name(label)));
    }
    out
}

fn label_name(label: &Label) -> ColoredString {
    match parse_hex_color(&label.color) {
        Some((r, g, b)) => label.name.black().on_truecolor(r, g, b),
        None => label.name.normal(),
    }
}

/// Parse a `rrggbb` color, with or without a leading `#`
pub fn parse_hex_color(color: &str) -> Option<(u8, u8, u8)> {
    let hex = color.trim_start_matches('#');
    if hex.len() != 6 || !hex.is_ascii() {
        return None;
    }
    let channel = |i: usize| u8::from_str_radix(&hex[i..i + 2], 16).ok();
    Some((channel(0)?, channel(2)?, channel(4)?))
}

pub fn milestones(repo: &str, milestones: &[Milestone]) -> String {
    let mut out = format!(
        "Total {} milestone(s) in repository {}:\n\n",
        milestones.len(),
        repo.blue()
    );
    for milestone in milestones {
        out.push_str(&format!(" - {}\n", milestone_line(milestone)));
    }
    out
}

pub fn milestone_line(milestone: &Milestone) -> String {
    let mut parts = vec![format!("#{}", milestone.number.to_string().blue())];

    let title = match milestone.state {
        MilestoneState::Open => milestone.title.black().on_yellow(),
        MilestoneState::Closed => milestone.title.dimmed().strikethrough(),
    };
    parts.push(format!("{}:", title));

    if let Some(description) = milestone.description.as_deref().filter(|d| !d.is_empty()) {
        parts.push(description.to_string());
    }
    if let Some(due_on) = milestone.due_on {
        parts.push(
            format!("(📅 {})", due_on.format("%Y-%m-%d"))
                .magenta()
                .to_string(),
        );
    }

    parts.join(" ")
}

/// One listing per repository, failed repositories included
pub fn listings<T>(
    listings: &[RepoListing<T>],
    render: impl Fn(&str, &[T]) -> String,
) -> String {
    let mut out = String::new();
    for listing in listings {
        match &listing.error {
            Some(error) => out.push_str(&format!(
                "Failed to list repository {}: {}\n",
                listing.repository.blue(),
                error.red()
            )),
            None => out.push_str(&render(&listing.repository, &listing.items)),
        }
        out.push('\n');
    }
    out
}

pub fn sync(sync: &SyncReport) -> String {
    let mut out = format!(
        "Milestone \"{}\" is found in repository \"{}\".\n",
        sync.source.title.blue(),
        sync.repository.blue()
    );
    out.push_str(&format!(
        "Total {} repositories to sync:\n",
        sync.report.outcomes.len()
    ));
    out.push_str(&outcomes(&sync.report));
    out
}

/// Header, per-repository lines and summary of a bulk edit or delete
pub fn bulk(verb: &str, preposition: &str, report: &BulkReport) -> String {
    let mut out = format!(
        "{} milestone \"{}\" {} {} repositories:\n",
        verb,
        report.milestone.blue(),
        preposition,
        report.outcomes.len()
    );
    out.push_str(&outcomes(report));
    out
}

fn outcomes(report: &BulkReport) -> String {
    let mut out = String::new();
    for outcome in &report.outcomes {
        out.push_str(&format!(" - {}: {}\n", outcome.repository.blue(), action(outcome)));
    }
    out.push_str(&summary(report));
    out
}

fn action(outcome: &RepoOutcome) -> ColoredString {
    match outcome.action {
        RepoAction::Created | RepoAction::Updated | RepoAction::Deleted | RepoAction::Skipped => {
            outcome.action.to_string().green()
        }
        RepoAction::Missing => "doesn't exist".yellow(),
        RepoAction::Error => outcome
            .detail
            .as_deref()
            .unwrap_or("unknown error")
            .red(),
    }
}

fn summary(report: &BulkReport) -> String {
    let mut parts = vec![format!("{} succeeded", report.succeeded())];
    for (action, label) in [
        (RepoAction::Skipped, "skipped"),
        (RepoAction::Missing, "missing"),
    ] {
        let count = report.count(action);
        if count > 0 {
            parts.push(format!("{} {}", count, label));
        }
    }
    let failed = report.failed();
    let failed = if failed > 0 {
        format!("{} failed", failed).red().to_string()
    } else {
        "0 failed".to_string()
    };
    parts.push(failed);

    format!("\n{}.\n", parts.join(", "))
}
