//! # Status Command Implementation
//!
//! Read-only report on every active workspace: whether it is checked out,
//! which branch it is on, and how many files are modified or untracked.
//! With `--json` the report is printed as a single JSON document for
//! scripts; otherwise as one line per workspace plus a summary.

use anyhow::Result;
use clap::Args;
use console::Color;

use workspace_sync::output::{emoji, OutputConfig};
use workspace_sync::reconcile::status::{self, RepoState, RepositoryStatus, StatusReport};
use workspace_sync::reconcile::Reconciler;
use workspace_sync::repository::{DefaultGitOperations, DefaultModuleWorkspaceOperations};

use super::Context;

/// Show the state of every active workspace
#[derive(Args, Debug)]
pub struct StatusArgs {
    /// Print the report as JSON.
    #[arg(long)]
    pub json: bool,

    /// Also show remote URLs and file counts.
    #[arg(short, long)]
    pub verbose: bool,
}

pub fn execute(args: StatusArgs, ctx: &Context) -> Result<()> {
    let config = ctx.load_config()?;
    ctx.validate_root()?;

    let git = DefaultGitOperations::new();
    let modules = DefaultModuleWorkspaceOperations;
    let reconciler = Reconciler::new(&ctx.workspace_root, &git, &modules, ctx.concurrency)?;

    let report = status::execute(&reconciler, &config.active());

    if args.json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        print!("{}", render(&report, &ctx.out, args.verbose));
    }
    Ok(())
}

fn state_color(state: RepoState) -> Color {
    match state {
        RepoState::Clean => Color::Green,
        RepoState::Modified | RepoState::WrongBranch => Color::Yellow,
        RepoState::Missing | RepoState::NotARepository | RepoState::Error => Color::Red,
    }
}

fn render_repository(repo: &RepositoryStatus, out: &OutputConfig, verbose: bool) -> String {
    let mut line = format!(
        "  {} {}",
        out.paint(format!("{:<16}", repo.state.label()), state_color(repo.state)),
        out.bold(&repo.path)
    );

    match &repo.current_branch {
        Some(current) if current != &repo.branch => {
            line.push_str(&format!(" [{} != {}]", current, repo.branch));
        }
        Some(current) => line.push_str(&format!(" [{}]", current)),
        None => line.push_str(&out.dim(format!(" [{}]", repo.branch))),
    }
    if repo.go_workspace {
        line.push_str(&out.dim(" (go.work)"));
    }
    line.push('\n');

    if verbose {
        line.push_str(&format!("      {}\n", out.dim(&repo.url)));
        if repo.is_dirty() {
            line.push_str(&format!(
                "      {} modified, {} untracked\n",
                repo.modified_files, repo.untracked_files
            ));
        }
    }
    if let Some(error) = &repo.error {
        line.push_str(&format!("      {}\n", out.paint(error, Color::Red)));
    }
    line
}

/// Renders the human-readable report.
pub fn render(report: &StatusReport, out: &OutputConfig, verbose: bool) -> String {
    let mut text = String::new();
    for repo in &report.repositories {
        text.push_str(&render_repository(repo, out, verbose));
    }

    let summary = &report.summary;
    text.push_str(&format!(
        "\n{} {} workspace(s): {} clean, {} modified, {} missing, {} on wrong branch, {} go module(s)\n",
        emoji(out, "📊", "[INFO]"),
        summary.total,
        summary.clean,
        summary.modified,
        summary.missing,
        summary.on_wrong_branch,
        summary.go_modules
    ));
    text
}
