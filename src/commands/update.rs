//! # Update Command Implementation
//!
//! Pulls the latest changes into every active workspace that is already
//! checked out. Local modifications are stashed around the pull and popped
//! afterwards. Workspaces that are not checked out are skipped; `sync`
//! takes care of those.

use anyhow::Result;
use clap::Args;

use workspace_sync::output::emoji;
use workspace_sync::reconcile::{update, Reconciler};
use workspace_sync::repository::{DefaultGitOperations, DefaultModuleWorkspaceOperations};
use workspace_sync::suggestions;

use super::Context;

/// Pull the latest changes into every checked-out workspace
#[derive(Args, Debug)]
pub struct UpdateArgs {}

pub fn execute(_args: UpdateArgs, ctx: &Context) -> Result<()> {
    let config = ctx.load_config()?;
    ctx.validate_root()?;

    let git = DefaultGitOperations::new();
    let modules = DefaultModuleWorkspaceOperations;
    let reconciler = Reconciler::new(&ctx.workspace_root, &git, &modules, ctx.concurrency)?;

    let active = config.active();
    println!(
        "{} Updating {} workspace(s)",
        emoji(&ctx.out, "⬇️ ", "[UPDATE]"),
        active.len()
    );
    let report = update::execute(&reconciler, &active).map_err(suggestions::explain)?;

    if !report.stashed.is_empty() {
        println!(
            "   Restored local changes in: {}",
            ctx.out.bold(report.stashed.join(", "))
        );
    }
    if !report.skipped.is_empty() {
        println!(
            "   Skipped (not checked out): {}",
            ctx.out.dim(report.skipped.join(", "))
        );
        println!("   Run `workspace-sync sync` to check them out");
    }
    println!(
        "{} Updated {} workspace(s)",
        emoji(&ctx.out, "✅", "[OK]"),
        report.updated.len()
    );
    Ok(())
}
