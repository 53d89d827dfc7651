//! # Sync Command Implementation
//!
//! Brings the workspace root in line with the configuration: inactive
//! workspaces are removed, active ones are healed in place or checked out
//! fresh, and `go.work` membership is updated. A workspace on the wrong
//! branch with uncommitted changes stops the run; it is never touched.

use anyhow::Result;
use clap::Args;

use workspace_sync::output::emoji;
use workspace_sync::reconcile::orchestrator::{execute_sync, SyncReport};
use workspace_sync::reconcile::Reconciler;
use workspace_sync::repository::{DefaultGitOperations, DefaultModuleWorkspaceOperations};
use workspace_sync::suggestions;

use super::Context;

/// Reconcile the workspace root with the configuration
#[derive(Args, Debug)]
pub struct SyncArgs {}

pub fn execute(_args: SyncArgs, ctx: &Context) -> Result<()> {
    let config = ctx.load_config()?;
    ctx.validate_root()?;

    let git = DefaultGitOperations::new();
    let modules = DefaultModuleWorkspaceOperations;
    let reconciler = Reconciler::new(&ctx.workspace_root, &git, &modules, ctx.concurrency)?;

    println!(
        "{} Syncing {} workspace(s) in {}",
        emoji(&ctx.out, "🔄", "[SYNC]"),
        config.workspaces.len(),
        ctx.workspace_root.display()
    );
    let report = execute_sync(&reconciler, &config).map_err(suggestions::explain)?;
    print_report(ctx, &report);
    Ok(())
}

fn print_report(ctx: &Context, report: &SyncReport) {
    let out = &ctx.out;
    let sections = [
        ("Removed", &report.removed),
        ("Checked out", &report.checked_out),
        ("Healed", &report.healed),
        ("Dropped from go.work", &report.modules_dropped),
        ("Using in go.work", &report.modules_used),
    ];
    for (title, paths) in sections {
        if !paths.is_empty() {
            println!("   {}: {}", title, out.bold(paths.join(", ")));
        }
    }
    println!("{} Sync complete", emoji(out, "✅", "[OK]"));
}
