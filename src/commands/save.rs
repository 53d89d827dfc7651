//! # Save Command Implementation
//!
//! Snapshots the branches currently checked out into the configuration.
//! Every active workspace whose checkout sits on a different branch than
//! the configured one is listed; after confirmation (or with `--yes`) the
//! configured branches are rewritten.

use std::path::Path;

use anyhow::Result;
use clap::Args;
use log::warn;

use workspace_sync::batch::Batcher;
use workspace_sync::config::WorkspaceConfig;
use workspace_sync::output::emoji;
use workspace_sync::prompt::Prompter;
use workspace_sync::repository::{DefaultGitOperations, GitOperations};

use super::Context;

/// Write the branches currently checked out back into the configuration
#[derive(Args, Debug)]
pub struct SaveArgs {
    /// Write the changes without asking for confirmation.
    #[arg(short, long)]
    pub yes: bool,
}

/// A configured branch that differs from the checkout on disk.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BranchChange {
    pub path: String,
    pub configured: String,
    pub current: String,
}

/// Compares each active, checked-out workspace with its configured branch.
/// Workspaces whose branch cannot be read are skipped with a warning.
pub fn collect_branch_changes(
    config: &WorkspaceConfig,
    root: &Path,
    git: &dyn GitOperations,
    batcher: &Batcher,
) -> Vec<BranchChange> {
    let active = config.active();
    let probes = batcher.run_collect_all(&active, |entry| {
        let dir = entry.local_path(root);
        if !dir.is_dir() || !git.is_repository(&dir) {
            return Ok(None);
        }
        git.current_branch(&dir).map(Some)
    });

    active
        .iter()
        .zip(probes)
        .filter_map(|(entry, probe)| match probe {
            Ok(Some(current)) if current != entry.branch => Some(BranchChange {
                path: entry.path.clone(),
                configured: entry.branch.clone(),
                current,
            }),
            Ok(_) => None,
            Err(e) => {
                warn!("{}: could not read current branch: {}", entry.path, e);
                None
            }
        })
        .collect()
}

/// Writes each change's current branch into `config`.
pub fn apply_branch_changes(config: &mut WorkspaceConfig, changes: &[BranchChange]) {
    for change in changes {
        if let Some(entry) = config.find_mut(&change.path) {
            entry.branch = change.current.clone();
        }
    }
}

pub fn execute(args: SaveArgs, ctx: &Context, prompter: &dyn Prompter) -> Result<()> {
    let mut config = ctx.load_config()?;
    ctx.validate_root()?;

    let git = DefaultGitOperations::new();
    let batcher = Batcher::new(ctx.concurrency)?;
    let changes = collect_branch_changes(&config, &ctx.workspace_root, &git, &batcher);

    if changes.is_empty() {
        println!(
            "{} Configuration already matches the checked-out branches",
            emoji(&ctx.out, "✅", "[OK]")
        );
        return Ok(());
    }

    println!("Branch changes:");
    for change in &changes {
        println!(
            "   {}: {} -> {}",
            ctx.out.bold(&change.path),
            ctx.out.dim(&change.configured),
            change.current
        );
    }

    let confirmed = args.yes
        || prompter.confirm(
            &format!("Write {} branch change(s) to the configuration?", changes.len()),
            true,
        )?;
    if !confirmed {
        println!("Aborted, configuration unchanged");
        return Ok(());
    }

    apply_branch_changes(&mut config, &changes);
    ctx.save_config(&config)?;
    println!(
        "{} Saved {} branch change(s) to {}",
        emoji(&ctx.out, "✅", "[OK]"),
        changes.len(),
        ctx.config_path.display()
    );
    Ok(())
}
