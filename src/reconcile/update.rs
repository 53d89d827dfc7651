//! Pulling the latest changes into existing checkouts.
//!
//! Local modifications are stashed around the pull and restored afterwards.
//! Only the checkout and the stash itself can fail an update; network and
//! stash-pop problems are logged and the workspace is left as it is.

use log::{info, warn};

use super::Reconciler;
use crate::config::WorkspaceEntry;
use crate::defaults::UPDATE_STASH_MESSAGE;
use crate::error::Result;

/// What happened to one workspace during an update.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UpdateOutcome {
    Updated { stashed: bool },
    SkippedMissing,
    SkippedNotRepository,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UpdateReport {
    pub updated: Vec<String>,
    pub skipped: Vec<String>,
    /// Workspaces whose local changes were stashed and popped again.
    pub stashed: Vec<String>,
}

/// Updates a single workspace in place.
pub fn update_workspace(ctx: &Reconciler<'_>, entry: &WorkspaceEntry) -> Result<UpdateOutcome> {
    let git = ctx.git();
    let dir = entry.local_path(ctx.root());

    if !dir.is_dir() {
        info!("{}: not checked out, run sync first", entry.path);
        return Ok(UpdateOutcome::SkippedMissing);
    }
    if !git.is_repository(&dir) {
        warn!("{}: not a git repository, skipping", entry.path);
        return Ok(UpdateOutcome::SkippedNotRepository);
    }

    info!("{}: updating {}", entry.path, entry.branch);
    git.checkout_branch(&entry.branch, &dir)
        .map_err(|e| e.in_workspace(&entry.path, "checkout"))?;

    let dirty = !git
        .is_clean(&dir)
        .map_err(|e| e.in_workspace(&entry.path, "status"))?;
    let stashed = if dirty {
        git.stash(&dir, UPDATE_STASH_MESSAGE)
            .map_err(|e| e.in_workspace(&entry.path, "stash"))?
    } else {
        false
    };

    if let Err(e) = git.fetch(&dir) {
        warn!("{}: fetch failed: {}", entry.path, e);
    }
    if let Err(e) = git.pull_origin_branch(&entry.branch, &dir) {
        warn!("{}: pull failed: {}", entry.path, e);
    }
    if stashed {
        if let Err(e) = git.stash_pop(&dir) {
            warn!(
                "{}: could not restore stashed changes, they remain in 'git stash list': {}",
                entry.path, e
            );
        }
    }

    Ok(UpdateOutcome::Updated { stashed })
}

/// Updates every active workspace, stopping at the first failing batch.
pub fn execute(ctx: &Reconciler<'_>, active: &[&WorkspaceEntry]) -> Result<UpdateReport> {
    let outcomes = ctx
        .batcher()
        .run_fail_fast(active, |entry| update_workspace(ctx, entry))?;

    let mut report = UpdateReport::default();
    for (entry, outcome) in active.iter().zip(outcomes) {
        match outcome {
            UpdateOutcome::Updated { stashed } => {
                report.updated.push(entry.path.clone());
                if stashed {
                    report.stashed.push(entry.path.clone());
                }
            }
            UpdateOutcome::SkippedMissing | UpdateOutcome::SkippedNotRepository => {
                report.skipped.push(entry.path.clone())
            }
        }
    }
    Ok(report)
}
