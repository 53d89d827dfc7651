//! Removal pass: inactive workspaces that still exist on disk are removed
//! as submodules.

use log::info;

use super::Reconciler;
use crate::config::WorkspaceEntry;
use crate::error::Result;

/// Removes one workspace. Returns `false` when there was nothing to remove.
pub fn remove_workspace(ctx: &Reconciler<'_>, entry: &WorkspaceEntry) -> Result<bool> {
    let dir = entry.local_path(ctx.root());
    if !dir.exists() {
        return Ok(false);
    }

    info!("{}: removing", entry.path);
    ctx.git()
        .submodule_remove(&entry.path, ctx.root())
        .map_err(|e| e.in_workspace(&entry.path, "submodule remove"))?;
    Ok(true)
}

/// Removes every inactive workspace present on disk, batch by batch,
/// stopping at the first failing batch. Returns the removed paths.
pub fn execute(ctx: &Reconciler<'_>, inactive: &[&WorkspaceEntry]) -> Result<Vec<String>> {
    let removed = ctx
        .batcher()
        .run_fail_fast(inactive, |entry| remove_workspace(ctx, entry))?;

    Ok(inactive
        .iter()
        .zip(removed)
        .filter(|(_, was_removed)| *was_removed)
        .map(|(entry, _)| entry.path.clone())
        .collect())
}
