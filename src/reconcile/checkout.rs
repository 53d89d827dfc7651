//! Checkout/heal pass: every active workspace ends up checked out on its
//! configured branch, or the pass fails.

use log::info;

use super::heal::{self, HealOutcome};
use super::{remove, Reconciler};
use crate::config::WorkspaceEntry;
use crate::error::Result;

/// How an active workspace was brought up to date.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CheckoutOutcome {
    /// Added as a new submodule (possibly after removing a broken one).
    FreshCheckout,
    /// Existing checkout kept and brought onto its branch.
    Healed,
}

/// Paths handled by the checkout pass, grouped by outcome.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CheckoutSummary {
    pub checked_out: Vec<String>,
    pub healed: Vec<String>,
}

/// Adds the submodule, checks out its branch and pulls. Every step is
/// fatal for this workspace.
pub fn fresh_checkout(ctx: &Reconciler<'_>, entry: &WorkspaceEntry) -> Result<()> {
    let git = ctx.git();
    let dir = entry.local_path(ctx.root());

    info!("{}: checking out {} ({})", entry.path, entry.url, entry.branch);
    git.submodule_add(&entry.url, &entry.path, &entry.branch, ctx.root())
        .map_err(|e| e.in_workspace(&entry.path, "submodule add"))?;
    git.checkout_branch(&entry.branch, &dir)
        .map_err(|e| e.in_workspace(&entry.path, "checkout"))?;
    git.pull_origin_branch(&entry.branch, &dir)
        .map_err(|e| e.in_workspace(&entry.path, "pull"))?;
    Ok(())
}

/// Heals an existing workspace or replaces it with a fresh checkout.
pub fn checkout_or_heal(ctx: &Reconciler<'_>, entry: &WorkspaceEntry) -> Result<CheckoutOutcome> {
    let dir = entry.local_path(ctx.root());

    if dir.exists() {
        let outcome = heal::heal(ctx.git(), entry, &dir)
            .and_then(|outcome| outcome.into_result(entry))
            .map_err(|e| e.in_workspace(&entry.path, "heal"))?;

        if outcome == HealOutcome::Healed {
            return Ok(CheckoutOutcome::Healed);
        }
        info!("{}: directory is not a usable checkout, replacing it", entry.path);
        remove::remove_workspace(ctx, entry)?;
    }

    fresh_checkout(ctx, entry)?;
    Ok(CheckoutOutcome::FreshCheckout)
}

/// Runs [`checkout_or_heal`] over the active workspaces, stopping at the
/// first failing batch.
pub fn execute(ctx: &Reconciler<'_>, active: &[&WorkspaceEntry]) -> Result<CheckoutSummary> {
    let outcomes = ctx
        .batcher()
        .run_fail_fast(active, |entry| checkout_or_heal(ctx, entry))?;

    let mut summary = CheckoutSummary::default();
    for (entry, outcome) in active.iter().zip(outcomes) {
        match outcome {
            CheckoutOutcome::FreshCheckout => summary.checked_out.push(entry.path.clone()),
            CheckoutOutcome::Healed => summary.healed.push(entry.path.clone()),
        }
    }
    Ok(summary)
}
