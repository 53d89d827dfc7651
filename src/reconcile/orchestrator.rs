//! The `sync` run: removal, checkout/heal, then `go.work`.

use log::{debug, info};

use super::module_workspace::{self, ModulePlan};
use super::{checkout, remove, validate_workspace_root, Reconciler};
use crate::config::WorkspaceConfig;
use crate::error::{Result, SyncPhase};

/// What a successful sync changed.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SyncReport {
    pub removed: Vec<String>,
    pub checked_out: Vec<String>,
    pub healed: Vec<String>,
    pub modules_dropped: Vec<String>,
    pub modules_used: Vec<String>,
}

fn enter(phase: SyncPhase) -> SyncPhase {
    debug!("sync phase: {}", phase);
    phase
}

/// Reconciles the workspace root against `config`.
///
/// Phases run strictly in order and nothing is rolled back: when a phase
/// fails, the returned error carries that phase and earlier phases' effects
/// stay on disk.
pub fn execute_sync(ctx: &Reconciler<'_>, config: &WorkspaceConfig) -> Result<SyncReport> {
    let mut report = SyncReport::default();

    let phase = enter(SyncPhase::ValidatingInputs);
    validate_workspace_root(ctx.root()).map_err(|e| e.in_phase(phase))?;
    config.check().map_err(|e| e.in_phase(phase))?;
    let (active, inactive) = config.partition();
    info!(
        "syncing {} active and {} inactive workspace(s) with concurrency {}",
        active.len(),
        inactive.len(),
        ctx.batcher().concurrency()
    );

    let phase = enter(SyncPhase::RemovingInactive);
    report.removed = remove::execute(ctx, &inactive).map_err(|e| e.in_phase(phase))?;

    let phase = enter(SyncPhase::CheckingOutActive);
    let summary = checkout::execute(ctx, &active).map_err(|e| e.in_phase(phase))?;
    report.checked_out = summary.checked_out;
    report.healed = summary.healed;

    let phase = enter(SyncPhase::ReconcilingModuleWorkspace);
    let plan = ModulePlan::from_config(config);
    module_workspace::execute(ctx, &plan).map_err(|e| e.in_phase(phase))?;
    report.modules_dropped = plan.to_remove;
    report.modules_used = plan.to_use;

    enter(SyncPhase::Done);
    Ok(report)
}
