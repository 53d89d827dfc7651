//! `go.work` membership reconciliation.

use log::{debug, info};

use super::Reconciler;
use crate::config::WorkspaceConfig;
use crate::error::{Error, Result};

/// Paths to drop from and register in the module workspace file.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ModulePlan {
    pub to_remove: Vec<String>,
    pub to_use: Vec<String>,
}

impl ModulePlan {
    /// Inactive module-workspace entries are dropped, active ones are used.
    pub fn from_config(config: &WorkspaceConfig) -> Self {
        let mut plan = ModulePlan::default();
        for entry in config.workspaces.iter().filter(|e| e.is_module_workspace) {
            if entry.active {
                plan.to_use.push(entry.path.clone());
            } else {
                plan.to_remove.push(entry.path.clone());
            }
        }
        plan
    }

    pub fn is_empty(&self) -> bool {
        self.to_remove.is_empty() && self.to_use.is_empty()
    }
}

/// Applies `plan` to the module workspace file under the workspace root.
///
/// Does nothing for an empty plan, so roots without Go modules never need
/// the `go` tool installed.
pub fn execute(ctx: &Reconciler<'_>, plan: &ModulePlan) -> Result<()> {
    if plan.is_empty() {
        debug!("no module workspace entries, skipping go.work");
        return Ok(());
    }

    let modules = ctx.modules();
    if !modules.is_available() {
        return Err(Error::ToolUnavailable {
            tool: "go".to_string(),
            message: "needed to update go.work".to_string(),
        });
    }

    modules.init(ctx.root())?;

    for path in &plan.to_remove {
        info!("go.work: dropping {}", path);
        modules.remove(path, ctx.root())?;
    }

    if !plan.to_use.is_empty() {
        info!("go.work: using {} module(s)", plan.to_use.len());
        modules.use_paths(&plan.to_use, ctx.root())?;
    }

    Ok(())
}
