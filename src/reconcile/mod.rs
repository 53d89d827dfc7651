//! The reconciliation engine.
//!
//! ## Overview
//!
//! A `sync` brings the workspace root in line with the configuration in
//! four steps:
//! 1. Removal - inactive workspaces present on disk are removed
//!    ([`remove`]).
//! 2. Checkout/heal - active workspaces are healed in place when possible,
//!    otherwise freshly checked out ([`checkout`], [`heal`]).
//! 3. Module workspace - `go.work` membership is updated
//!    ([`module_workspace`]).
//! 4. Report - a [`orchestrator::SyncReport`] summarizes what changed.
//!
//! [`update`] and [`status`] reuse the same building blocks for pulling
//! existing checkouts and for read-only reporting.
//!
//! Steps 1 and 2 run through the fail-fast [`Batcher`]; status uses the
//! collect-all mode so one broken workspace never hides the others.

use std::path::{Path, PathBuf};

use crate::batch::Batcher;
use crate::error::{Error, Result};
use crate::repository::{GitOperations, ModuleWorkspaceOperations};

pub mod checkout;
pub mod heal;
pub mod module_workspace;
pub mod orchestrator;
pub mod remove;
pub mod status;
pub mod update;

/// Everything a reconciliation pass needs: where the workspaces live, the
/// backing stores, and the batcher bounding concurrency.
pub struct Reconciler<'a> {
    root: PathBuf,
    git: &'a dyn GitOperations,
    modules: &'a dyn ModuleWorkspaceOperations,
    batcher: Batcher,
}

impl<'a> Reconciler<'a> {
    pub fn new(
        root: impl Into<PathBuf>,
        git: &'a dyn GitOperations,
        modules: &'a dyn ModuleWorkspaceOperations,
        concurrency: usize,
    ) -> Result<Self> {
        Ok(Self {
            root: root.into(),
            git,
            modules,
            batcher: Batcher::new(concurrency)?,
        })
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn git(&self) -> &dyn GitOperations {
        self.git
    }

    pub fn modules(&self) -> &dyn ModuleWorkspaceOperations {
        self.modules
    }

    pub fn batcher(&self) -> &Batcher {
        &self.batcher
    }
}

/// Checks that the workspace root exists and is a directory.
pub fn validate_workspace_root(root: &Path) -> Result<()> {
    let invalid = |message: &str| Error::InvalidWorkspaceRoot {
        path: root.display().to_string(),
        message: message.to_string(),
    };
    match std::fs::metadata(root) {
        Ok(metadata) if metadata.is_dir() => Ok(()),
        Ok(_) => Err(invalid("not a directory")),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => Err(invalid("does not exist")),
        Err(e) => Err(invalid(&e.to_string())),
    }
}
