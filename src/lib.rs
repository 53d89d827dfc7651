//! # Workspace Sync Library
//!
//! This library reconciles a declarative list of source-repository
//! "workspaces", each a git submodule pinned to a branch, against what is
//! actually checked out under a workspace root. It backs the
//! `workspace-sync` command-line tool but the engine is usable on its own:
//! every interaction with `git` and `go` goes through a trait, so callers
//! can substitute their own backing stores.
//!
//! ## Quick Example
//!
//! ```
//! use workspace_sync::config;
//!
//! let config = config::parse(r#"
//! workspaces:
//!   - url: https://github.com/org/api.git
//!     path: services/api
//!     branch: main
//!     goWorkspace: true
//!   - url: https://github.com/org/legacy.git
//!     path: services/legacy
//!     active: false
//! "#).unwrap();
//!
//! let (active, inactive) = config.partition();
//! assert_eq!(active.len(), 1);
//! assert_eq!(inactive[0].branch, "main");
//! ```
//!
//! ## Core Concepts
//!
//! - **Configuration (`config`)**: the desired state, loaded from
//!   `workspaces.yaml` and written back atomically.
//! - **Adapters (`git`, `go_work`, `repository`)**: thin wrappers around the
//!   `git` and `go work` commands, exposed through the `GitOperations` and
//!   `ModuleWorkspaceOperations` traits.
//! - **Batcher (`batch`)**: runs per-workspace operations in fixed-size
//!   parallel batches, fail-fast or collect-all.
//! - **Reconciliation (`reconcile`)**: the sync orchestrator, the heal
//!   decision for existing directories, and the update and status passes.
//!
//! ## Execution Flow
//!
//! A sync validates the workspace root, removes inactive workspaces, heals
//! or freshly checks out active ones, and finally brings `go.work` in line.
//! The first failing workspace stops the pass it belongs to; nothing that
//! already completed is rolled back.

pub mod batch;
pub mod config;
pub mod defaults;
pub mod error;
pub mod git;
pub mod go_work;
pub mod lock;
pub mod output;
pub mod prompt;
pub mod reconcile;
pub mod repository;
pub mod suggestions;

#[cfg(test)]
mod testing;
