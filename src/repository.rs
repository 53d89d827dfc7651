//! # Backing-Store Operations
//!
//! The reconciliation engine never shells out directly. It programs against
//! two traits:
//!
//! - **`GitOperations`**: everything the engine asks of git, from probing a
//!   directory to adding and removing submodules.
//! - **`ModuleWorkspaceOperations`**: membership of the `go.work` file.
//!
//! `DefaultGitOperations` and `DefaultModuleWorkspaceOperations` wrap the
//! real `git` and `go` binaries (see [`crate::git`] and [`crate::go_work`]).
//! Tests substitute recording fakes to drive the engine through every
//! branch of its decision logic without touching a real repository.
//!
//! Both traits require `Send + Sync` because the batcher calls them from
//! several worker threads at once.

use std::path::Path;
use std::time::Duration;

use crate::defaults::DEFAULT_LOCK_TIMEOUT;
use crate::error::Result;
use crate::lock::PathLocks;

/// Git operations the engine depends on.
pub trait GitOperations: Send + Sync {
    /// Whether `path` is the top level of a git work tree.
    fn is_repository(&self, path: &Path) -> bool;

    fn current_branch(&self, path: &Path) -> Result<String>;

    /// Whether the work tree has no staged, unstaged or untracked changes.
    fn is_clean(&self, path: &Path) -> Result<bool>;

    /// `(modified, untracked)` file counts.
    fn change_counts(&self, path: &Path) -> Result<(usize, usize)>;

    fn fetch(&self, path: &Path) -> Result<()>;

    fn checkout_branch(&self, branch: &str, path: &Path) -> Result<()>;

    fn pull_origin_branch(&self, branch: &str, path: &Path) -> Result<()>;

    /// Stashes local changes, returning whether a stash entry was created.
    fn stash(&self, path: &Path, message: &str) -> Result<bool>;

    fn stash_pop(&self, path: &Path) -> Result<()>;

    /// Adds `url` as a submodule at `path` (relative to `root`).
    fn submodule_add(&self, url: &str, path: &str, branch: &str, root: &Path) -> Result<()>;

    /// Deinits and removes the submodule at `path`, including its metadata
    /// under the superproject's git directory.
    fn submodule_remove(&self, path: &str, root: &Path) -> Result<()>;
}

/// Operations on the `go.work` module-workspace file.
pub trait ModuleWorkspaceOperations: Send + Sync {
    fn is_available(&self) -> bool;

    /// Creates the module-workspace file. Already existing is success.
    fn init(&self, root: &Path) -> Result<()>;

    /// Registers all `paths` in one call.
    fn use_paths(&self, paths: &[String], root: &Path) -> Result<()>;

    /// Unregisters a single path.
    fn remove(&self, path: &str, root: &Path) -> Result<()>;
}

/// The default implementation of `GitOperations`, backed by the system
/// `git` command.
///
/// Submodule add and remove rewrite the superproject's index and
/// `.gitmodules`, so they are serialized on the superproject root even when
/// the batcher runs several workspaces at once.
#[derive(Debug, Clone)]
pub struct DefaultGitOperations {
    locks: PathLocks,
}

impl DefaultGitOperations {
    pub fn new() -> Self {
        Self::with_lock_timeout(DEFAULT_LOCK_TIMEOUT)
    }

    pub fn with_lock_timeout(timeout: Duration) -> Self {
        Self {
            locks: PathLocks::new(timeout),
        }
    }
}

impl Default for DefaultGitOperations {
    fn default() -> Self {
        Self::new()
    }
}

impl GitOperations for DefaultGitOperations {
    fn is_repository(&self, path: &Path) -> bool {
        crate::git::is_repository(path)
    }

    fn current_branch(&self, path: &Path) -> Result<String> {
        crate::git::current_branch(path)
    }

    fn is_clean(&self, path: &Path) -> Result<bool> {
        crate::git::is_clean(path)
    }

    fn change_counts(&self, path: &Path) -> Result<(usize, usize)> {
        crate::git::change_counts(path)
    }

    fn fetch(&self, path: &Path) -> Result<()> {
        crate::git::fetch(path)
    }

    fn checkout_branch(&self, branch: &str, path: &Path) -> Result<()> {
        crate::git::checkout_branch(branch, path)
    }

    fn pull_origin_branch(&self, branch: &str, path: &Path) -> Result<()> {
        crate::git::pull_origin_branch(branch, path)
    }

    fn stash(&self, path: &Path, message: &str) -> Result<bool> {
        crate::git::stash(path, message)
    }

    fn stash_pop(&self, path: &Path) -> Result<()> {
        crate::git::stash_pop(path)
    }

    fn submodule_add(&self, url: &str, path: &str, branch: &str, root: &Path) -> Result<()> {
        let _guard = self.locks.acquire(root)?;
        crate::git::submodule_add(url, path, branch, root)
    }

    fn submodule_remove(&self, path: &str, root: &Path) -> Result<()> {
        let _guard = self.locks.acquire(root)?;
        crate::git::submodule_remove(path, root)
    }
}

/// The default implementation of `ModuleWorkspaceOperations`, backed by
/// `go work`.
#[derive(Debug, Clone, Copy, Default)]
pub struct DefaultModuleWorkspaceOperations;

impl ModuleWorkspaceOperations for DefaultModuleWorkspaceOperations {
    fn is_available(&self) -> bool {
        crate::go_work::is_available()
    }

    fn init(&self, root: &Path) -> Result<()> {
        crate::go_work::init(root)
    }

    fn use_paths(&self, paths: &[String], root: &Path) -> Result<()> {
        crate::go_work::use_paths(paths, root)
    }

    fn remove(&self, path: &str, root: &Path) -> Result<()> {
        crate::go_work::remove(path, root)
    }
}
