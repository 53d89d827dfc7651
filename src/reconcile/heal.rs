//! Deciding what to do with a workspace directory that already exists.
//!
//! The decision is made in a fixed order, first match wins:
//!
//! 1. Only dot-entries (or nothing) inside: needs a fresh checkout.
//! 2. Not the top of its own git work tree: needs a fresh checkout.
//! 3. On the configured branch: pull, a failed pull is only a warning.
//! 4. On another branch with local changes: fatal conflict.
//! 5. On another branch and clean: fetch (warning), checkout (fatal),
//!    pull (warning).
//!
//! Local work is never discarded. Network steps are best-effort so an
//! offline run leaves a stale but usable checkout instead of failing.

use std::fs;
use std::path::Path;

use log::{debug, info, warn};

use crate::config::WorkspaceEntry;
use crate::error::{Error, Result};
use crate::repository::GitOperations;

/// What is currently on disk at a workspace path.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DirectoryState {
    Missing,
    EmptyDirectory,
    NotAGitRepository,
    WrongBranchDirty { current: String },
    WrongBranchClean { current: String },
    CorrectBranch,
}

/// Result of healing an existing directory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HealOutcome {
    /// The directory is unusable and must be replaced by a fresh checkout.
    NeedsFreshCheckout,
    /// The workspace is on its configured branch.
    Healed,
    /// Healing would lose local work.
    FatalConflict { current: String, reason: String },
}

pub const CONFLICT_REASON: &str = "uncommitted changes, manual intervention required";

/// True if `dir` holds nothing but dot-prefixed entries.
pub fn is_effectively_empty(dir: &Path) -> Result<bool> {
    for entry in fs::read_dir(dir)? {
        let name = entry?.file_name();
        if !name.to_string_lossy().starts_with('.') {
            return Ok(false);
        }
    }
    Ok(true)
}

/// Classifies the directory at `dir` against `entry`'s branch.
pub fn inspect(git: &dyn GitOperations, entry: &WorkspaceEntry, dir: &Path) -> Result<DirectoryState> {
    if !dir.is_dir() {
        return Ok(DirectoryState::Missing);
    }
    if is_effectively_empty(dir)? {
        return Ok(DirectoryState::EmptyDirectory);
    }
    if !git.is_repository(dir) {
        return Ok(DirectoryState::NotAGitRepository);
    }

    let current = git.current_branch(dir)?;
    if current == entry.branch {
        return Ok(DirectoryState::CorrectBranch);
    }

    if git.is_clean(dir)? {
        Ok(DirectoryState::WrongBranchClean { current })
    } else {
        Ok(DirectoryState::WrongBranchDirty { current })
    }
}

/// Brings an existing workspace directory onto its configured branch, or
/// reports why it cannot.
///
/// Errors are adapter failures that make the outcome unknowable (the branch
/// could not be read, the checkout itself failed). A dirty tree on the
/// wrong branch is not an error here but a [`HealOutcome::FatalConflict`];
/// callers decide how to surface it.
pub fn heal(git: &dyn GitOperations, entry: &WorkspaceEntry, dir: &Path) -> Result<HealOutcome> {
    let state = inspect(git, entry, dir)?;
    debug!("{}: {:?}", entry.path, state);

    match state {
        DirectoryState::Missing
        | DirectoryState::EmptyDirectory
        | DirectoryState::NotAGitRepository => Ok(HealOutcome::NeedsFreshCheckout),

        DirectoryState::CorrectBranch => {
            if let Err(e) = git.pull_origin_branch(&entry.branch, dir) {
                warn!("{}: pull failed, keeping local checkout: {}", entry.path, e);
            }
            Ok(HealOutcome::Healed)
        }

        DirectoryState::WrongBranchDirty { current } => Ok(HealOutcome::FatalConflict {
            current,
            reason: CONFLICT_REASON.to_string(),
        }),

        DirectoryState::WrongBranchClean { current } => {
            info!("{}: switching from '{}' to '{}'", entry.path, current, entry.branch);
            if let Err(e) = git.fetch(dir) {
                warn!("{}: fetch failed, trying checkout anyway: {}", entry.path, e);
            }
            git.checkout_branch(&entry.branch, dir)?;
            if let Err(e) = git.pull_origin_branch(&entry.branch, dir) {
                warn!("{}: pull failed after checkout: {}", entry.path, e);
            }
            Ok(HealOutcome::Healed)
        }
    }
}

impl HealOutcome {
    /// Converts a conflict into [`Error::UncommittedChanges`].
    pub fn into_result(self, entry: &WorkspaceEntry) -> Result<HealOutcome> {
        match self {
            HealOutcome::FatalConflict { current, .. } => Err(Error::UncommittedChanges {
                path: entry.path.clone(),
                current,
                expected: entry.branch.clone(),
            }),
            other => Ok(other),
        }
    }
}
