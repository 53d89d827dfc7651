//! Thin wrappers around the system `git` command.
//!
//! Using the system binary means SSH keys, credential helpers and anything
//! else configured in `~/.gitconfig` work exactly as they do for the user.
//! Each function runs one or more git subcommands and maps a non-zero exit
//! into [`Error::GitCommand`] with the captured stderr.

use std::fs;
use std::path::{Path, PathBuf};
use std::process::Command;

use log::{debug, warn};

use crate::error::{Error, Result};

/// Captured output of a successful git invocation.
#[derive(Debug, Clone)]
pub struct GitOutput {
    pub stdout: String,
    pub stderr: String,
}

/// Runs `git <args>` in `dir`.
pub fn run_git(dir: &Path, args: &[&str]) -> Result<GitOutput> {
    let command = args.join(" ");
    debug!("git {} (in {})", command, dir.display());

    let output = Command::new("git")
        .args(args)
        .current_dir(dir)
        // Never block a worker on an interactive credential prompt.
        .env("GIT_TERMINAL_PROMPT", "0")
        .output()
        .map_err(|e| Error::GitCommand {
            command: command.clone(),
            dir: dir.display().to_string(),
            stderr: e.to_string(),
        })?;

    let stdout = String::from_utf8_lossy(&output.stdout).trim().to_string();
    let stderr = String::from_utf8_lossy(&output.stderr).trim().to_string();

    if !output.status.success() {
        let detail = if !stderr.is_empty() {
            stderr
        } else if !stdout.is_empty() {
            stdout
        } else {
            format!("exited with {}", output.status)
        };
        return Err(Error::GitCommand {
            command,
            dir: dir.display().to_string(),
            stderr: detail,
        });
    }

    Ok(GitOutput { stdout, stderr })
}

fn same_location(a: &Path, b: &Path) -> bool {
    match (fs::canonicalize(a), fs::canonicalize(b)) {
        (Ok(a), Ok(b)) => a == b,
        _ => false,
    }
}

/// Returns true if `path` is the top level of a git work tree.
///
/// A directory nested inside some other repository (such as an
/// uninitialized submodule directory inside the superproject) is not a
/// repository in its own right, so the probe compares the reported top
/// level against `path` itself.
pub fn is_repository(path: &Path) -> bool {
    if !path.is_dir() {
        return false;
    }
    match run_git(path, &["rev-parse", "--show-toplevel"]) {
        Ok(output) => same_location(Path::new(&output.stdout), path),
        Err(_) => false,
    }
}

/// Absolute path of the repository's git directory (`.git`, or wherever a
/// gitfile points).
pub fn git_dir(repo: &Path) -> Result<PathBuf> {
    let output = run_git(repo, &["rev-parse", "--absolute-git-dir"])?;
    Ok(PathBuf::from(output.stdout))
}

/// Name of the checked-out branch, or `HEAD` when detached.
pub fn current_branch(path: &Path) -> Result<String> {
    let output = run_git(path, &["rev-parse", "--abbrev-ref", "HEAD"])?;
    Ok(output.stdout)
}

/// Counts `(modified, untracked)` entries in `git status --porcelain`
/// output.
pub fn parse_porcelain(status: &str) -> (usize, usize) {
    status
        .lines()
        .filter(|line| !line.trim().is_empty())
        .fold((0, 0), |(modified, untracked), line| {
            if line.starts_with("??") {
                (modified, untracked + 1)
            } else {
                (modified + 1, untracked)
            }
        })
}

/// Returns `(modified, untracked)` file counts for the work tree.
pub fn change_counts(path: &Path) -> Result<(usize, usize)> {
    let output = run_git(path, &["status", "--porcelain"])?;
    Ok(parse_porcelain(&output.stdout))
}

/// Returns true if there are no staged, unstaged or untracked changes.
pub fn is_clean(path: &Path) -> Result<bool> {
    let output = run_git(path, &["status", "--porcelain"])?;
    Ok(output.stdout.is_empty())
}

pub fn fetch(path: &Path) -> Result<()> {
    run_git(path, &["fetch", "origin"]).map(|_| ())
}

pub fn checkout_branch(branch: &str, path: &Path) -> Result<()> {
    run_git(path, &["checkout", branch]).map(|_| ())
}

pub fn pull_origin_branch(branch: &str, path: &Path) -> Result<()> {
    run_git(path, &["pull", "origin", branch]).map(|_| ())
}

/// Stashes local changes. Returns whether a stash entry was created.
pub fn stash(path: &Path, message: &str) -> Result<bool> {
    let output = run_git(path, &["stash", "push", "--include-untracked", "-m", message])?;
    Ok(!output.stdout.contains("No local changes to save"))
}

pub fn stash_pop(path: &Path) -> Result<()> {
    run_git(path, &["stash", "pop"]).map(|_| ())
}

/// Adds `url` as a submodule at `path` (relative to `root`) tracking
/// `branch`.
pub fn submodule_add(url: &str, path: &str, branch: &str, root: &Path) -> Result<()> {
    run_git(
        root,
        &["submodule", "add", "--force", "-b", branch, "--", url, path],
    )
    .map(|_| ())
}

/// Removes the submodule at `path` (relative to `root`): deinit, remove it
/// from the index and work tree, then drop its `modules/<path>` metadata.
///
/// A directory that was never registered as a submodule (a half-finished
/// clone, a stray empty folder) is deleted directly.
pub fn submodule_remove(path: &str, root: &Path) -> Result<()> {
    let target = root.join(path);

    if let Err(e) = run_git(root, &["submodule", "deinit", "-f", "--", path]) {
        debug!("submodule deinit {} skipped: {}", path, e);
    }

    if let Err(e) = run_git(root, &["rm", "-f", "-r", "--", path]) {
        if target.exists() {
            warn!(
                "{} is not tracked by the superproject ({}), deleting the directory",
                path, e
            );
            fs::remove_dir_all(&target)?;
        }
    }

    let modules = git_dir(root)?.join("modules").join(path);
    if modules.exists() {
        debug!("removing submodule metadata {}", modules.display());
        fs::remove_dir_all(&modules)?;
    }

    Ok(())
}
