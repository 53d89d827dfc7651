//! # Error Suggestions
//!
//! Errors shown to the user should say what went wrong and how to fix it.
//! The helpers here build `anyhow::Error`s carrying `hint:` lines, and
//! [`explain`] attaches the right hints to an engine [`Error`].
//!
//! ```rust,ignore
//! // Instead of:
//! anyhow::bail!("Configuration file not found: {}", path.display());
//!
//! // Use:
//! return Err(suggestions::config_not_found(path));
//! ```

use std::path::Path;

use crate::error::Error;

/// The configuration file does not exist.
pub fn config_not_found(path: &Path) -> anyhow::Error {
    anyhow::anyhow!(
        "Configuration file not found: {path}\n\n\
         hint: Run 'workspace-sync add <repo>' to create it with a first workspace\n\
         hint: Use -c/--config to specify a different path\n\
         hint: Set the WORKSPACE_SYNC_CONFIG environment variable",
        path = path.display()
    )
}

/// The workspace root is missing or not a directory.
pub fn invalid_workspace_root(path: &Path, reason: &str) -> anyhow::Error {
    anyhow::anyhow!(
        "Invalid workspace root {path}: {reason}\n\n\
         hint: Use -w/--workspace-root to point at the superproject checkout\n\
         hint: Set the WORKSPACE_SYNC_ROOT environment variable",
        path = path.display()
    )
}

/// `go` is needed for `go.work` but is not installed.
pub fn go_unavailable() -> anyhow::Error {
    anyhow::anyhow!(
        "The 'go' tool is required to update go.work but was not found\n\n\
         hint: Install Go from https://go.dev/dl/ and make sure it is on PATH\n\
         hint: Or clear 'goWorkspace' on the entries that do not need go.work"
    )
}

/// A workspace is on the wrong branch with local work in it.
pub fn uncommitted_changes(path: &str, current: &str, expected: &str) -> anyhow::Error {
    anyhow::anyhow!(
        "{path} is on branch '{current}' but '{expected}' is configured, and it has \
         uncommitted changes\n\n\
         hint: Commit or stash the changes in {path}, then run sync again\n\
         hint: Or run 'workspace-sync save' to keep '{current}' as the configured branch"
    )
}

/// One or more paths given on the command line are not configured.
pub fn unknown_workspaces(unknown: &[String], known: &[&str]) -> anyhow::Error {
    let did_you_mean: String = unknown
        .iter()
        .filter_map(|path| {
            find_similar(path, known).map(|s| format!("\nhint: Did you mean '{s}'?"))
        })
        .collect();

    anyhow::anyhow!(
        "Unknown workspace path(s): {paths}{did_you_mean}\n\n\
         hint: Run 'workspace-sync status' to list configured workspaces",
        paths = unknown.join(", ")
    )
}

/// Adds hints to an engine error where there is something the user can do.
pub fn explain(error: Error) -> anyhow::Error {
    match root_cause(&error) {
        Error::UncommittedChanges {
            path,
            current,
            expected,
        } => {
            let hinted = uncommitted_changes(path, current, expected);
            match error.phase() {
                Some(phase) => hinted.context(format!("Sync failed while {phase}")),
                None => hinted,
            }
        }
        Error::ToolUnavailable { tool, .. } if tool == "go" => go_unavailable(),
        Error::InvalidWorkspaceRoot { path, message } => {
            invalid_workspace_root(Path::new(path), message)
        }
        _ => error.into(),
    }
}

fn root_cause(error: &Error) -> &Error {
    match error {
        Error::Workspace { source, .. } | Error::Phase { source, .. } => root_cause(source),
        other => other,
    }
}

/// Closest candidate within an edit distance of 2, if any.
fn find_similar<'a>(input: &str, candidates: &[&'a str]) -> Option<&'a str> {
    candidates
        .iter()
        .map(|&candidate| (candidate, edit_distance(input, candidate)))
        .filter(|&(_, distance)| distance <= 2 && distance < input.len())
        .min_by_key(|&(_, distance)| distance)
        .map(|(candidate, _)| candidate)
}

/// Levenshtein distance, one row at a time.
fn edit_distance(a: &str, b: &str) -> usize {
    let b_chars: Vec<char> = b.chars().collect();
    let mut previous: Vec<usize> = (0..=b_chars.len()).collect();

    for (i, a_char) in a.chars().enumerate() {
        let mut current = vec![i + 1; b_chars.len() + 1];
        for (j, b_char) in b_chars.iter().enumerate() {
            let substitution = previous[j] + usize::from(a_char != *b_char);
            current[j + 1] = substitution
                .min(previous[j + 1] + 1)
                .min(current[j] + 1);
        }
        previous = current;
    }

    previous[b_chars.len()]
}
