//! Default values for workspace-sync configuration.
//!
//! This module provides centralized default values used across commands,
//! ensuring consistency and avoiding duplication.

use std::path::{Path, PathBuf};
use std::time::Duration;

/// Name of the workspace configuration file, relative to the workspace root.
pub const DEFAULT_CONFIG_FILENAME: &str = "workspaces.yaml";

/// Number of workspaces processed concurrently in one batch.
pub const DEFAULT_CONCURRENCY: usize = 4;

/// Branch used when an entry does not name one.
pub const DEFAULT_BRANCH: &str = "main";

/// Upper bound on waiting for the superproject lock around submodule
/// add/remove.
pub const DEFAULT_LOCK_TIMEOUT: Duration = Duration::from_secs(600);

/// Message attached to stashes created by `update`.
pub const UPDATE_STASH_MESSAGE: &str = "workspace-sync: auto-stash before update";

/// Resolves the config file location.
///
/// Absolute paths are used as-is. Relative paths are taken relative to the
/// workspace root, so `--workspace-root` alone is enough to point at another
/// tree.
pub fn resolve_config_path(workspace_root: &Path, config: &Path) -> PathBuf {
    if config.is_absolute() {
        config.to_path_buf()
    } else {
        workspace_root.join(config)
    }
}
