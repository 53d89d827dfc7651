//! # CLI Command Implementations
//!
//! Each subcommand of `workspace-sync` lives in its own module with:
//! - an `Args` struct derived with `clap` for its command-specific options,
//! - an `execute` function taking the parsed `Args` and the shared
//!   [`Context`] built from the global options.
//!
//! Commands that ask questions also take a `&dyn Prompter`, so they can be
//! driven by scripted answers in tests.

use std::path::{Path, PathBuf};

use anyhow::{Context as _, Result};

use workspace_sync::config::{self, WorkspaceConfig};
use workspace_sync::defaults::resolve_config_path;
use workspace_sync::output::OutputConfig;
use workspace_sync::reconcile::validate_workspace_root;
use workspace_sync::suggestions;

pub mod activation;
pub mod add;
pub mod completions;
pub mod disable;
pub mod enable;
pub mod save;
pub mod status;
pub mod sync;
pub mod update;

/// Settings shared by every command, resolved from the global options.
#[derive(Debug, Clone)]
pub struct Context {
    pub workspace_root: PathBuf,
    pub config_path: PathBuf,
    pub concurrency: usize,
    pub out: OutputConfig,
}

impl Context {
    pub fn new(
        workspace_root: PathBuf,
        config: &Path,
        concurrency: usize,
        out: OutputConfig,
    ) -> Self {
        let config_path = resolve_config_path(&workspace_root, config);
        Self {
            workspace_root,
            config_path,
            concurrency,
            out,
        }
    }

    /// Loads the configuration, which must exist.
    pub fn load_config(&self) -> Result<WorkspaceConfig> {
        if !self.config_path.exists() {
            return Err(suggestions::config_not_found(&self.config_path));
        }
        config::from_file(&self.config_path)
            .with_context(|| format!("Failed to load config from {}", self.config_path.display()))
    }

    /// Loads the configuration, or starts an empty one if the file is
    /// missing.
    pub fn load_config_or_default(&self) -> Result<WorkspaceConfig> {
        if self.config_path.exists() {
            self.load_config()
        } else {
            Ok(WorkspaceConfig::default())
        }
    }

    pub fn save_config(&self, config: &WorkspaceConfig) -> Result<()> {
        config::to_file(config, &self.config_path)
            .with_context(|| format!("Failed to write config to {}", self.config_path.display()))
    }

    pub fn validate_root(&self) -> Result<()> {
        validate_workspace_root(&self.workspace_root).map_err(suggestions::explain)
    }
}

#[cfg(test)]
pub(crate) mod test_support {
    use super::*;
    use workspace_sync::config::WorkspaceEntry;

    /// A context rooted in `root` with colors off.
    pub fn context(root: &Path) -> Context {
        Context::new(
            root.to_path_buf(),
            Path::new(workspace_sync::defaults::DEFAULT_CONFIG_FILENAME),
            2,
            OutputConfig::from_env_and_flag("never"),
        )
    }

    pub fn write_config(ctx: &Context, entries: Vec<WorkspaceEntry>) {
        ctx.save_config(&WorkspaceConfig::new(entries)).unwrap();
    }
}

#[cfg(test)]
mod tests {
    use super::test_support::context;
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_config_path_resolves_against_root() {
        let ctx = context(Path::new("/work"));
        assert_eq!(ctx.config_path, PathBuf::from("/work/workspaces.yaml"));
    }

    #[test]
    fn test_missing_config_has_hint() {
        let temp_dir = TempDir::new().unwrap();
        let ctx = context(temp_dir.path());

        let err = ctx.load_config().unwrap_err();

        assert!(err.to_string().contains("Configuration file not found"));
        assert_eq!(ctx.load_config_or_default().unwrap(), WorkspaceConfig::default());
    }

    #[test]
    fn test_invalid_root_has_hint() {
        let ctx = context(Path::new("/definitely/not/here"));
        let message = ctx.validate_root().unwrap_err().to_string();
        assert!(message.contains("does not exist"));
        assert!(message.contains("--workspace-root"));
    }
}
