//! Shared test utilities for the CLI end-to-end tests.
//!
//! ```rust,ignore
//! mod common;
//! use common::prelude::*;
//!
//! let fixture = TestFixture::new().with_config(configs::TWO_MISSING);
//! fixture.command().args(["status", "--json"]).assert().success();
//! ```

use assert_fs::prelude::*;
use std::path::{Path, PathBuf};
use std::process::Command;

/// Re-export commonly used test dependencies for convenience.
pub mod prelude {
    pub use assert_cmd::cargo::cargo_bin_cmd;
    pub use assert_fs::prelude::*;
    pub use predicates::prelude::*;

    #[allow(unused_imports)]
    pub use super::configs;
    #[allow(unused_imports)]
    pub use super::GitFixture;
    pub use super::TestFixture;
}

/// Configuration snippets used across tests.
#[allow(dead_code)]
pub mod configs {
    /// Two active workspaces, neither checked out.
    pub const TWO_MISSING: &str = r#"
workspaces:
  - url: https://example.com/org/api.git
    path: services/api
    branch: main
    goWorkspace: true
  - url: https://example.com/org/docs.git
    path: docs
    branch: main
  - url: https://example.com/org/legacy.git
    path: legacy
    branch: main
    active: false
"#;

    /// Invalid YAML for error testing.
    pub const INVALID_YAML: &str = "workspaces: [unclosed";

    /// The same path declared twice.
    pub const DUPLICATE_PATHS: &str = r#"
workspaces:
  - url: https://example.com/a.git
    path: svc
  - url: https://example.com/b.git
    path: ./svc/
"#;
}

/// A temporary workspace root with an optional `workspaces.yaml`.
pub struct TestFixture {
    temp_dir: assert_fs::TempDir,
}

#[allow(dead_code)]
impl TestFixture {
    pub fn new() -> Self {
        Self {
            temp_dir: assert_fs::TempDir::new().expect("Failed to create temp directory"),
        }
    }

    /// Writes `workspaces.yaml` with the given content.
    pub fn with_config(self, content: &str) -> Self {
        self.temp_dir
            .child("workspaces.yaml")
            .write_str(content)
            .expect("Failed to write config file");
        self
    }

    pub fn with_file(self, path: &str, content: &str) -> Self {
        self.temp_dir
            .child(path)
            .write_str(content)
            .expect("Failed to write file");
        self
    }

    pub fn path(&self) -> &Path {
        self.temp_dir.path()
    }

    pub fn config_path(&self) -> PathBuf {
        self.temp_dir.path().join("workspaces.yaml")
    }

    pub fn config(&self) -> String {
        std::fs::read_to_string(self.config_path()).expect("Failed to read config file")
    }

    pub fn child(&self, path: &str) -> assert_fs::fixture::ChildPath {
        self.temp_dir.child(path)
    }

    /// A command rooted at this fixture with colors and ambient
    /// configuration switched off.
    pub fn command(&self) -> assert_cmd::Command {
        let mut cmd = assert_cmd::cargo::cargo_bin_cmd!("workspace-sync");
        cmd.current_dir(self.path())
            .env_remove("WORKSPACE_SYNC_CONFIG")
            .env_remove("WORKSPACE_SYNC_ROOT")
            .env("NO_COLOR", "1");
        cmd
    }
}

impl Default for TestFixture {
    fn default() -> Self {
        Self::new()
    }
}

/// Real git repositories for sync tests: upstream repositories to clone
/// from and a superproject to sync into.
#[allow(dead_code)]
pub struct GitFixture {
    temp_dir: assert_fs::TempDir,
}

#[allow(dead_code)]
impl GitFixture {
    /// Environment every git invocation needs in tests: a fixed identity,
    /// no user or system config, and `file://` submodules allowed.
    pub const GIT_ENV: [(&'static str, &'static str); 8] = [
        ("GIT_AUTHOR_NAME", "Test"),
        ("GIT_AUTHOR_EMAIL", "test@example.com"),
        ("GIT_COMMITTER_NAME", "Test"),
        ("GIT_COMMITTER_EMAIL", "test@example.com"),
        ("GIT_CONFIG_NOSYSTEM", "1"),
        ("GIT_CONFIG_COUNT", "1"),
        ("GIT_CONFIG_KEY_0", "protocol.file.allow"),
        ("GIT_CONFIG_VALUE_0", "always"),
    ];

    /// Creates an empty superproject under `<tmp>/super`.
    pub fn new() -> Self {
        let fixture = Self {
            temp_dir: assert_fs::TempDir::new().expect("Failed to create temp directory"),
        };
        let root = fixture.root();
        std::fs::create_dir_all(&root).unwrap();
        fixture.git(&root, &["init", "-q", "-b", "main"]);
        fixture
    }

    /// The superproject directory, used as the workspace root.
    pub fn root(&self) -> PathBuf {
        self.temp_dir.path().join("super")
    }

    pub fn git(&self, dir: &Path, args: &[&str]) -> String {
        let output = Command::new("git")
            .args(args)
            .current_dir(dir)
            .envs(Self::GIT_ENV)
            .env("HOME", self.temp_dir.path())
            .output()
            .expect("git must be installed for integration tests");
        assert!(
            output.status.success(),
            "git {:?} failed: {}",
            args,
            String::from_utf8_lossy(&output.stderr)
        );
        String::from_utf8_lossy(&output.stdout).trim().to_string()
    }

    /// Creates an upstream repository named `name` with a commit on `main`
    /// and one on each of `branches`, and returns its `file://` URL.
    pub fn upstream(&self, name: &str, branches: &[&str]) -> String {
        let dir = self.temp_dir.path().join("upstream").join(name);
        std::fs::create_dir_all(&dir).unwrap();
        self.git(&dir, &["init", "-q", "-b", "main"]);
        std::fs::write(dir.join("README.md"), format!("# {name}\n")).unwrap();
        self.git(&dir, &["add", "."]);
        self.git(&dir, &["commit", "-q", "-m", "initial"]);
        for branch in branches {
            self.git(&dir, &["checkout", "-q", "-b", branch]);
            std::fs::write(dir.join(format!("{branch}.txt")), branch).unwrap();
            self.git(&dir, &["add", "."]);
            self.git(&dir, &["commit", "-q", "-m", branch]);
            self.git(&dir, &["checkout", "-q", "main"]);
        }
        format!("file://{}", dir.display())
    }

    pub fn write_config(&self, content: &str) {
        std::fs::write(self.root().join("workspaces.yaml"), content).unwrap();
    }

    pub fn config(&self) -> String {
        std::fs::read_to_string(self.root().join("workspaces.yaml")).unwrap()
    }

    /// Current branch of the checkout at `path` under the superproject.
    pub fn branch(&self, path: &str) -> String {
        self.git(&self.root().join(path), &["rev-parse", "--abbrev-ref", "HEAD"])
    }

    pub fn command(&self) -> assert_cmd::Command {
        let mut cmd = assert_cmd::cargo::cargo_bin_cmd!("workspace-sync");
        cmd.current_dir(self.root())
            .envs(Self::GIT_ENV)
            .env("HOME", self.temp_dir.path())
            .env_remove("WORKSPACE_SYNC_CONFIG")
            .env_remove("WORKSPACE_SYNC_ROOT")
            .env("NO_COLOR", "1");
        cmd
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fixture_with_config() {
        let fixture = TestFixture::new().with_config("workspaces: []");
        assert!(fixture.config_path().exists());
    }

    #[test]
    fn test_configs_are_valid_yaml() {
        for config in [configs::TWO_MISSING, configs::DUPLICATE_PATHS] {
            serde_yaml::from_str::<serde_yaml::Value>(config).expect("Config should be valid YAML");
        }
        assert!(serde_yaml::from_str::<serde_yaml::Value>(configs::INVALID_YAML).is_err());
    }
}
