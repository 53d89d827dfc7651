//! # Workspace Configuration
//!
//! This module defines the declarative model of desired state: the list of
//! workspaces that should (or should not) exist under the workspace root, and
//! the logic for reading and writing it as YAML.
//!
//! ## Format
//!
//! The current format is a mapping with a `workspaces` key:
//!
//! ```yaml
//! workspaces:
//!   - url: https://github.com/org/svc.git
//!     path: services/svc
//!     branch: main
//!     goWorkspace: true
//!     active: true
//! ```
//!
//! A bare top-level list of entries is still accepted so that older files
//! keep working. Files are always written back in the current format.
//!
//! ## Validation
//!
//! Every path must be relative, free of `..` components, and unique within
//! the file. Validation happens at load time so that no reconciliation pass
//! ever has to guess which of two entries for the same path wins.

use std::collections::HashSet;
use std::io::Write;
use std::path::{Component, Path, PathBuf};

use serde::{Deserialize, Serialize};
use serde_yaml::Value;

use crate::defaults::DEFAULT_BRANCH;
use crate::error::{Error, Result};

fn default_branch() -> String {
    DEFAULT_BRANCH.to_string()
}

fn default_active() -> bool {
    true
}

/// One declared repository-to-path binding.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WorkspaceEntry {
    /// Remote repository location, passed through to git untouched.
    pub url: String,
    /// Path relative to the workspace root.
    pub path: String,
    /// The branch the workspace should have checked out.
    #[serde(default = "default_branch")]
    pub branch: String,
    /// Whether `path` belongs in the `go.work` file.
    #[serde(default, rename = "goWorkspace", alias = "isModuleWorkspace")]
    pub is_module_workspace: bool,
    /// Whether the workspace should exist on disk.
    #[serde(default = "default_active")]
    pub active: bool,
}

impl WorkspaceEntry {
    pub fn new(url: impl Into<String>, path: impl Into<String>, branch: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            path: path.into(),
            branch: branch.into(),
            is_module_workspace: false,
            active: true,
        }
    }

    pub fn module_workspace(mut self, flag: bool) -> Self {
        self.is_module_workspace = flag;
        self
    }

    pub fn active(mut self, flag: bool) -> Self {
        self.active = flag;
        self
    }

    /// Absolute location of this workspace under `root`.
    pub fn local_path(&self, root: &Path) -> PathBuf {
        root.join(&self.path)
    }
}

/// The whole configuration file: an ordered list of entries.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct WorkspaceConfig {
    #[serde(default)]
    pub workspaces: Vec<WorkspaceEntry>,
}

impl WorkspaceConfig {
    pub fn new(workspaces: Vec<WorkspaceEntry>) -> Self {
        Self { workspaces }
    }

    /// Applies the load-time checks to a configuration built in memory:
    /// every path must already be normalized, valid, and unique.
    pub fn check(&self) -> Result<()> {
        let mut normalized = self.clone();
        validate(&mut normalized)?;
        for (entry, clean) in self.workspaces.iter().zip(&normalized.workspaces) {
            if entry.path != clean.path {
                return Err(Error::ConfigParse {
                    message: format!(
                        "Workspace path '{}' is not normalized (expected '{}')",
                        entry.path, clean.path
                    ),
                    hint: None,
                });
            }
        }
        Ok(())
    }

    /// Splits entries into `(active, inactive)`, preserving file order in
    /// both halves.
    pub fn partition(&self) -> (Vec<&WorkspaceEntry>, Vec<&WorkspaceEntry>) {
        self.workspaces.iter().partition(|entry| entry.active)
    }

    pub fn active(&self) -> Vec<&WorkspaceEntry> {
        self.partition().0
    }

    pub fn find(&self, path: &str) -> Option<&WorkspaceEntry> {
        let wanted = normalize_path(path);
        self.workspaces.iter().find(|entry| entry.path == wanted)
    }

    pub fn find_mut(&mut self, path: &str) -> Option<&mut WorkspaceEntry> {
        let wanted = normalize_path(path);
        self.workspaces.iter_mut().find(|entry| entry.path == wanted)
    }

    /// Appends an entry, rejecting it if it is invalid or its path is
    /// already taken.
    pub fn add_entry(&mut self, mut entry: WorkspaceEntry) -> Result<()> {
        entry.path = normalize_path(&entry.path);
        validate_entry(&entry)?;
        if self.find(&entry.path).is_some() {
            return Err(Error::ConfigParse {
                message: format!("Workspace path '{}' is already configured", entry.path),
                hint: Some("Pass a different path as the second argument".to_string()),
            });
        }
        self.workspaces.push(entry);
        Ok(())
    }

    /// Sets `active` on the named entries and returns the paths whose flag
    /// actually changed. Unknown paths are an error and leave the config
    /// untouched.
    pub fn set_active(&mut self, paths: &[String], active: bool) -> Result<Vec<String>> {
        let unknown: Vec<&str> = paths
            .iter()
            .filter(|path| self.find(path).is_none())
            .map(String::as_str)
            .collect();
        if !unknown.is_empty() {
            return Err(Error::ConfigParse {
                message: format!("Unknown workspace path(s): {}", unknown.join(", ")),
                hint: Some("Run 'workspace-sync status' to list configured workspaces".to_string()),
            });
        }

        let mut changed = Vec::new();
        for path in paths {
            if let Some(entry) = self.find_mut(path) {
                if entry.active != active {
                    entry.active = active;
                    changed.push(entry.path.clone());
                }
            }
        }
        Ok(changed)
    }
}

/// Drops `.` segments and redundant slashes so equivalent spellings
/// compare equal (`./svc/`, `svc/.` and `svc//` all become `svc`).
///
/// `..` segments and a leading `/` are kept so validation can reject them.
/// A path that names the workspace root itself normalizes to `""`.
pub fn normalize_path(path: &str) -> String {
    let trimmed = path.trim();
    let segments: Vec<&str> = trimmed
        .split('/')
        .filter(|segment| !segment.is_empty() && *segment != ".")
        .collect();
    let joined = segments.join("/");
    if trimmed.starts_with('/') {
        format!("/{joined}")
    } else {
        joined
    }
}

fn validate_entry(entry: &WorkspaceEntry) -> Result<()> {
    let invalid = |message: String, hint: &str| Error::ConfigParse {
        message,
        hint: Some(hint.to_string()),
    };

    if entry.url.trim().is_empty() {
        return Err(invalid(
            format!("Workspace '{}' has an empty url", entry.path),
            "Set 'url:' to the repository's clone URL",
        ));
    }
    if entry.path.is_empty() {
        return Err(invalid(
            format!(
                "Workspace for {} has an empty path or points at the workspace root",
                entry.url
            ),
            "Set 'path:' to a directory relative to the workspace root",
        ));
    }
    if entry.branch.trim().is_empty() {
        return Err(invalid(
            format!("Workspace '{}' has an empty branch", entry.path),
            "Set 'branch:' or remove it to use the default branch",
        ));
    }

    let path = Path::new(&entry.path);
    let escapes = path.components().any(|component| {
        matches!(
            component,
            Component::CurDir | Component::ParentDir | Component::RootDir | Component::Prefix(_)
        )
    });
    if escapes {
        return Err(invalid(
            format!("Workspace path '{}' must stay inside the workspace root", entry.path),
            "Use a relative path without '..' components",
        ));
    }

    Ok(())
}

fn validate(config: &mut WorkspaceConfig) -> Result<()> {
    let mut seen = HashSet::new();
    for entry in &mut config.workspaces {
        entry.path = normalize_path(&entry.path);
        validate_entry(entry)?;
        if !seen.insert(entry.path.clone()) {
            return Err(Error::ConfigParse {
                message: format!("Duplicate workspace path '{}'", entry.path),
                hint: Some("Each path may appear only once; remove or rename one entry".to_string()),
            });
        }
    }
    Ok(())
}

/// Parses and validates a configuration document.
///
/// Accepts the current `workspaces:` mapping form, a bare list of entries,
/// or an empty document.
pub fn parse(yaml_content: &str) -> Result<WorkspaceConfig> {
    let raw: Value = serde_yaml::from_str(yaml_content).map_err(Error::Yaml)?;

    let mut config = match raw {
        Value::Null => WorkspaceConfig::default(),
        Value::Mapping(_) => serde_yaml::from_value::<WorkspaceConfig>(raw)?,
        Value::Sequence(_) => WorkspaceConfig::new(serde_yaml::from_value(raw)?),
        _ => {
            return Err(Error::ConfigParse {
                message: "Expected a mapping with a 'workspaces' list".to_string(),
                hint: Some("Start the file with 'workspaces:'".to_string()),
            })
        }
    };

    validate(&mut config)?;
    Ok(config)
}

/// Reads and parses a configuration file.
pub fn from_file<P: AsRef<Path>>(path: P) -> Result<WorkspaceConfig> {
    let content = std::fs::read_to_string(path).map_err(Error::Io)?;
    parse(&content)
}

/// Serializes a configuration in the current format.
pub fn to_yaml(config: &WorkspaceConfig) -> Result<String> {
    Ok(serde_yaml::to_string(config)?)
}

/// Writes a configuration file atomically.
///
/// The document goes to a temporary file next to `path` which is then
/// renamed over it, so readers never observe a half-written file.
pub fn to_file<P: AsRef<Path>>(config: &WorkspaceConfig, path: P) -> Result<()> {
    let path = path.as_ref();
    let yaml = to_yaml(config)?;

    let dir = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
        _ => PathBuf::from("."),
    };
    std::fs::create_dir_all(&dir)?;

    let mut temp = tempfile::NamedTempFile::new_in(&dir)?;
    temp.write_all(yaml.as_bytes())?;
    temp.as_file().sync_all()?;
    temp.persist(path).map_err(|e| Error::Io(e.error))?;
    Ok(())
}
