//! Recording fakes for the backing-store traits, shared by unit tests.
//!
//! `FakeGit` keeps an in-memory table of "repositories" keyed by path
//! relative to the workspace root and mirrors just enough on the real
//! filesystem (creating and deleting directories on submodule add/remove)
//! for the engine's own filesystem checks to see consistent state.

use std::collections::{HashMap, HashSet};
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use crate::error::{Error, Result};
use crate::repository::{GitOperations, ModuleWorkspaceOperations};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GitCall {
    CurrentBranch(String),
    IsClean(String),
    ChangeCounts(String),
    Fetch(String),
    Checkout { branch: String, path: String },
    Pull { branch: String, path: String },
    Stash(String),
    StashPop(String),
    SubmoduleAdd { url: String, path: String, branch: String },
    SubmoduleRemove(String),
}

impl GitCall {
    /// Short operation name, used to filter call logs.
    pub fn op(&self) -> &'static str {
        match self {
            GitCall::CurrentBranch(_) => "current_branch",
            GitCall::IsClean(_) => "is_clean",
            GitCall::ChangeCounts(_) => "change_counts",
            GitCall::Fetch(_) => "fetch",
            GitCall::Checkout { .. } => "checkout",
            GitCall::Pull { .. } => "pull",
            GitCall::Stash(_) => "stash",
            GitCall::StashPop(_) => "stash_pop",
            GitCall::SubmoduleAdd { .. } => "submodule_add",
            GitCall::SubmoduleRemove(_) => "submodule_remove",
        }
    }

    pub fn path(&self) -> &str {
        match self {
            GitCall::CurrentBranch(p)
            | GitCall::IsClean(p)
            | GitCall::ChangeCounts(p)
            | GitCall::Fetch(p)
            | GitCall::Stash(p)
            | GitCall::StashPop(p)
            | GitCall::SubmoduleRemove(p) => p,
            GitCall::Checkout { path, .. }
            | GitCall::Pull { path, .. }
            | GitCall::SubmoduleAdd { path, .. } => path,
        }
    }
}

#[derive(Debug, Clone)]
pub struct FakeRepo {
    pub branch: String,
    pub modified: usize,
    pub untracked: usize,
}

impl FakeRepo {
    fn is_clean(&self) -> bool {
        self.modified == 0 && self.untracked == 0
    }
}

#[derive(Debug, Default)]
struct FakeState {
    repos: HashMap<String, FakeRepo>,
    failing: HashSet<(String, String)>,
    calls: Vec<GitCall>,
}

/// In-memory stand-in for the git adapter.
#[derive(Debug)]
pub struct FakeGit {
    root: PathBuf,
    state: Mutex<FakeState>,
}

impl FakeGit {
    pub fn new(root: &Path) -> Self {
        Self {
            root: root.to_path_buf(),
            state: Mutex::new(FakeState::default()),
        }
    }

    /// Registers a checked-out repository at `path` and creates its
    /// directory with a tracked file in it.
    pub fn with_repo(self, path: &str, branch: &str) -> Self {
        let dir = self.root.join(path);
        fs::create_dir_all(&dir).unwrap();
        fs::write(dir.join("README.md"), "fake").unwrap();
        self.state.lock().unwrap().repos.insert(
            path.to_string(),
            FakeRepo {
                branch: branch.to_string(),
                modified: 0,
                untracked: 0,
            },
        );
        self
    }

    /// Marks the repository at `path` as having local changes.
    pub fn with_changes(self, path: &str, modified: usize, untracked: usize) -> Self {
        if let Some(repo) = self.state.lock().unwrap().repos.get_mut(path) {
            repo.modified = modified;
            repo.untracked = untracked;
        }
        self
    }

    /// Makes `op` (see [`GitCall::op`]) fail for `path`.
    pub fn failing(self, op: &str, path: &str) -> Self {
        self.state
            .lock()
            .unwrap()
            .failing
            .insert((op.to_string(), path.to_string()));
        self
    }

    pub fn calls(&self) -> Vec<GitCall> {
        self.state.lock().unwrap().calls.clone()
    }

    /// Calls touching `path`, in order.
    pub fn calls_for(&self, path: &str) -> Vec<GitCall> {
        self.calls()
            .into_iter()
            .filter(|call| call.path() == path)
            .collect()
    }

    /// Operation names of the calls touching `path`, in order.
    pub fn ops_for(&self, path: &str) -> Vec<&'static str> {
        self.calls_for(path).iter().map(GitCall::op).collect()
    }

    pub fn count(&self, op: &str) -> usize {
        self.calls().iter().filter(|call| call.op() == op).count()
    }

    pub fn repo(&self, path: &str) -> Option<FakeRepo> {
        self.state.lock().unwrap().repos.get(path).cloned()
    }

    fn rel(&self, path: &Path) -> String {
        path.strip_prefix(&self.root)
            .unwrap_or(path)
            .to_string_lossy()
            .to_string()
    }

    fn record(&self, call: GitCall) -> Result<()> {
        let mut state = self.state.lock().unwrap();
        let key = (call.op().to_string(), call.path().to_string());
        let fails = state.failing.contains(&key);
        let description = format!("{:?}", call);
        state.calls.push(call);
        if fails {
            return Err(Error::GitCommand {
                command: description,
                dir: key.1,
                stderr: "simulated failure".to_string(),
            });
        }
        Ok(())
    }

    fn with_repo_state<T>(&self, path: &str, f: impl FnOnce(&mut FakeRepo) -> T) -> Result<T> {
        let mut state = self.state.lock().unwrap();
        match state.repos.get_mut(path) {
            Some(repo) => Ok(f(repo)),
            None => Err(Error::GitCommand {
                command: "rev-parse".to_string(),
                dir: path.to_string(),
                stderr: "not a git repository".to_string(),
            }),
        }
    }
}

impl GitOperations for FakeGit {
    fn is_repository(&self, path: &Path) -> bool {
        let rel = self.rel(path);
        self.state.lock().unwrap().repos.contains_key(&rel)
    }

    fn current_branch(&self, path: &Path) -> Result<String> {
        let rel = self.rel(path);
        self.record(GitCall::CurrentBranch(rel.clone()))?;
        self.with_repo_state(&rel, |repo| repo.branch.clone())
    }

    fn is_clean(&self, path: &Path) -> Result<bool> {
        let rel = self.rel(path);
        self.record(GitCall::IsClean(rel.clone()))?;
        self.with_repo_state(&rel, |repo| repo.is_clean())
    }

    fn change_counts(&self, path: &Path) -> Result<(usize, usize)> {
        let rel = self.rel(path);
        self.record(GitCall::ChangeCounts(rel.clone()))?;
        self.with_repo_state(&rel, |repo| (repo.modified, repo.untracked))
    }

    fn fetch(&self, path: &Path) -> Result<()> {
        self.record(GitCall::Fetch(self.rel(path)))
    }

    fn checkout_branch(&self, branch: &str, path: &Path) -> Result<()> {
        let rel = self.rel(path);
        self.record(GitCall::Checkout {
            branch: branch.to_string(),
            path: rel.clone(),
        })?;
        self.with_repo_state(&rel, |repo| repo.branch = branch.to_string())
    }

    fn pull_origin_branch(&self, branch: &str, path: &Path) -> Result<()> {
        self.record(GitCall::Pull {
            branch: branch.to_string(),
            path: self.rel(path),
        })
    }

    fn stash(&self, path: &Path, _message: &str) -> Result<bool> {
        let rel = self.rel(path);
        self.record(GitCall::Stash(rel.clone()))?;
        self.with_repo_state(&rel, |repo| {
            let created = !repo.is_clean();
            repo.modified = 0;
            repo.untracked = 0;
            created
        })
    }

    fn stash_pop(&self, path: &Path) -> Result<()> {
        self.record(GitCall::StashPop(self.rel(path)))
    }

    fn submodule_add(&self, url: &str, path: &str, branch: &str, root: &Path) -> Result<()> {
        self.record(GitCall::SubmoduleAdd {
            url: url.to_string(),
            path: path.to_string(),
            branch: branch.to_string(),
        })?;
        let dir = root.join(path);
        fs::create_dir_all(&dir)?;
        fs::write(dir.join("README.md"), "fake")?;
        self.state.lock().unwrap().repos.insert(
            path.to_string(),
            FakeRepo {
                branch: branch.to_string(),
                modified: 0,
                untracked: 0,
            },
        );
        Ok(())
    }

    fn submodule_remove(&self, path: &str, root: &Path) -> Result<()> {
        self.record(GitCall::SubmoduleRemove(path.to_string()))?;
        let dir = root.join(path);
        if dir.exists() {
            fs::remove_dir_all(&dir)?;
        }
        self.state.lock().unwrap().repos.remove(path);
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ModuleCall {
    Init,
    Use(Vec<String>),
    Remove(String),
}

/// In-memory stand-in for the `go work` adapter.
#[derive(Debug)]
pub struct FakeModules {
    available: bool,
    fail_on: Option<ModuleCall>,
    calls: Mutex<Vec<ModuleCall>>,
}

impl FakeModules {
    pub fn available() -> Self {
        Self {
            available: true,
            fail_on: None,
            calls: Mutex::new(Vec::new()),
        }
    }

    pub fn unavailable() -> Self {
        Self {
            available: false,
            ..Self::available()
        }
    }

    pub fn failing_on(mut self, call: ModuleCall) -> Self {
        self.fail_on = Some(call);
        self
    }

    pub fn calls(&self) -> Vec<ModuleCall> {
        self.calls.lock().unwrap().clone()
    }

    fn record(&self, call: ModuleCall) -> Result<()> {
        let fails = self.fail_on.as_ref() == Some(&call);
        let description = format!("{:?}", call);
        self.calls.lock().unwrap().push(call);
        if fails {
            return Err(Error::ModuleWorkspaceCommand {
                command: description,
                dir: ".".to_string(),
                stderr: "simulated failure".to_string(),
            });
        }
        Ok(())
    }
}

impl ModuleWorkspaceOperations for FakeModules {
    fn is_available(&self) -> bool {
        self.available
    }

    fn init(&self, _root: &Path) -> Result<()> {
        self.record(ModuleCall::Init)
    }

    fn use_paths(&self, paths: &[String], _root: &Path) -> Result<()> {
        self.record(ModuleCall::Use(paths.to_vec()))
    }

    fn remove(&self, path: &str, _root: &Path) -> Result<()> {
        self.record(ModuleCall::Remove(path.to_string()))
    }
}
