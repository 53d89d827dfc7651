//! Read-only status report over the active workspaces.

use serde::Serialize;

use super::Reconciler;
use crate::config::WorkspaceEntry;
use crate::error::Result;

/// Overall state of one workspace, most severe first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum RepoState {
    Missing,
    NotARepository,
    Error,
    WrongBranch,
    Modified,
    Clean,
}

impl RepoState {
    pub fn label(&self) -> &'static str {
        match self {
            RepoState::Missing => "missing",
            RepoState::NotARepository => "not a repository",
            RepoState::Error => "error",
            RepoState::WrongBranch => "wrong branch",
            RepoState::Modified => "modified",
            RepoState::Clean => "clean",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RepositoryStatus {
    pub path: String,
    pub url: String,
    pub branch: String,
    pub current_branch: Option<String>,
    pub state: RepoState,
    pub modified_files: usize,
    pub untracked_files: usize,
    pub go_workspace: bool,
    pub error: Option<String>,
}

impl RepositoryStatus {
    fn new(entry: &WorkspaceEntry, state: RepoState) -> Self {
        Self {
            path: entry.path.clone(),
            url: entry.url.clone(),
            branch: entry.branch.clone(),
            current_branch: None,
            state,
            modified_files: 0,
            untracked_files: 0,
            go_workspace: entry.is_module_workspace,
            error: None,
        }
    }

    pub fn is_dirty(&self) -> bool {
        self.modified_files > 0 || self.untracked_files > 0
    }

    pub fn is_on_wrong_branch(&self) -> bool {
        matches!(&self.current_branch, Some(current) if *current != self.branch)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StatusSummary {
    pub total: usize,
    pub clean: usize,
    pub modified: usize,
    pub missing: usize,
    pub on_wrong_branch: usize,
    pub go_modules: usize,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct StatusReport {
    pub summary: StatusSummary,
    pub repositories: Vec<RepositoryStatus>,
}

impl StatusReport {
    pub fn from_repositories(repositories: Vec<RepositoryStatus>) -> Self {
        let mut summary = StatusSummary {
            total: repositories.len(),
            ..StatusSummary::default()
        };
        for repo in &repositories {
            match repo.state {
                RepoState::Missing | RepoState::NotARepository => summary.missing += 1,
                RepoState::Clean => summary.clean += 1,
                _ => {}
            }
            if repo.is_dirty() {
                summary.modified += 1;
            }
            if repo.is_on_wrong_branch() {
                summary.on_wrong_branch += 1;
            }
            if repo.go_workspace {
                summary.go_modules += 1;
            }
        }
        Self {
            summary,
            repositories,
        }
    }
}

fn probe(ctx: &Reconciler<'_>, entry: &WorkspaceEntry) -> Result<RepositoryStatus> {
    let git = ctx.git();
    let dir = entry.local_path(ctx.root());

    if !dir.is_dir() {
        return Ok(RepositoryStatus::new(entry, RepoState::Missing));
    }
    if !git.is_repository(&dir) {
        return Ok(RepositoryStatus::new(entry, RepoState::NotARepository));
    }

    let current = git.current_branch(&dir)?;
    let (modified, untracked) = git.change_counts(&dir)?;

    let mut status = RepositoryStatus::new(entry, RepoState::Clean);
    status.current_branch = Some(current);
    status.modified_files = modified;
    status.untracked_files = untracked;
    status.state = if status.is_on_wrong_branch() {
        RepoState::WrongBranch
    } else if status.is_dirty() {
        RepoState::Modified
    } else {
        RepoState::Clean
    };
    Ok(status)
}

/// Probes every entry in `active`. A failing probe is reported on its own
/// entry and never hides the others.
pub fn execute(ctx: &Reconciler<'_>, active: &[&WorkspaceEntry]) -> StatusReport {
    let results = ctx
        .batcher()
        .run_collect_all(active, |entry| probe(ctx, entry));

    let repositories = active
        .iter()
        .zip(results)
        .map(|(entry, result)| {
            result.unwrap_or_else(|e| {
                let mut status = RepositoryStatus::new(entry, RepoState::Error);
                status.error = Some(e.to_string());
                status
            })
        })
        .collect();
    StatusReport::from_repositories(repositories)
}
