//! # Error Handling
//!
//! This module defines the centralized error type for the `workspace-sync`
//! library. It uses the `thiserror` library to create a single `Error` enum
//! covering every failure the reconciliation engine can observe, each variant
//! carrying enough context to tell the user which workspace failed and why.
//!
//! ## Taxonomy
//!
//! - **Input validation** (`ConfigParse`, `InvalidWorkspaceRoot`): raised
//!   before anything on disk is touched.
//! - **Adapter failures** (`GitCommand`, `ModuleWorkspaceCommand`,
//!   `ToolUnavailable`): an external command exited non-zero or could not be
//!   started.
//! - **Conflicts** (`UncommittedChanges`): a workspace is on the wrong branch
//!   and has local changes. These are never resolved automatically.
//! - **Context wrappers** (`Workspace`, `Phase`): attach the workspace path
//!   and step, or the sync phase, to an underlying error.
//!
//! Best-effort failures (fetch, pull, stash pop) never become an `Error`;
//! they are logged as warnings where they happen.

use std::fmt;

use thiserror::Error;

/// The phases of a `sync` run, in execution order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SyncPhase {
    Idle,
    ValidatingInputs,
    RemovingInactive,
    CheckingOutActive,
    ReconcilingModuleWorkspace,
    Done,
}

impl fmt::Display for SyncPhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            SyncPhase::Idle => "idle",
            SyncPhase::ValidatingInputs => "validating inputs",
            SyncPhase::RemovingInactive => "removing inactive workspaces",
            SyncPhase::CheckingOutActive => "checking out active workspaces",
            SyncPhase::ReconcilingModuleWorkspace => "reconciling go.work",
            SyncPhase::Done => "done",
        };
        f.write_str(name)
    }
}

/// Main error type for workspace-sync operations
#[derive(Error, Debug)]
pub enum Error {
    /// The workspace configuration file could not be parsed or failed
    /// validation.
    #[error("Configuration parsing error: {message}{}", hint.as_ref().map(|h| format!("\n  hint: {}", h)).unwrap_or_default())]
    ConfigParse {
        message: String,
        /// Optional hint for how to fix the configuration issue
        hint: Option<String>,
    },

    /// The workspace root does not exist or is not a directory.
    #[error("Invalid workspace root {path}: {message}")]
    InvalidWorkspaceRoot { path: String, message: String },

    /// A git command exited unsuccessfully or could not be started.
    #[error("Git command failed in {dir}: git {command} - {stderr}")]
    GitCommand {
        command: String,
        dir: String,
        stderr: String,
    },

    /// A `go work` command exited unsuccessfully or could not be started.
    #[error("Module workspace command failed in {dir}: {command} - {stderr}")]
    ModuleWorkspaceCommand {
        command: String,
        dir: String,
        stderr: String,
    },

    /// A required external tool is not installed or not on `PATH`.
    #[error("Required tool '{tool}' is not available: {message}")]
    ToolUnavailable { tool: String, message: String },

    /// A workspace sits on the wrong branch with local modifications.
    #[error("{path} is on branch '{current}' (expected '{expected}') with uncommitted changes, manual intervention required")]
    UncommittedChanges {
        path: String,
        current: String,
        expected: String,
    },

    /// A failure while processing one workspace, with the step that failed.
    #[error("Workspace {path} failed during {step}: {source}")]
    Workspace {
        path: String,
        step: String,
        #[source]
        source: Box<Error>,
    },

    /// A sync run stopped in the given phase.
    #[error("Sync failed while {phase}: {source}")]
    Phase {
        phase: SyncPhase,
        #[source]
        source: Box<Error>,
    },

    /// A path lock could not be acquired within its timeout.
    #[error("Timed out after {waited_ms}ms waiting for lock on {path}")]
    LockTimeout { path: String, waited_ms: u128 },

    /// An error indicating that a mutex or other lock has been poisoned.
    #[error("Lock poisoned: {context}")]
    LockPoisoned { context: String },

    /// The worker pool for a batch could not be created.
    #[error("Worker pool error: {message}")]
    WorkerPool { message: String },

    /// An interactive prompt failed or had no answer available.
    #[error("Prompt error: {message}")]
    Prompt { message: String },

    /// An I/O error, wrapped from `std::io::Error`.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// A YAML parsing error, wrapped from `serde_yaml::Error`.
    #[error("YAML parsing error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    /// A JSON serialization error, wrapped from `serde_json::Error`.
    #[error("JSON serialization error: {0}")]
    Json(#[from] serde_json::Error),
}

impl Error {
    /// Attach the workspace path and failing step to an error.
    pub fn in_workspace(self, path: &str, step: &str) -> Self {
        Error::Workspace {
            path: path.to_string(),
            step: step.to_string(),
            source: Box::new(self),
        }
    }

    /// Attach the sync phase an error surfaced in.
    pub fn in_phase(self, phase: SyncPhase) -> Self {
        Error::Phase {
            phase,
            source: Box::new(self),
        }
    }

    /// Returns true if this error, or any error it wraps, is a branch
    /// conflict with uncommitted changes.
    pub fn is_conflict(&self) -> bool {
        match self {
            Error::UncommittedChanges { .. } => true,
            Error::Workspace { source, .. } | Error::Phase { source, .. } => source.is_conflict(),
            _ => false,
        }
    }

    /// Returns the phase a sync failure surfaced in, if any.
    pub fn phase(&self) -> Option<SyncPhase> {
        match self {
            Error::Phase { phase, .. } => Some(*phase),
            _ => None,
        }
    }
}

/// A convenient type alias for `Result<T, Error>`.
pub type Result<T> = std::result::Result<T, Error>;
