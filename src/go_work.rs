//! Wrappers around `go work`, which manages the `go.work` file listing the
//! modules of a multi-module workspace.

use std::path::Path;
use std::process::Command;

use log::debug;

use crate::error::{Error, Result};

/// Name of the module-workspace file created in the workspace root.
pub const GO_WORK_FILE: &str = "go.work";

fn run_go(dir: &Path, args: &[&str]) -> Result<String> {
    let command = format!("go {}", args.join(" "));
    debug!("{} (in {})", command, dir.display());

    let output = Command::new("go")
        .args(args)
        .current_dir(dir)
        .output()
        .map_err(|e| Error::ModuleWorkspaceCommand {
            command: command.clone(),
            dir: dir.display().to_string(),
            stderr: e.to_string(),
        })?;

    let stdout = String::from_utf8_lossy(&output.stdout).trim().to_string();
    if !output.status.success() {
        let stderr = String::from_utf8_lossy(&output.stderr).trim().to_string();
        return Err(Error::ModuleWorkspaceCommand {
            command,
            dir: dir.display().to_string(),
            stderr: if stderr.is_empty() {
                format!("exited with {}", output.status)
            } else {
                stderr
            },
        });
    }
    Ok(stdout)
}

/// `go work` records module directories as `./relative/path`; `-dropuse`
/// only matches that exact spelling.
pub fn use_directive_path(path: &str) -> String {
    let trimmed = path.trim_start_matches("./");
    format!("./{}", trimmed)
}

pub fn is_available() -> bool {
    match Command::new("go").arg("version").output() {
        Ok(output) => output.status.success(),
        Err(e) => {
            debug!("go not available: {}", e);
            false
        }
    }
}

/// Creates `go.work` in `root`. An existing file is left alone.
pub fn init(root: &Path) -> Result<()> {
    if root.join(GO_WORK_FILE).exists() {
        return Ok(());
    }
    match run_go(root, &["work", "init"]) {
        Ok(_) => Ok(()),
        Err(Error::ModuleWorkspaceCommand { stderr, .. }) if stderr.contains("already exists") => {
            Ok(())
        }
        Err(e) => Err(e),
    }
}

/// Adds every path to `go.work` in a single invocation.
pub fn use_paths(paths: &[String], root: &Path) -> Result<()> {
    if paths.is_empty() {
        return Ok(());
    }
    let directives: Vec<String> = paths.iter().map(|p| use_directive_path(p)).collect();
    let mut args = vec!["work", "use"];
    args.extend(directives.iter().map(String::as_str));
    run_go(root, &args).map(|_| ())
}

/// Drops one path from `go.work`.
pub fn remove(path: &str, root: &Path) -> Result<()> {
    let flag = format!("-dropuse={}", use_directive_path(path));
    run_go(root, &["work", "edit", &flag]).map(|_| ())
}
