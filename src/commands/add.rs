//! # Add Command Implementation
//!
//! Adds a repository to the workspace configuration, creating the file if
//! it does not exist yet. Only the configuration is written; run `sync`
//! afterwards to check the new workspace out.
//!
//! - **GitHub shorthand**: `org/repo` expands to
//!   `https://github.com/org/repo.git`.
//! - **Default path**: the repository name, taken from the last URL segment.
//! - **Prompts**: branch and `go.work` membership are asked for unless given
//!   as flags; `--yes` takes the defaults instead.

use anyhow::Result;
use clap::Args;
use url::Url;

use workspace_sync::config::WorkspaceEntry;
use workspace_sync::defaults::DEFAULT_BRANCH;
use workspace_sync::output::emoji;
use workspace_sync::prompt::Prompter;

use super::Context;

/// Add a repository to the configuration
#[derive(Args, Debug)]
pub struct AddArgs {
    /// Repository URL (e.g., https://github.com/org/repo.git or org/repo)
    #[arg(value_name = "REPO")]
    pub repo: String,

    /// Path under the workspace root. Defaults to the repository name.
    #[arg(value_name = "PATH")]
    pub path: Option<String>,

    /// Branch to track.
    #[arg(short, long)]
    pub branch: Option<String>,

    /// Register the workspace in go.work.
    #[arg(long)]
    pub go_workspace: bool,

    /// Add the workspace as inactive.
    #[arg(long)]
    pub inactive: bool,

    /// Non-interactive mode: use defaults instead of prompting.
    #[arg(short, long)]
    pub yes: bool,
}

pub fn execute(args: AddArgs, ctx: &Context, prompter: &dyn Prompter) -> Result<()> {
    let url = normalize_repo_url(&args.repo);
    let path = match args.path {
        Some(path) => path,
        None => repo_name(&url)
            .ok_or_else(|| anyhow::anyhow!("Cannot derive a path from '{}', pass one explicitly", url))?,
    };

    let mut config = ctx.load_config_or_default()?;
    if config.find(&path).is_some() {
        anyhow::bail!(
            "Workspace path '{}' is already configured\n\n\
             hint: Pass a different path as the second argument\n\
             hint: Use 'workspace-sync enable {}' to activate the existing entry",
            path,
            path
        );
    }

    let branch = match args.branch {
        Some(branch) => branch,
        None if args.yes => DEFAULT_BRANCH.to_string(),
        None => prompter.input("Branch to track", DEFAULT_BRANCH)?,
    };
    let go_workspace = args.go_workspace
        || (!args.yes && prompter.confirm("Register this workspace in go.work?", false)?);

    let entry = WorkspaceEntry::new(&url, &path, branch)
        .module_workspace(go_workspace)
        .active(!args.inactive);
    let summary = format!("{} -> {} ({})", entry.url, entry.path, entry.branch);
    config.add_entry(entry)?;
    ctx.save_config(&config)?;

    println!(
        "{} Added {} to {}",
        emoji(&ctx.out, "✅", "[OK]"),
        summary,
        ctx.config_path.display()
    );
    if !args.inactive {
        println!(
            "{} Run `workspace-sync sync` to check it out",
            emoji(&ctx.out, "💡", "[HINT]")
        );
    }
    Ok(())
}

/// Expands GitHub shorthand; anything that already looks like a URL is
/// kept as-is.
pub fn normalize_repo_url(input: &str) -> String {
    let input = input.trim();
    if Url::parse(input).is_ok() || input.starts_with("git@") {
        return input.to_string();
    }

    let parts: Vec<&str> = input.split('/').collect();
    if parts.len() == 2 && parts.iter().all(|p| !p.is_empty()) && !input.contains(':') {
        let repo = parts[1].trim_end_matches(".git");
        return format!("https://github.com/{}/{}.git", parts[0], repo);
    }

    input.to_string()
}

/// The repository name: last path segment without `.git`.
pub fn repo_name(url: &str) -> Option<String> {
    let path = match Url::parse(url) {
        Ok(parsed) if parsed.has_host() => parsed.path().to_string(),
        // scp-like `git@host:org/repo.git` or a local path
        _ => url.rsplit(':').next().unwrap_or(url).to_string(),
    };

    path.trim_end_matches('/')
        .rsplit('/')
        .next()
        .map(|name| name.trim_end_matches(".git"))
        .filter(|name| !name.is_empty())
        .map(str::to_string)
}
