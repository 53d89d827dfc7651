//! CLI argument parsing and command dispatch

use std::path::PathBuf;

use anyhow::Result;
use clap::builder::TypedValueParser;
use clap::{Parser, Subcommand};
use env_logger::Env;

use workspace_sync::defaults::{DEFAULT_CONCURRENCY, DEFAULT_CONFIG_FILENAME};
use workspace_sync::output::OutputConfig;
use workspace_sync::prompt::DialoguerPrompter;

use crate::commands::{self, Context};

/// Workspace Sync - Keep git submodule workspaces in line with workspaces.yaml
#[derive(Parser, Debug)]
#[command(name = "workspace-sync")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Subcommand to execute
    #[command(subcommand)]
    command: Commands,

    /// Path to the workspace configuration file, relative to the workspace
    /// root unless absolute.
    #[arg(
        short,
        long,
        global = true,
        value_name = "FILE",
        env = "WORKSPACE_SYNC_CONFIG",
        default_value = DEFAULT_CONFIG_FILENAME
    )]
    config: PathBuf,

    /// Directory the workspace paths are relative to. Defaults to the
    /// current directory.
    #[arg(short, long, global = true, value_name = "DIR", env = "WORKSPACE_SYNC_ROOT")]
    workspace_root: Option<PathBuf>,

    /// Log every git and go invocation.
    #[arg(long, global = true)]
    debug: bool,

    /// Number of workspaces processed at the same time.
    #[arg(
        long,
        global = true,
        value_name = "N",
        default_value_t = DEFAULT_CONCURRENCY,
        value_parser = clap::value_parser!(u16).range(1..).map(usize::from)
    )]
    concurrency: usize,

    /// Colorize output (always, never, auto)
    #[arg(
        long,
        global = true,
        value_name = "WHEN",
        default_value = "auto",
        value_parser = ["auto", "always", "never"]
    )]
    color: String,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Reconcile the workspace root with the configuration
    Sync(commands::sync::SyncArgs),

    /// Pull the latest changes into every checked-out workspace
    Update(commands::update::UpdateArgs),

    /// Show the state of every active workspace
    Status(commands::status::StatusArgs),

    /// Add a repository to the configuration
    Add(commands::add::AddArgs),

    /// Mark workspaces active so the next sync checks them out
    Enable(commands::enable::EnableArgs),

    /// Mark workspaces inactive so the next sync removes them
    Disable(commands::disable::DisableArgs),

    /// Write the branches currently checked out back into the configuration
    Save(commands::save::SaveArgs),

    /// Generate shell completion scripts
    Completions(commands::completions::CompletionsArgs),
}

impl Cli {
    /// Execute the CLI command
    pub fn execute(self) -> Result<()> {
        let level = if self.debug { "debug" } else { "info" };
        // A second init (e.g. from an embedding test harness) is harmless.
        let _ = env_logger::Builder::from_env(Env::default().default_filter_or(level))
            .format_timestamp(None)
            .format_target(false)
            .try_init();

        let workspace_root = match self.workspace_root {
            Some(root) => root,
            None => std::env::current_dir()?,
        };
        let ctx = Context::new(
            workspace_root,
            &self.config,
            self.concurrency,
            OutputConfig::from_env_and_flag(&self.color),
        );
        let prompter = DialoguerPrompter::new();

        match self.command {
            Commands::Sync(args) => commands::sync::execute(args, &ctx),
            Commands::Update(args) => commands::update::execute(args, &ctx),
            Commands::Status(args) => commands::status::execute(args, &ctx),
            Commands::Add(args) => commands::add::execute(args, &ctx, &prompter),
            Commands::Enable(args) => commands::enable::execute(args, &ctx, &prompter),
            Commands::Disable(args) => commands::disable::execute(args, &ctx, &prompter),
            Commands::Save(args) => commands::save::execute(args, &ctx, &prompter),
            Commands::Completions(args) => commands::completions::execute(args),
        }
    }
}
