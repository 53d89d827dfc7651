//! # Workspace Sync CLI
//!
//! This is the binary entry point for the `workspace-sync` command-line tool.
//!
//! Its responsibilities are parsing arguments with `clap`, dispatching to the
//! selected command, and turning any error into a message on stderr and a
//! non-zero exit code. The reconciliation logic itself lives in the
//! `workspace_sync` library crate.

mod cli;
mod commands;

use anyhow::Result;
use clap::Parser;

fn main() -> Result<()> {
    let cli = cli::Cli::parse();
    cli.execute()
}
