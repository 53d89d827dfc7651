//! # Enable Command Implementation
//!
//! Marks workspaces active. The next `sync` checks them out.

use anyhow::Result;
use clap::Args;

use workspace_sync::prompt::Prompter;

use super::{activation, Context};

/// Mark workspaces active so the next sync checks them out
#[derive(Args, Debug)]
pub struct EnableArgs {
    /// Workspace paths to enable. Prompts for a selection when omitted.
    #[arg(value_name = "PATH", conflicts_with = "all")]
    pub paths: Vec<String>,

    /// Enable every configured workspace.
    #[arg(short, long)]
    pub all: bool,
}

pub fn execute(args: EnableArgs, ctx: &Context, prompter: &dyn Prompter) -> Result<()> {
    activation::set_active(ctx, &args.paths, args.all, true, prompter)?;
    Ok(())
}
