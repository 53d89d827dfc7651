//! # Disable Command Implementation
//!
//! Marks workspaces inactive. The next `sync` removes their checkouts; the
//! entries stay in the configuration so they can be enabled again.

use anyhow::Result;
use clap::Args;

use workspace_sync::prompt::Prompter;

use super::{activation, Context};

/// Mark workspaces inactive so the next sync removes them
#[derive(Args, Debug)]
pub struct DisableArgs {
    /// Workspace paths to disable. Prompts for a selection when omitted.
    #[arg(value_name = "PATH", conflicts_with = "all")]
    pub paths: Vec<String>,

    /// Disable every configured workspace.
    #[arg(short, long)]
    pub all: bool,
}

pub fn execute(args: DisableArgs, ctx: &Context, prompter: &dyn Prompter) -> Result<()> {
    activation::set_active(ctx, &args.paths, args.all, false, prompter)?;
    Ok(())
}
