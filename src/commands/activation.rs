//! Shared logic for `enable` and `disable`.

use anyhow::Result;

use workspace_sync::output::emoji;
use workspace_sync::prompt::Prompter;
use workspace_sync::suggestions;

use super::Context;

/// Sets `active` on the chosen workspaces and writes the config back.
///
/// With `all`, every entry is chosen. With no paths, the user picks from the
/// entries currently in the opposite state. Returns the paths that changed.
pub fn set_active(
    ctx: &Context,
    paths: &[String],
    all: bool,
    active: bool,
    prompter: &dyn Prompter,
) -> Result<Vec<String>> {
    let verb = if active { "enable" } else { "disable" };
    let mut config = ctx.load_config()?;

    let chosen: Vec<String> = if all {
        config.workspaces.iter().map(|e| e.path.clone()).collect()
    } else if paths.is_empty() {
        let candidates: Vec<String> = config
            .workspaces
            .iter()
            .filter(|e| e.active != active)
            .map(|e| e.path.clone())
            .collect();
        if candidates.is_empty() {
            println!("Nothing to {}: every workspace is already {}d", verb, verb);
            return Ok(Vec::new());
        }
        prompter
            .multi_select(&format!("Workspaces to {}", verb), &candidates)?
            .into_iter()
            .map(|index| candidates[index].clone())
            .collect()
    } else {
        let unknown: Vec<String> = paths
            .iter()
            .filter(|path| config.find(path).is_none())
            .cloned()
            .collect();
        if !unknown.is_empty() {
            let known: Vec<&str> = config.workspaces.iter().map(|e| e.path.as_str()).collect();
            return Err(suggestions::unknown_workspaces(&unknown, &known));
        }
        paths.to_vec()
    };

    if chosen.is_empty() {
        println!("No workspaces selected");
        return Ok(Vec::new());
    }

    let changed = config.set_active(&chosen, active)?;
    if changed.is_empty() {
        println!("Already {}d, nothing to do", verb);
        return Ok(changed);
    }

    ctx.save_config(&config)?;
    for path in &changed {
        println!("{} {}d {}", emoji(&ctx.out, "✅", "[OK]"), verb, ctx.out.bold(path));
    }
    println!(
        "{} Run `workspace-sync sync` to apply",
        emoji(&ctx.out, "💡", "[HINT]")
    );
    Ok(changed)
}
