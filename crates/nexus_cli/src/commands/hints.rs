//! Hints command - Smart hints for a project.

use anyhow::Result;
use clap::Args;
use tracing::info;

use super::workspace::Workspace;
use super::GlobalArgs;

#[derive(Args)]
pub struct HintsArgs {
    /// Project id
    id: u64,
}

pub async fn execute(args: HintsArgs, global: &GlobalArgs) -> Result<()> {
    let workspace = Workspace::open(global)?;
    let project = workspace.project(args.id)?;
    let assistant = workspace.assistant(global)?;

    info!("Generating hints for {}", project.name);
    let result = assistant.generate_hints_outcome(project).await;
    if result.is_fallback() && !global.quiet {
        eprintln!("⚠️  Nexus AI backend unavailable, showing offline hints");
    }
    println!("{}", result.text());

    Ok(())
}
