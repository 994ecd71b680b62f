//! Roadmap command - Five-phase roadmap for a project.

use anyhow::Result;
use clap::Args;
use tracing::info;

use super::workspace::Workspace;
use super::GlobalArgs;

#[derive(Args)]
pub struct RoadmapArgs {
    /// Project id
    id: u64,
}

pub async fn execute(args: RoadmapArgs, global: &GlobalArgs) -> Result<()> {
    let workspace = Workspace::open(global)?;
    let project = workspace.project(args.id)?;
    let assistant = workspace.assistant(global)?;

    info!("Generating roadmap for {}", project.name);
    println!("🗺️  Roadmap for \"{}\"", project.name);
    println!();
    println!("{}", assistant.generate_roadmap(project).await);

    Ok(())
}
