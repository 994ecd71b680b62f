//! Reset command - Delete all stored data.

use anyhow::Result;
use clap::Args;
use tracing::info;

use super::workspace::Workspace;
use super::GlobalArgs;

#[derive(Args)]
pub struct ResetArgs {
    /// Confirm deletion of every project and preference
    #[arg(long)]
    yes: bool,
}

pub async fn execute(args: ResetArgs, global: &GlobalArgs) -> Result<()> {
    let workspace = Workspace::open(global)?;

    if !args.yes {
        anyhow::bail!(
            "Refusing to delete {} projects without confirmation argument --yes",
            workspace.registry().len()
        );
    }

    if !workspace.storage().clear_all() {
        anyhow::bail!("Some stored data could not be removed from {:?}", workspace.root());
    }

    info!("Cleared workspace store at {:?}", workspace.root());
    println!("🧹 All projects and preferences deleted");
    Ok(())
}
