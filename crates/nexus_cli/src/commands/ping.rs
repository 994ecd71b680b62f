//! Ping command - Check the assistant backend.

use anyhow::Result;

use super::workspace::Workspace;
use super::GlobalArgs;

pub async fn execute(global: &GlobalArgs) -> Result<()> {
    let workspace = Workspace::open(global)?;
    let assistant = workspace.assistant(global)?;

    if !assistant.check_connection().await {
        anyhow::bail!("Nexus AI backend unreachable");
    }

    println!("✅ Nexus AI connected");
    Ok(())
}
