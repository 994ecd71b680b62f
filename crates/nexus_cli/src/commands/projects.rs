//! Projects command - Manage the project set.

use std::num::NonZeroU32;

use anyhow::{Context, Result};
use clap::{Args, Subcommand};
use tracing::info;

use nexus_core::{NewProject, Progress, Project, ProjectId, ProjectStatus, ProjectUpdate};

use super::workspace::Workspace;
use super::GlobalArgs;

#[derive(Args)]
pub struct ProjectsArgs {
    #[command(subcommand)]
    command: ProjectsCommand,
}

#[derive(Subcommand)]
enum ProjectsCommand {
    /// List all projects
    List {
        /// Print as JSON
        #[arg(long)]
        json: bool,
    },

    /// Create a project and ask Nexus AI for hints
    Add {
        /// Project name
        name: String,

        /// Short description
        #[arg(short, long)]
        description: Option<String>,

        /// Logo as a data URL or file path
        #[arg(long)]
        logo: Option<String>,

        /// Skip the initial analysis
        #[arg(long)]
        no_hints: bool,
    },

    /// Update fields of a project
    Update {
        /// Project id
        id: u64,

        #[arg(short, long)]
        name: Option<String>,

        /// New description; an empty string clears it
        #[arg(short, long)]
        description: Option<String>,

        /// Completion percentage (0-100)
        #[arg(short, long)]
        progress: Option<i64>,

        /// Team size
        #[arg(short, long)]
        team: Option<u32>,

        /// Due date as displayed, e.g. "Dec 1"
        #[arg(long)]
        due: Option<String>,

        /// active, on-hold, completed or archived
        #[arg(short, long)]
        status: Option<String>,
    },

    /// Delete a project
    Delete {
        /// Project id
        id: u64,
    },

    /// Show dashboard statistics
    Stats,

    /// Show the most recently created projects
    Recent {
        /// How many projects to show
        #[arg(short = 'n', long, default_value_t = 3)]
        count: usize,
    },
}

pub async fn execute(args: ProjectsArgs, global: &GlobalArgs) -> Result<()> {
    let mut workspace = Workspace::open(global)?;

    match args.command {
        ProjectsCommand::List { json } => list(&workspace, json),
        ProjectsCommand::Add {
            name,
            description,
            logo,
            no_hints,
        } => {
            let mut request = NewProject::new(name);
            if let Some(description) = description {
                request = request.with_description(description);
            }
            if let Some(logo) = logo {
                request = request.with_logo(logo);
            }

            let project = workspace
                .registry_mut()
                .create(request)
                .context("Failed to create project")?;
            workspace.persist();
            info!("Created project {} ({})", project.name, project.id);

            println!("✅ Created project \"{}\" (id {})", project.name, project.id);
            println!("   {}", summary(&project));

            if !no_hints {
                let assistant = workspace.assistant(global)?;
                println!();
                println!("{}", analyzing_banner(&project));
                println!();
                let result = assistant.analyze_project(&project).await;
                println!("{}", result.text());
            }
            Ok(())
        }
        ProjectsCommand::Update {
            id,
            name,
            description,
            progress,
            team,
            due,
            status,
        } => {
            let update = ProjectUpdate {
                name,
                description,
                logo: None,
                progress: progress.map(Progress::new).transpose()?,
                team_size: team
                    .map(|t| NonZeroU32::new(t).context("Invalid team size: must be at least 1"))
                    .transpose()?,
                due_date: due,
                status: status.map(|s| s.parse::<ProjectStatus>()).transpose()?,
            };
            if update.is_empty() {
                anyhow::bail!("Nothing to update: pass at least one field argument");
            }

            let project = workspace.registry_mut().update(ProjectId(id), update)?;
            workspace.persist();

            println!("✅ Updated project \"{}\"", project.name);
            println!("   {}", summary(&project));
            Ok(())
        }
        ProjectsCommand::Delete { id } => {
            let project = workspace.registry_mut().delete(ProjectId(id))?;
            workspace.persist();
            println!("🗑️  Deleted project \"{}\"", project.name);
            Ok(())
        }
        ProjectsCommand::Stats => {
            let stats = workspace.registry().stats();
            println!("📊 Projects");
            println!("   Total:            {}", stats.total);
            println!("   Active:           {}", stats.active);
            println!("   Average progress: {}%", stats.average_progress);
            Ok(())
        }
        ProjectsCommand::Recent { count } => {
            let recent = workspace.registry().recent(count);
            if recent.is_empty() {
                println!("No projects yet. Create one with: nexus projects add <name>");
            }
            for project in recent {
                println!("{:>15}  {}", project.id.to_string(), summary(project));
            }
            Ok(())
        }
    }
}

fn list(workspace: &Workspace, json: bool) -> Result<()> {
    let projects = workspace.registry().projects();

    if json {
        println!("{}", serde_json::to_string_pretty(projects)?);
        return Ok(());
    }

    if projects.is_empty() {
        println!("No projects yet. Create one with: nexus projects add <name>");
        return Ok(());
    }

    println!("{:>15}  PROJECT", "ID");
    for project in projects {
        println!("{:>15}  {}", project.id.to_string(), summary(project));
    }
    Ok(())
}

fn analyzing_banner(project: &Project) -> String {
    format!("🎉 Analyzing \"{}\"...", project.name)
}

/// One-line rendering of a project.
fn summary(project: &Project) -> String {
    format!(
        "{} · {}% · team of {} · due {} · {}",
        project.name, project.progress, project.team_size, project.due_date, project.status
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    #[test]
    fn test_summary() {
        let project = Project {
            id: ProjectId(1),
            name: "Launch".to_string(),
            description: None,
            logo: None,
            progress: Progress::new(40).unwrap(),
            team_size: NonZeroU32::new(3).unwrap(),
            due_date: "Dec 1".to_string(),
            status: ProjectStatus::OnHold,
            created_at: Utc::now(),
        };

        assert_eq!(summary(&project), "Launch · 40% · team of 3 · due Dec 1 · on-hold");
        assert_eq!(analyzing_banner(&project), "🎉 Analyzing \"Launch\"...");
    }
}
