//! CLI command definitions.
//!
//! This module defines the command structure for the Nexus CLI.
//! Each subcommand maps to one dashboard action.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

pub mod chat;
pub mod hints;
pub mod ping;
pub mod projects;
pub mod reset;
pub mod roadmap;
pub mod theme;
pub mod workspace;

/// Nexus - project dashboard with an AI assistant
#[derive(Parser)]
#[command(name = "nexus")]
#[command(version, about = "Nexus - project dashboard with an AI assistant")]
#[command(long_about = r#"
Nexus tracks projects and pairs them with an AI assistant that gives
hints, answers questions and drafts roadmaps. When the assistant backend
is unreachable every command still answers with local fallback text.

COMMANDS:
  projects   → List, add, update and delete projects
  hints      → Smart hints for a project
  roadmap    → Five-phase roadmap for a project
  chat       → Talk to Nexus AI (interactive without a message)
  theme      → Show or change the dashboard theme
  ping       → Check the assistant backend
  reset      → Delete all stored data

EXIT CODES:
  0 - Success
  1 - General error
  2 - Invalid arguments
  3 - Project not found
  4 - Backend unavailable
  5 - Configuration error
"#)]
#[command(propagate_version = true)]
pub struct Cli {
    #[command(flatten)]
    pub global: GlobalArgs,

    #[command(subcommand)]
    pub command: Commands,
}

/// Options shared by every command.
#[derive(Args, Debug, Clone)]
pub struct GlobalArgs {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Suppress non-essential output
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Workspace holding `.nexus/` (defaults to current directory)
    #[arg(short, long, global = true, env = "NEXUS_WORKSPACE")]
    pub workspace: Option<PathBuf>,

    /// Assistant backend base URL
    #[arg(long, global = true)]
    pub api_url: Option<String>,

    /// Never contact the backend; always use local fallback text
    #[arg(long, global = true)]
    pub offline: bool,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Manage projects
    Projects(projects::ProjectsArgs),

    /// Generate smart hints for a project
    Hints(hints::HintsArgs),

    /// Generate a roadmap for a project
    Roadmap(roadmap::RoadmapArgs),

    /// Chat with Nexus AI
    Chat(chat::ChatArgs),

    /// Show or change the theme
    Theme(theme::ThemeArgs),

    /// Check whether the assistant backend is reachable
    Ping,

    /// Delete all stored projects and preferences
    Reset(reset::ResetArgs),
}
