//! Nexus CLI - Main entry point.
//!
//! Exit codes:
//! - 0: Success
//! - 1: General error
//! - 2: Invalid arguments
//! - 3: Project not found
//! - 4: Backend unavailable
//! - 5: Configuration error

use std::process::ExitCode;

use clap::Parser;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

mod commands;

use commands::{Cli, Commands};

/// CI-friendly exit codes
pub struct ExitCodes;

impl ExitCodes {
    pub const SUCCESS: u8 = 0;
    pub const GENERAL_ERROR: u8 = 1;
    pub const INVALID_ARGS: u8 = 2;
    pub const NOT_FOUND: u8 = 3;
    pub const BACKEND_UNAVAILABLE: u8 = 4;
    pub const CONFIG_ERROR: u8 = 5;
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    // Logs go to stderr so command output stays pipeable
    let directives = if cli.global.verbose {
        "nexus=debug,info"
    } else if cli.global.quiet {
        "error"
    } else {
        "nexus=info,warn"
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(directives));
    let log_result = tracing_subscriber::registry()
        .with(fmt::layer().with_target(false).with_writer(std::io::stderr))
        .with(filter)
        .try_init();

    if log_result.is_err() {
        // Logging already initialized, continue
    }

    let global = cli.global;
    let result = match cli.command {
        Commands::Projects(args) => commands::projects::execute(args, &global).await,
        Commands::Hints(args) => commands::hints::execute(args, &global).await,
        Commands::Roadmap(args) => commands::roadmap::execute(args, &global).await,
        Commands::Chat(args) => commands::chat::execute(args, &global).await,
        Commands::Theme(args) => commands::theme::execute(args, &global).await,
        Commands::Ping => commands::ping::execute(&global).await,
        Commands::Reset(args) => commands::reset::execute(args, &global).await,
    };

    match result {
        Ok(()) => ExitCode::from(ExitCodes::SUCCESS),
        Err(e) => {
            let exit_code = categorize_error(&e);
            eprintln!("❌ Error: {:#}", e);
            ExitCode::from(exit_code)
        }
    }
}

/// Categorize error to determine exit code
fn categorize_error(e: &anyhow::Error) -> u8 {
    let msg = format!("{:#}", e).to_lowercase();

    if msg.contains("not found") {
        ExitCodes::NOT_FOUND
    } else if msg.contains("unreachable") || msg.contains("backend") {
        ExitCodes::BACKEND_UNAVAILABLE
    } else if msg.contains("configuration") || msg.contains("settings") {
        ExitCodes::CONFIG_ERROR
    } else if msg.contains("invalid")
        || msg.contains("unknown")
        || msg.contains("argument")
        || msg.contains("must be")
    {
        ExitCodes::INVALID_ARGS
    } else {
        ExitCodes::GENERAL_ERROR
    }
}
