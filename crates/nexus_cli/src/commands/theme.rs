//! Theme command - Show or change the dashboard theme.

use anyhow::Result;
use clap::{Args, ValueEnum};

use nexus_core::Theme;

use super::workspace::Workspace;
use super::GlobalArgs;

#[derive(Args)]
pub struct ThemeArgs {
    /// Theme to switch to; shows the current theme when omitted
    #[arg(value_enum)]
    theme: Option<ThemeChoice>,

    /// Switch to the other theme
    #[arg(long, conflicts_with = "theme")]
    toggle: bool,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum ThemeChoice {
    Dark,
    Light,
}

impl From<ThemeChoice> for Theme {
    fn from(choice: ThemeChoice) -> Self {
        match choice {
            ThemeChoice::Dark => Theme::Dark,
            ThemeChoice::Light => Theme::Light,
        }
    }
}

pub async fn execute(args: ThemeArgs, global: &GlobalArgs) -> Result<()> {
    let workspace = Workspace::open(global)?;
    let storage = workspace.storage();
    let current = storage.load_theme();

    let next = match (args.theme, args.toggle) {
        (Some(choice), _) => Theme::from(choice),
        (None, true) => current.toggled(),
        (None, false) => {
            println!("{}", current.as_str());
            return Ok(());
        }
    };

    let mut settings = storage.load_settings();
    settings.dark_mode = next == Theme::Dark;
    if !(storage.save_theme(next) && storage.save_settings(&settings)) {
        anyhow::bail!("Failed to save theme preference");
    }

    println!("🎨 Theme set to {}", next.as_str());
    Ok(())
}
