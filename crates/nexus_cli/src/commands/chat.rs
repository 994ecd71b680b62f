//! Chat command - Talk to Nexus AI.
//!
//! With a message, runs a single exchange. Without one, reads messages from
//! stdin until EOF or `/quit`, keeping the conversation for the session.

use anyhow::{Context, Result};
use clap::Args;
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};

use nexus_assist::{Assistant, GREETING};
use nexus_core::Project;

use super::workspace::Workspace;
use super::GlobalArgs;

#[derive(Args)]
pub struct ChatArgs {
    /// Project id to use as context
    #[arg(short, long)]
    project: Option<u64>,

    /// Message to send; starts an interactive session when omitted
    message: Vec<String>,
}

pub async fn execute(args: ChatArgs, global: &GlobalArgs) -> Result<()> {
    let workspace = Workspace::open(global)?;
    let project = args.project.map(|id| workspace.project(id)).transpose()?;
    let assistant = workspace.assistant(global)?;

    let message = args.message.join(" ");
    if message.trim().is_empty() {
        return interactive(&assistant, project).await;
    }

    println!("{}", assistant.chat(message.trim(), project).await);
    Ok(())
}

async fn interactive(assistant: &Assistant, project: Option<&Project>) -> Result<()> {
    println!("{}", GREETING);
    if let Some(project) = project {
        println!("Context: \"{}\"", project.name);
    }
    println!("Type /quit to leave.");

    let mut stdout = tokio::io::stdout();
    let mut lines = BufReader::new(tokio::io::stdin()).lines();

    loop {
        stdout.write_all(b"\n> ").await?;
        stdout.flush().await?;

        let Some(line) = lines.next_line().await.context("Failed to read from stdin")? else {
            break;
        };
        match parse_input(&line) {
            None => continue,
            Some(Input::Quit) => break,
            Some(Input::Message(text)) => {
                let reply = assistant.chat(text, project).await;
                println!("\n{}", reply);
            }
        }
    }

    Ok(())
}

#[derive(Debug, PartialEq, Eq)]
enum Input<'a> {
    Message(&'a str),
    Quit,
}

fn parse_input(line: &str) -> Option<Input<'_>> {
    let trimmed = line.trim();
    match trimmed {
        "" => None,
        "/quit" | "/exit" => Some(Input::Quit),
        text => Some(Input::Message(text)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_input() {
        assert_eq!(parse_input("   "), None);
        assert_eq!(parse_input("/quit"), Some(Input::Quit));
        assert_eq!(parse_input(" /exit\n"), Some(Input::Quit));
        assert_eq!(parse_input("  plan my week "), Some(Input::Message("plan my week")));
    }
}
