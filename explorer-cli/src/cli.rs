use std::{
    fs,
    io::{self, Read},
    path::PathBuf,
};

use anyhow::Context;
use clap::{Parser, Subcommand};
use explorer_core::{Config, TravelInfo, fetch_brief, parse_travel_info, provider_from_config};
use inquire::{Password, PasswordDisplayMode, Text};
use tracing::debug;

use crate::render;

/// Top-level CLI struct.
#[derive(Debug, Parser)]
#[command(name = "explorer", version, about = "AI-powered travel brief")]
pub struct Cli {
    /// Log debug output to stderr (RUST_LOG takes precedence).
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Store the Gemini API key and model.
    Configure,

    /// Fetch a travel brief for a location.
    Show {
        /// City, region or landmark.
        location: String,

        /// Print the brief as JSON.
        #[arg(long)]
        json: bool,

        /// Also list the sources the answer was grounded on.
        #[arg(long)]
        sources: bool,
    },

    /// Parse a markdown brief from a file (or stdin) without calling the API.
    Parse {
        /// Markdown file; stdin when omitted.
        file: Option<PathBuf>,

        /// Print the parsed data as JSON.
        #[arg(long)]
        json: bool,
    },
}

impl Cli {
    pub async fn run(self) -> anyhow::Result<()> {
        match self.command {
            Command::Configure => configure()?,
            Command::Show {
                location,
                json,
                sources,
            } => {
                let config = Config::load_with_env()?;
                let provider = provider_from_config(&config)?;
                debug!(model = config.model(), "provider ready");

                let brief = fetch_brief(provider.as_ref(), &location).await?;

                if json {
                    println!("{}", serde_json::to_string_pretty(&brief)?);
                } else {
                    print!("{}", render::brief(&brief, sources));
                }
            }
            Command::Parse { file, json } => {
                let markdown = read_input(file.as_ref())?;
                let info: TravelInfo = parse_travel_info(&markdown);

                if json {
                    println!("{}", serde_json::to_string_pretty(&info)?);
                } else {
                    print!("{}", render::travel_info(&info));
                }
            }
        }

        Ok(())
    }
}

fn configure() -> anyhow::Result<()> {
    let mut config = Config::load()?;

    let api_key = Password::new("Gemini API key:")
        .without_confirmation()
        .with_display_mode(PasswordDisplayMode::Masked)
        .prompt()?;
    if !api_key.trim().is_empty() {
        config.set_api_key(api_key.trim().to_string());
    }

    let model = Text::new("Model:").with_default(config.model()).prompt()?;
    config.model = Some(model.trim().to_string()).filter(|m| !m.is_empty());

    config.save()?;
    println!("Saved configuration to {}", Config::config_file_path()?.display());

    Ok(())
}

fn read_input(file: Option<&PathBuf>) -> anyhow::Result<String> {
    match file {
        Some(path) => fs::read_to_string(path)
            .with_context(|| format!("Failed to read {}", path.display())),
        None => {
            let mut buf = String::new();
            io::stdin()
                .read_to_string(&mut buf)
                .context("Failed to read markdown from stdin")?;
            Ok(buf)
        }
    }
}
