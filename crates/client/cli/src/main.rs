//! `jelly` command-line host for the slide-and-collision engine.
//!
//! Loads levels from a content directory, plays scripted move sequences
//! through [`jelly_core::TurnEngine`] and prints the resulting boards.
mod commands;
mod config;
mod logging;
mod render;
mod sink;

use anyhow::Result;
use clap::{Parser, Subcommand};

use crate::commands::{InspectCommand, ListCommand, PlayCommand};
use crate::config::CliConfig;

#[derive(Parser)]
#[command(name = "jelly")]
#[command(about = "Grid slide-and-collision puzzle engine", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Play a level with a scripted move sequence
    Play(PlayCommand),
    /// Show a level without playing it
    Inspect(InspectCommand),
    /// List levels in a data directory
    List(ListCommand),
}

fn main() -> Result<()> {
    // Load .env file if present (silently ignore if not found)
    let _ = dotenvy::dotenv();

    let cli = Cli::parse();
    let config = CliConfig::from_env();
    let _log_guard = logging::setup_logging(&config)?;

    match cli.command {
        Commands::Play(cmd) => cmd.execute(&config),
        Commands::Inspect(cmd) => cmd.execute(&config),
        Commands::List(cmd) => cmd.execute(&config),
    }
}
