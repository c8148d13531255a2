//! Subcommands.
mod inspect;
mod list;
mod play;

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Args;
use jelly_content::{ContentFactory, LevelLoader, LevelProgression};
use jelly_core::{GameConfig, LevelDefinition};

use crate::config::CliConfig;

pub use inspect::InspectCommand;
pub use list::ListCommand;
pub use play::PlayCommand;

/// Output format for command results.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, clap::ValueEnum)]
pub enum OutputFormat {
    /// Human-readable board and roster
    #[default]
    Summary,
    /// Machine-readable JSON
    Json,
}

/// Where the content comes from: a data directory, or a single level file.
#[derive(Args, Clone, Debug)]
pub struct LevelSource {
    /// Content directory (config.toml + levels/). Falls back to JELLY_DATA_DIR, then ./data
    #[arg(short, long, value_name = "DIR")]
    pub data: Option<PathBuf>,

    /// Level number inside the data directory
    #[arg(short, long, value_name = "N", default_value_t = 1, conflicts_with = "level_file")]
    pub level: u32,

    /// Load a single level file (.json or .ron) instead of a numbered level
    #[arg(long, value_name = "PATH")]
    pub level_file: Option<PathBuf>,
}

/// Loaded content for a command run.
pub struct LoadedContent {
    pub config: GameConfig,
    pub level: LevelDefinition,
    /// Present when levels come from a numbered data directory.
    pub progression: Option<LevelProgression>,
}

impl LevelSource {
    pub fn factory(&self, cli: &CliConfig) -> ContentFactory {
        ContentFactory::new(cli.resolve_data_dir(self.data.clone()))
    }

    pub fn load(&self, cli: &CliConfig) -> Result<LoadedContent> {
        let factory = self.factory(cli);
        let config = factory
            .load_config_or_default()
            .context("Failed to load game configuration")?;

        if let Some(path) = &self.level_file {
            let level = LevelLoader::load(path)?;
            return Ok(LoadedContent {
                config,
                level,
                progression: None,
            });
        }

        let progression = LevelProgression::starting_at(factory, config.clone(), self.level);
        let level = progression.current()?;
        Ok(LoadedContent {
            config,
            level,
            progression: Some(progression),
        })
    }
}
