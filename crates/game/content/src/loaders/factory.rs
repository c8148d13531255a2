//! Content factory for loading levels and configuration from a data directory.

use std::path::{Path, PathBuf};

use anyhow::Context;
use jelly_core::{GameConfig, LevelDefinition};
use tracing::debug;

use crate::loaders::{ConfigLoader, LevelLoader, LoadResult};

/// Content factory that loads all game content from a data directory.
///
/// # Directory Structure
///
/// ```text
/// data_dir/
/// ├── config.toml
/// └── levels/
///     ├── level_1.json
///     ├── level_2.json
///     └── level_3.ron
/// ```
///
/// A level number resolves to `level_{n}.json`, falling back to `level_{n}.ron`.
#[derive(Clone, Debug)]
pub struct ContentFactory {
    data_dir: PathBuf,
}

impl ContentFactory {
    /// Creates a new content factory pointing to a data directory.
    pub fn new(data_dir: impl Into<PathBuf>) -> Self {
        Self {
            data_dir: data_dir.into(),
        }
    }

    /// Load game configuration from `config.toml`.
    pub fn load_config(&self) -> LoadResult<GameConfig> {
        ConfigLoader::load(&self.config_path())
    }

    /// Like [`ContentFactory::load_config`], but a missing file yields the defaults.
    pub fn load_config_or_default(&self) -> LoadResult<GameConfig> {
        let path = self.config_path();
        if !path.exists() {
            debug!(path = %path.display(), "no config file, using defaults");
            return Ok(GameConfig::default());
        }
        ConfigLoader::load(&path)
    }

    /// Path of level `number`, or `None` when neither format exists.
    pub fn level_path(&self, number: u32) -> Option<PathBuf> {
        let levels = self.data_dir.join("levels");
        ["json", "ron"]
            .into_iter()
            .map(|ext| levels.join(format!("level_{number}.{ext}")))
            .find(|path| path.is_file())
    }

    pub fn has_level(&self, number: u32) -> bool {
        self.level_path(number).is_some()
    }

    /// Number of consecutive levels starting at 1.
    pub fn level_count(&self) -> u32 {
        (1..).take_while(|number| self.has_level(*number)).count() as u32
    }

    /// Load level `number` and check its spawns against `config`.
    pub fn load_level(&self, number: u32, config: &GameConfig) -> LoadResult<LevelDefinition> {
        let path = self.level_path(number).with_context(|| {
            format!(
                "Level {} not found under {}",
                number,
                self.data_dir.join("levels").display()
            )
        })?;
        let level = LevelLoader::load(&path)?;
        level
            .resolve_spawns(config)
            .with_context(|| format!("Invalid level {}", path.display()))?;
        Ok(level)
    }

    fn config_path(&self) -> PathBuf {
        self.data_dir.join("config.toml")
    }

    /// Returns the data directory path.
    pub fn data_dir(&self) -> &Path {
        &self.data_dir
    }
}
