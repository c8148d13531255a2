//! Game configuration loader.

use std::path::Path;

use anyhow::{Context, bail};
use jelly_core::GameConfig;

use crate::loaders::{LoadResult, read_file};

/// Loader for game configuration from TOML files.
///
/// Missing keys keep their [`GameConfig::default`] values.
pub struct ConfigLoader;

impl ConfigLoader {
    /// Load config data from a TOML file.
    pub fn load(path: &Path) -> LoadResult<GameConfig> {
        let content = read_file(path)?;
        Self::from_toml_str(&content)
            .with_context(|| format!("Failed to load config {}", path.display()))
    }

    pub fn from_toml_str(content: &str) -> LoadResult<GameConfig> {
        let config: GameConfig =
            toml::from_str(content).context("Failed to parse config TOML")?;
        if config.crit_multiplier < 1 {
            bail!(
                "crit_multiplier must be at least 1 (got {})",
                config.crit_multiplier
            );
        }
        // Negative damage would heal through the registry's subtraction.
        for (key, value) in [
            ("base_damage", config.base_damage),
            ("trap_damage", config.trap_damage),
        ] {
            if value < 0 {
                bail!("{} must not be negative (got {})", key, value);
            }
        }
        Ok(config)
    }
}
