//! Content loaders for reading game data from files.
//!
//! Levels come as JSON (`mapRows` code grids) or RON; configuration comes as
//! TOML. Every loader returns [`LoadResult`] with the offending path in the
//! error context.

pub mod config;
pub mod factory;
pub mod level;
pub mod progression;

pub use config::ConfigLoader;
pub use factory::ContentFactory;
pub use level::LevelLoader;
pub use progression::LevelProgression;

use std::path::Path;

use anyhow::Context;

/// Common result type for loaders.
pub type LoadResult<T> = anyhow::Result<T>;

/// Helper function to read file contents.
pub(crate) fn read_file(path: &Path) -> LoadResult<String> {
    std::fs::read_to_string(path).with_context(|| format!("Failed to read file {}", path.display()))
}
