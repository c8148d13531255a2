//! Level ordering.

use jelly_core::{GameConfig, LevelDefinition};
use tracing::info;

use crate::loaders::{ContentFactory, LoadResult};

/// Tracks which numbered level is current and loads levels on demand.
///
/// Every call returns a freshly loaded [`LevelDefinition`], so replaying a
/// level always starts from the file contents rather than a mutated board.
#[derive(Clone, Debug)]
pub struct LevelProgression {
    factory: ContentFactory,
    config: GameConfig,
    current: u32,
}

impl LevelProgression {
    pub const FIRST_LEVEL: u32 = 1;

    pub fn new(factory: ContentFactory, config: GameConfig) -> Self {
        Self::starting_at(factory, config, Self::FIRST_LEVEL)
    }

    pub fn starting_at(factory: ContentFactory, config: GameConfig, level: u32) -> Self {
        Self {
            factory,
            config,
            current: level.max(Self::FIRST_LEVEL),
        }
    }

    /// Number of the current level.
    pub fn current_number(&self) -> u32 {
        self.current
    }

    pub fn config(&self) -> &GameConfig {
        &self.config
    }

    /// Loads the current level.
    pub fn current(&self) -> LoadResult<LevelDefinition> {
        self.factory.load_level(self.current, &self.config)
    }

    /// Reloads the current level from disk.
    pub fn reset(&self) -> LoadResult<LevelDefinition> {
        info!(level = self.current, "resetting level");
        self.current()
    }

    pub fn has_next(&self) -> bool {
        self.factory.has_level(self.current + 1)
    }

    /// Moves to the next level. Returns `None`, and stays put, when there is none.
    pub fn advance(&mut self) -> LoadResult<Option<LevelDefinition>> {
        if !self.has_next() {
            info!(level = self.current, "no further levels");
            return Ok(None);
        }
        let level = self.factory.load_level(self.current + 1, &self.config)?;
        self.current += 1;
        info!(level = self.current, "advanced to next level");
        Ok(Some(level))
    }

    /// Goes back to the first level.
    pub fn restart(&mut self) -> LoadResult<LevelDefinition> {
        let level = self
            .factory
            .load_level(Self::FIRST_LEVEL, &self.config)?;
        self.current = Self::FIRST_LEVEL;
        info!("restarted from the first level");
        Ok(level)
    }
}
