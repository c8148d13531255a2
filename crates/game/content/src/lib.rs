//! Level and configuration content for the Jelly core.
//!
//! This crate is the level-loading collaborator: it reads level files and
//! rule tunables from disk and hands normalized values to `jelly-core`:
//! - Level layouts in the JSON `mapRows` format or as RON `LevelDefinition`s
//! - Game configuration (TOML)
//! - Level ordering (current / reset / advance / restart)
//!
//! Content never appears in engine state; the engine only sees the
//! [`jelly_core::LevelDefinition`] and [`jelly_core::GameConfig`] built here.

#[cfg(feature = "loaders")]
pub mod loaders;

#[cfg(feature = "loaders")]
pub use loaders::{ConfigLoader, ContentFactory, LevelLoader, LevelProgression, LoadResult};
