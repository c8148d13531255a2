//! Deterministic rules core for the Jelly slide-and-collision game.
//!
//! `jelly-core` owns the board (grid and entity registry), resolves slides and
//! collisions, and sequences player and enemy turns. Rendering, input and
//! persistence live elsewhere: hosts feed a [`LevelDefinition`] into a
//! [`TurnEngine`], submit directions, and consume the returned outcomes or
//! the [`GameEvent`] stream.
pub mod action;
pub mod config;
pub mod engine;
pub mod error;
pub mod events;
pub mod level;
pub mod resolve;
pub mod state;

pub use action::{CardinalDirection, DirectionError, MoveRequest};
pub use config::GameConfig;
pub use engine::{EngineError, LevelResult, MoveOutcome, TurnEngine, TurnPhase, TurnReport};
pub use error::{ErrorSeverity, GameError};
pub use events::{EventSink, GameEvent, NullSink};
pub use level::{LevelDefinition, LevelError, ResolvedSpawn, SpawnSpec};
pub use resolve::{
    CombatContext, CombatOutcome, ReactionGuard, SlideResult, StopCause, TrapHit,
    resolve_collision, resolve_slide, resolve_slide_bounded,
};
pub use state::{
    CellType, EntityId, EntityRecord, EntityRegistry, Faction, Grid, GridError, MotionState,
    Position, RegistryError, compute_state_digest,
};
