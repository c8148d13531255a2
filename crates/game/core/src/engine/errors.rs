//! Error types surfaced by the turn engine.

use crate::action::DirectionError;
use crate::error::{ErrorSeverity, GameError};
use crate::level::LevelError;
use crate::state::{EntityId, GridError, RegistryError};

use super::{LevelResult, TurnPhase};

/// Errors surfaced while driving the engine.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum EngineError {
    #[error("no level is loaded")]
    NoLevelLoaded,

    #[error("level already finished ({0})")]
    LevelFinished(LevelResult),

    #[error("entity {0} is dead and cannot move")]
    EntityNotAlive(EntityId),

    #[error("operation requires phase {expected} but engine is in {actual}")]
    WrongPhase {
        expected: TurnPhase,
        actual: TurnPhase,
    },

    #[error(transparent)]
    Registry(#[from] RegistryError),

    #[error(transparent)]
    Grid(#[from] GridError),

    #[error(transparent)]
    Direction(#[from] DirectionError),

    #[error(transparent)]
    Level(#[from] LevelError),
}

impl GameError for EngineError {
    fn severity(&self) -> ErrorSeverity {
        match self {
            EngineError::Registry(err) => err.severity(),
            // The engine only touches cells it found by walking the grid.
            EngineError::Grid(_) => ErrorSeverity::Internal,
            EngineError::Direction(err) => err.severity(),
            EngineError::Level(err) => err.severity(),
            EngineError::NoLevelLoaded
            | EngineError::LevelFinished(_)
            | EngineError::EntityNotAlive(_)
            | EngineError::WrongPhase { .. } => ErrorSeverity::Validation,
        }
    }

    fn error_code(&self) -> &'static str {
        match self {
            EngineError::NoLevelLoaded => "ENGINE_NO_LEVEL",
            EngineError::LevelFinished(_) => "ENGINE_LEVEL_FINISHED",
            EngineError::EntityNotAlive(_) => "ENGINE_ENTITY_NOT_ALIVE",
            EngineError::WrongPhase { .. } => "ENGINE_WRONG_PHASE",
            EngineError::Registry(err) => err.error_code(),
            EngineError::Grid(err) => err.error_code(),
            EngineError::Direction(err) => err.error_code(),
            EngineError::Level(err) => err.error_code(),
        }
    }
}
