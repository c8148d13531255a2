use crate::error::{ErrorSeverity, GameError};
use crate::state::{EntityId, Position};

#[derive(Clone, Copy, Debug, PartialEq, Eq, thiserror::Error)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum DirectionError {
    #[error("({dx}, {dy}) is not a unit cardinal direction")]
    InvalidDirection { dx: i32, dy: i32 },

    #[error("unknown direction symbol {0:?}")]
    UnknownSymbol(char),
}

impl GameError for DirectionError {
    fn severity(&self) -> ErrorSeverity {
        ErrorSeverity::Validation
    }

    fn error_code(&self) -> &'static str {
        match self {
            DirectionError::InvalidDirection { .. } => "DIRECTION_INVALID",
            DirectionError::UnknownSymbol(_) => "DIRECTION_UNKNOWN_SYMBOL",
        }
    }
}

/// One of the four slide directions. North is `+y`, East is `+x`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, strum::Display, strum::EnumIter)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum CardinalDirection {
    North,
    South,
    East,
    West,
}

impl CardinalDirection {
    pub const ALL: [CardinalDirection; 4] = [
        CardinalDirection::North,
        CardinalDirection::South,
        CardinalDirection::East,
        CardinalDirection::West,
    ];

    pub fn delta(self) -> (i32, i32) {
        match self {
            CardinalDirection::North => (0, 1),
            CardinalDirection::South => (0, -1),
            CardinalDirection::East => (1, 0),
            CardinalDirection::West => (-1, 0),
        }
    }

    /// The cell one step from `origin` in this direction.
    pub fn step(self, origin: Position) -> Position {
        let (dx, dy) = self.delta();
        origin.offset(dx, dy)
    }
}

impl TryFrom<(i32, i32)> for CardinalDirection {
    type Error = DirectionError;

    fn try_from((dx, dy): (i32, i32)) -> Result<Self, Self::Error> {
        match (dx, dy) {
            (0, 1) => Ok(CardinalDirection::North),
            (0, -1) => Ok(CardinalDirection::South),
            (1, 0) => Ok(CardinalDirection::East),
            (-1, 0) => Ok(CardinalDirection::West),
            _ => Err(DirectionError::InvalidDirection { dx, dy }),
        }
    }
}

/// Parses swipe-script letters: `U`/`N`, `D`/`S`, `R`/`E`, `L`/`W`, any case.
impl TryFrom<char> for CardinalDirection {
    type Error = DirectionError;

    fn try_from(symbol: char) -> Result<Self, Self::Error> {
        match symbol.to_ascii_uppercase() {
            'U' | 'N' => Ok(CardinalDirection::North),
            'D' | 'S' => Ok(CardinalDirection::South),
            'R' | 'E' => Ok(CardinalDirection::East),
            'L' | 'W' => Ok(CardinalDirection::West),
            _ => Err(DirectionError::UnknownSymbol(symbol)),
        }
    }
}

/// A single move request for one entity, as accepted by
/// `TurnEngine::submit`.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct MoveRequest {
    pub entity: EntityId,
    pub direction: CardinalDirection,
}

impl MoveRequest {
    pub fn new(entity: EntityId, direction: CardinalDirection) -> Self {
        Self { entity, direction }
    }

    /// Builds a request from a raw `(dx, dy)` vector.
    pub fn from_delta(entity: EntityId, delta: (i32, i32)) -> Result<Self, DirectionError> {
        Ok(Self::new(entity, CardinalDirection::try_from(delta)?))
    }
}
