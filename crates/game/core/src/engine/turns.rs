use crate::resolve::{CombatOutcome, SlideResult};
use crate::state::EntityId;

/// Where the engine is in the turn cycle.
///
/// ```text
/// AwaitingLevel -> PlayerTurn -> ResolvingPlayerMoves -> EnemyTurn
///     -> ResolvingEnemyMoves -> PlayerTurn | Won | Lost
/// ```
/// `Won` or `Lost` may also follow `ResolvingPlayerMoves` directly.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Default, strum::Display)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum TurnPhase {
    #[default]
    AwaitingLevel,
    PlayerTurn,
    ResolvingPlayerMoves,
    EnemyTurn,
    ResolvingEnemyMoves,
    Won,
    Lost,
}

impl TurnPhase {
    pub fn is_finished(self) -> bool {
        matches!(self, TurnPhase::Won | TurnPhase::Lost)
    }
}

/// Terminal outcome of a level.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, strum::Display)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum LevelResult {
    Won,
    Lost,
}

impl From<LevelResult> for TurnPhase {
    fn from(result: LevelResult) -> Self {
        match result {
            LevelResult::Won => TurnPhase::Won,
            LevelResult::Lost => TurnPhase::Lost,
        }
    }
}

/// One committed move: the slide and everything it caused.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct MoveOutcome {
    pub entity: EntityId,
    pub slide: SlideResult,
    pub combat: CombatOutcome,
}

/// Everything that happened during one faction's half of a turn.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct TurnReport {
    /// Moves in processing order (ascending entity id).
    pub outcomes: Vec<MoveOutcome>,
    /// Phase the engine ended up in.
    pub phase: TurnPhase,
    /// Set when this turn decided the level.
    pub result: Option<LevelResult>,
}

impl TurnReport {
    pub fn is_finished(&self) -> bool {
        self.result.is_some()
    }

    /// Appends a later report, keeping its phase and result.
    pub fn merge(&mut self, later: TurnReport) {
        self.outcomes.extend(later.outcomes);
        self.phase = later.phase;
        self.result = later.result;
    }

    /// Entities killed during this turn, in resolution order.
    pub fn kills(&self) -> Vec<EntityId> {
        self.outcomes
            .iter()
            .flat_map(|outcome| outcome.combat.kills())
            .collect()
    }
}
