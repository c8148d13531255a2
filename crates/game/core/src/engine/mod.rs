//! Turn orchestration.
//!
//! [`TurnEngine`] owns the grid and registry of the loaded level and is the
//! only place either is mutated. Every public entry point runs to completion
//! before returning: a move is committed once its slide and all of its combat
//! side effects are resolved, and there is no rollback.

pub mod ai;
mod errors;
mod turns;

pub use errors::EngineError;
pub use turns::{LevelResult, MoveOutcome, TurnPhase, TurnReport};

use tracing::{debug, info};

use crate::action::{CardinalDirection, MoveRequest};
use crate::config::GameConfig;
use crate::events::{EventSink, GameEvent, NullSink};
use crate::level::LevelDefinition;
use crate::resolve::{CombatContext, ReactionGuard, resolve_collision, resolve_slide};
use crate::state::{EntityId, EntityRegistry, Faction, Grid, MotionState, compute_state_digest};

/// Buffers every event and forwards it to the attached observer.
struct EventBus {
    buffer: Vec<GameEvent>,
    observer: Box<dyn EventSink + Send>,
}

impl Default for EventBus {
    fn default() -> Self {
        Self {
            buffer: Vec::new(),
            observer: Box::new(NullSink),
        }
    }
}

impl EventSink for EventBus {
    fn on_event(&mut self, event: &GameEvent) {
        self.observer.on_event(event);
        self.buffer.push(event.clone());
    }
}

/// Board of the currently loaded level.
struct Board {
    level_id: u32,
    grid: Grid,
    registry: EntityRegistry,
}

/// Drives a level from load to win or loss.
///
/// ```
/// use jelly_core::{CardinalDirection, GameConfig, LevelDefinition, TurnEngine, TurnPhase};
///
/// let level = LevelDefinition::from_ascii(1, &["P..E#"]).unwrap();
/// let mut engine = TurnEngine::new(GameConfig::default());
/// engine.init_level(&level).unwrap();
///
/// let report = engine.play_round(CardinalDirection::East).unwrap();
/// assert_eq!(report.outcomes[0].combat.damage_dealt, 2);
/// assert_eq!(engine.phase(), TurnPhase::PlayerTurn);
/// ```
#[derive(Default)]
pub struct TurnEngine {
    config: GameConfig,
    board: Option<Board>,
    phase: TurnPhase,
    turn: u32,
    events: EventBus,
}

impl TurnEngine {
    pub fn new(config: GameConfig) -> Self {
        Self {
            config,
            ..Self::default()
        }
    }

    /// Attaches an observer that sees every event as it is emitted.
    pub fn with_event_sink(mut self, sink: Box<dyn EventSink + Send>) -> Self {
        self.events.observer = sink;
        self
    }

    /// Replaces the observer. `None` detaches it; events are still buffered.
    pub fn set_event_sink(&mut self, sink: Option<Box<dyn EventSink + Send>>) {
        self.events.observer = sink.unwrap_or_else(|| Box::new(NullSink));
    }

    pub fn config(&self) -> &GameConfig {
        &self.config
    }

    pub fn phase(&self) -> TurnPhase {
        self.phase
    }

    /// Completed player/enemy rounds since the level was loaded.
    pub fn turn_number(&self) -> u32 {
        self.turn
    }

    pub fn level_id(&self) -> Option<u32> {
        self.board.as_ref().map(|board| board.level_id)
    }

    pub fn grid(&self) -> Result<&Grid, EngineError> {
        Ok(&self.board()?.grid)
    }

    pub fn registry(&self) -> Result<&EntityRegistry, EngineError> {
        Ok(&self.board()?.registry)
    }

    fn board(&self) -> Result<&Board, EngineError> {
        self.board.as_ref().ok_or(EngineError::NoLevelLoaded)
    }

    /// Validates `level` and replaces the current board with it.
    ///
    /// On failure the previous board and phase are left untouched.
    pub fn init_level(&mut self, level: &LevelDefinition) -> Result<(), EngineError> {
        let (grid, registry) = level.build(&self.config)?;
        info!(
            level = level.id,
            width = grid.width(),
            height = grid.height(),
            entities = registry.len(),
            "level loaded"
        );
        self.board = Some(Board {
            level_id: level.id,
            grid,
            registry,
        });
        self.turn = 0;
        self.set_phase(TurnPhase::PlayerTurn);
        Ok(())
    }

    /// Drops the current board and waits for the next level.
    pub fn unload_level(&mut self) {
        if let Some(mut board) = self.board.take() {
            board.registry.clear();
        }
        self.set_phase(TurnPhase::AwaitingLevel);
    }

    /// Slides one entity and resolves everything it causes.
    ///
    /// Works in any unfinished phase; the turn methods use it for each
    /// entity they move.
    pub fn request_move(
        &mut self,
        entity: EntityId,
        direction: CardinalDirection,
    ) -> Result<Vec<MoveOutcome>, EngineError> {
        self.ensure_playable()?;
        let outcome = self.commit_move(entity, direction)?;
        Ok(vec![outcome])
    }

    /// Runs a validated [`MoveRequest`] through [`TurnEngine::request_move`].
    pub fn submit(&mut self, request: MoveRequest) -> Result<Vec<MoveOutcome>, EngineError> {
        self.request_move(request.entity, request.direction)
    }

    /// Like [`TurnEngine::request_move`] but takes a raw `(dx, dy)` vector.
    pub fn request_move_delta(
        &mut self,
        entity: EntityId,
        delta: (i32, i32),
    ) -> Result<Vec<MoveOutcome>, EngineError> {
        self.submit(MoveRequest::from_delta(entity, delta)?)
    }

    fn ensure_playable(&self) -> Result<(), EngineError> {
        if self.board.is_none() {
            return Err(EngineError::NoLevelLoaded);
        }
        match self.phase {
            TurnPhase::Won => Err(EngineError::LevelFinished(LevelResult::Won)),
            TurnPhase::Lost => Err(EngineError::LevelFinished(LevelResult::Lost)),
            _ => Ok(()),
        }
    }

    fn ensure_phase(&self, expected: TurnPhase) -> Result<(), EngineError> {
        self.ensure_playable()?;
        if self.phase != expected {
            return Err(EngineError::WrongPhase {
                expected,
                actual: self.phase,
            });
        }
        Ok(())
    }

    fn commit_move(
        &mut self,
        entity: EntityId,
        direction: CardinalDirection,
    ) -> Result<MoveOutcome, EngineError> {
        let Some(board) = self.board.as_mut() else {
            return Err(EngineError::NoLevelLoaded);
        };
        let record = board.registry.get(entity)?;
        if !record.is_alive() {
            return Err(EngineError::EntityNotAlive(entity));
        }
        let start = record.position;

        board.registry.set_motion(entity, MotionState::Sliding)?;
        let slide = resolve_slide(&board.grid, &board.registry, start, direction, entity);
        board.registry.set_position(entity, slide.final_position)?;
        self.events.on_event(&GameEvent::MoveResolved {
            entity,
            from: start,
            to: slide.final_position,
            stop_cause: slide.stop_cause,
        });

        let mut guard = ReactionGuard::new();
        let mut ctx = CombatContext {
            grid: &mut board.grid,
            registry: &mut board.registry,
            config: &self.config,
            events: &mut self.events,
            guard: &mut guard,
        };
        let combat = resolve_collision(entity, &slide, &mut ctx)?;
        board.registry.set_motion(entity, MotionState::Idle)?;

        Ok(MoveOutcome {
            entity,
            slide,
            combat,
        })
    }

    /// Moves every living player in `direction`, lowest id first, then
    /// checks whether the level is decided.
    pub fn player_turn(&mut self, direction: CardinalDirection) -> Result<TurnReport, EngineError> {
        self.ensure_phase(TurnPhase::PlayerTurn)?;
        self.set_phase(TurnPhase::ResolvingPlayerMoves);

        let outcomes = self.move_faction(Faction::Player, |_, _, _, _| Some(direction))?;
        Ok(self.close_half_turn(outcomes, TurnPhase::EnemyTurn))
    }

    /// Lets every living enemy pick a direction and slide, lowest id first.
    pub fn run_enemy_turn(&mut self) -> Result<TurnReport, EngineError> {
        self.ensure_phase(TurnPhase::EnemyTurn)?;
        self.set_phase(TurnPhase::ResolvingEnemyMoves);

        let outcomes = self.move_faction(Faction::Enemy, ai::choose_direction)?;
        let report = self.close_half_turn(outcomes, TurnPhase::PlayerTurn);
        if !report.is_finished() {
            self.turn += 1;
        }
        Ok(report)
    }

    /// Player turn followed by the enemy turn, unless the player turn
    /// already decided the level.
    pub fn play_round(&mut self, direction: CardinalDirection) -> Result<TurnReport, EngineError> {
        let mut report = self.player_turn(direction)?;
        if report.phase == TurnPhase::EnemyTurn {
            let enemy = self.run_enemy_turn()?;
            report.merge(enemy);
        }
        Ok(report)
    }

    fn move_faction<F>(
        &mut self,
        faction: Faction,
        mut pick: F,
    ) -> Result<Vec<MoveOutcome>, EngineError>
    where
        F: FnMut(&Grid, &EntityRegistry, EntityId, &GameConfig) -> Option<CardinalDirection>,
    {
        let roster = self.board()?.registry.all_alive(faction);
        let mut outcomes = Vec::with_capacity(roster.len());
        for entity in roster {
            let board = self.board()?;
            // Earlier moves in this half-turn may have killed later movers.
            if !board.registry.is_alive(entity) {
                debug!(%entity, "skipping entity killed earlier this turn");
                continue;
            }
            let Some(direction) = pick(&board.grid, &board.registry, entity, &self.config) else {
                debug!(%entity, "no move chosen");
                continue;
            };
            outcomes.push(self.commit_move(entity, direction)?);
        }
        Ok(outcomes)
    }

    fn close_half_turn(&mut self, outcomes: Vec<MoveOutcome>, next: TurnPhase) -> TurnReport {
        let result = self.evaluate();
        match result {
            Some(result) => self.finish(result),
            None => self.set_phase(next),
        }
        TurnReport {
            outcomes,
            phase: self.phase,
            result,
        }
    }

    /// No enemy is alive. `false` when no level is loaded.
    pub fn check_win_condition(&self) -> bool {
        self.board
            .as_ref()
            .is_some_and(|board| board.registry.alive_count(Faction::Enemy) == 0)
    }

    /// No player is alive. `false` when no level is loaded.
    pub fn check_lose_condition(&self) -> bool {
        self.board
            .as_ref()
            .is_some_and(|board| board.registry.alive_count(Faction::Player) == 0)
    }

    /// Win is checked before loss, so mutual elimination counts as a win.
    pub fn evaluate(&self) -> Option<LevelResult> {
        if self.check_win_condition() {
            Some(LevelResult::Won)
        } else if self.check_lose_condition() {
            Some(LevelResult::Lost)
        } else {
            None
        }
    }

    fn finish(&mut self, result: LevelResult) {
        info!(level = ?self.level_id(), %result, turn = self.turn, "level finished");
        self.set_phase(result.into());
        self.events.on_event(&GameEvent::LevelFinished { result });
    }

    fn set_phase(&mut self, next: TurnPhase) {
        let previous = self.phase;
        if previous == next {
            return;
        }
        self.phase = next;
        info!(from = %previous, to = %next, "phase changed");
        self.events.on_event(&GameEvent::PhaseChanged {
            from: previous,
            to: next,
        });
    }

    /// Takes every event emitted since the last drain.
    pub fn drain_events(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.events.buffer)
    }

    /// SHA-256 over the current grid and registry.
    pub fn state_digest(&self) -> Result<[u8; 32], EngineError> {
        let board = self.board()?;
        Ok(compute_state_digest(&board.grid, &board.registry))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn engine_with(rows: &[&str]) -> TurnEngine {
        let level = LevelDefinition::from_ascii(1, rows).unwrap();
        let mut engine = TurnEngine::new(GameConfig::default());
        engine.init_level(&level).unwrap();
        engine
    }

    #[test]
    fn moves_are_refused_without_a_level() {
        let mut engine = TurnEngine::default();
        assert_eq!(engine.phase(), TurnPhase::AwaitingLevel);
        assert_eq!(
            engine.request_move(EntityId(1), CardinalDirection::East),
            Err(EngineError::NoLevelLoaded)
        );
        assert_eq!(
            engine.player_turn(CardinalDirection::East).unwrap_err(),
            EngineError::NoLevelLoaded
        );
        assert!(!engine.check_win_condition());
        assert!(!engine.check_lose_condition());
    }

    #[test]
    fn rejected_level_keeps_previous_board() {
        let mut engine = engine_with(&["P.E"]);
        let broken = LevelDefinition::from_ascii(2, &["P.."]).unwrap();
        assert!(matches!(
            engine.init_level(&broken),
            Err(EngineError::Level(_))
        ));
        assert_eq!(engine.level_id(), Some(1));
        assert_eq!(engine.phase(), TurnPhase::PlayerTurn);
    }

    #[test]
    fn unknown_and_dead_entities_cannot_move() {
        let mut engine = engine_with(&["P.E.E"]);
        assert_eq!(
            engine.request_move(EntityId(9), CardinalDirection::East),
            Err(EngineError::Registry(
                crate::state::RegistryError::UnknownEntityId(EntityId(9))
            ))
        );

        // Entity 1 slams entity 2 into entity 3 until it dies.
        for _ in 0..2 {
            engine
                .request_move(EntityId(1), CardinalDirection::East)
                .unwrap();
        }
        assert!(!engine.registry().unwrap().is_alive(EntityId(2)));
        assert_eq!(
            engine.request_move(EntityId(2), CardinalDirection::West),
            Err(EngineError::EntityNotAlive(EntityId(2)))
        );
    }

    #[test]
    fn non_unit_delta_is_rejected() {
        let mut engine = engine_with(&["P.E"]);
        assert!(matches!(
            engine.request_move_delta(EntityId(1), (1, 1)),
            Err(EngineError::Direction(_))
        ));
    }

    #[test]
    fn delta_moves_match_direction_moves() {
        let mut by_delta = engine_with(&["P..E#"]);
        let mut by_direction = engine_with(&["P..E#"]);
        let a = by_delta.request_move_delta(EntityId(1), (1, 0)).unwrap();
        let b = by_direction
            .submit(MoveRequest::new(EntityId(1), CardinalDirection::East))
            .unwrap();
        assert_eq!(a, b);
        assert_eq!(by_delta.state_digest(), by_direction.state_digest());
    }

    #[test]
    fn detached_observer_still_buffers_events() {
        let mut engine = engine_with(&["P.E#"]);
        engine.set_event_sink(None);
        engine.drain_events();
        engine.request_move(EntityId(1), CardinalDirection::East).unwrap();
        assert!(!engine.drain_events().is_empty());
    }

    #[test]
    fn phases_cycle_through_a_round() {
        let mut engine = engine_with(&["P....", ".....", "....E"]);
        engine.drain_events();

        let report = engine.player_turn(CardinalDirection::North).unwrap();
        assert_eq!(report.phase, TurnPhase::EnemyTurn);
        assert_eq!(
            engine.player_turn(CardinalDirection::North).unwrap_err(),
            EngineError::WrongPhase {
                expected: TurnPhase::PlayerTurn,
                actual: TurnPhase::EnemyTurn
            }
        );

        let report = engine.run_enemy_turn().unwrap();
        assert_eq!(report.phase, TurnPhase::PlayerTurn);
        assert_eq!(engine.turn_number(), 1);

        let phases: Vec<_> = engine
            .drain_events()
            .into_iter()
            .filter_map(|event| match event {
                GameEvent::PhaseChanged { to, .. } => Some(to),
                _ => None,
            })
            .collect();
        assert_eq!(
            phases,
            vec![
                TurnPhase::ResolvingPlayerMoves,
                TurnPhase::EnemyTurn,
                TurnPhase::ResolvingEnemyMoves,
                TurnPhase::PlayerTurn,
            ]
        );
    }

    #[test]
    fn killing_the_last_enemy_wins_and_locks_the_level() {
        let mut engine = engine_with(&["P.E#"]);
        engine.drain_events();
        // Default enemy hp is 3; a wall slam deals 2.
        let first = engine.play_round(CardinalDirection::East).unwrap();
        assert!(!first.is_finished());
        let report = engine.player_turn(CardinalDirection::East).unwrap();

        assert_eq!(report.result, Some(LevelResult::Won));
        assert_eq!(engine.phase(), TurnPhase::Won);
        assert_eq!(report.kills(), vec![EntityId(2)]);
        assert_eq!(
            engine.request_move(EntityId(1), CardinalDirection::West),
            Err(EngineError::LevelFinished(LevelResult::Won))
        );
        assert!(
            engine
                .drain_events()
                .contains(&GameEvent::LevelFinished {
                    result: LevelResult::Won
                })
        );
    }

    #[test]
    fn walking_onto_a_trap_loses() {
        let mut engine = engine_with(&["P^#", "..E"]);
        let report = engine.player_turn(CardinalDirection::East).unwrap();
        assert_eq!(report.result, Some(LevelResult::Lost));
        assert!(engine.check_lose_condition());
        assert!(!engine.check_win_condition());
    }

    #[test]
    fn mutual_elimination_is_a_win() {
        let mut engine = engine_with(&["P.E#"]);
        let board = engine.board.as_mut().unwrap();
        board.registry.apply_damage(EntityId(1), 99).unwrap();
        board.registry.apply_damage(EntityId(2), 99).unwrap();
        assert!(engine.check_win_condition());
        assert!(engine.check_lose_condition());
        assert_eq!(engine.evaluate(), Some(LevelResult::Won));
    }

    #[test]
    fn entities_are_idle_after_every_move() {
        let mut engine = engine_with(&["P..E.", "....E"]);
        engine.play_round(CardinalDirection::East).unwrap();
        let registry = engine.registry().unwrap();
        assert!(registry.iter().all(|record| record.motion == MotionState::Idle));
    }

    #[test]
    fn observer_sees_the_same_events_as_the_buffer() {
        use std::sync::{Arc, Mutex};

        struct Shared(Arc<Mutex<Vec<GameEvent>>>);
        impl EventSink for Shared {
            fn on_event(&mut self, event: &GameEvent) {
                if let Ok(mut events) = self.0.lock() {
                    events.push(event.clone());
                }
            }
        }

        let seen = Arc::new(Mutex::new(Vec::new()));
        let level = LevelDefinition::from_ascii(1, &["P.E#"]).unwrap();
        let mut engine = TurnEngine::new(GameConfig::default())
            .with_event_sink(Box::new(Shared(Arc::clone(&seen))));
        engine.init_level(&level).unwrap();
        engine.play_round(CardinalDirection::East).unwrap();

        let buffered = engine.drain_events();
        assert!(!buffered.is_empty());
        assert_eq!(*seen.lock().unwrap(), buffered);
        assert!(engine.drain_events().is_empty());
    }

    #[test]
    fn unload_returns_to_awaiting_level() {
        let mut engine = engine_with(&["P.E"]);
        engine.unload_level();
        assert_eq!(engine.phase(), TurnPhase::AwaitingLevel);
        assert!(engine.grid().is_err());
        assert_eq!(engine.state_digest(), Err(EngineError::NoLevelLoaded));
    }
}
