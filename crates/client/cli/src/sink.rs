//! Event observer that forwards engine events to `tracing`.
use jelly_core::{EntityId, EventSink, LevelResult, Position, StopCause, TurnPhase};
use tracing::{debug, info};

/// Logs gameplay events as they happen. Phase changes go to `debug`.
#[derive(Clone, Copy, Debug, Default)]
pub struct TracingSink;

impl EventSink for TracingSink {
    fn on_move_resolved(
        &mut self,
        entity: EntityId,
        from: Position,
        to: Position,
        stop_cause: StopCause,
    ) {
        info!(%entity, %from, %to, %stop_cause, "moved");
    }

    fn on_damage_dealt(&mut self, entity: EntityId, amount: i32, is_critical: bool) {
        info!(%entity, amount, is_critical, "damage");
    }

    fn on_wall_broken(&mut self, position: Position) {
        info!(%position, "wall broken");
    }

    fn on_entity_killed(&mut self, entity: EntityId) {
        info!(%entity, "killed");
    }

    fn on_trap_triggered(&mut self, entity: EntityId, position: Position) {
        info!(%entity, %position, "trap triggered");
    }

    fn on_phase_changed(&mut self, from: TurnPhase, to: TurnPhase) {
        debug!(%from, %to, "phase");
    }

    fn on_level_finished(&mut self, result: LevelResult) {
        info!(%result, "level finished");
    }
}
