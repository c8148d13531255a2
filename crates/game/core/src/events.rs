//! Notifications emitted while moves resolve.
//!
//! The engine records every event in an internal buffer (see
//! [`crate::TurnEngine::drain_events`]) and also forwards it to an optional
//! [`EventSink`], so a presentation layer can either poll or observe.

use crate::engine::{LevelResult, TurnPhase};
use crate::resolve::StopCause;
use crate::state::{EntityId, Position};

#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum GameEvent {
    MoveResolved {
        entity: EntityId,
        from: Position,
        to: Position,
        stop_cause: StopCause,
    },
    DamageDealt {
        entity: EntityId,
        amount: i32,
        is_critical: bool,
    },
    WallBroken {
        position: Position,
    },
    EntityKilled {
        entity: EntityId,
    },
    TrapTriggered {
        entity: EntityId,
        position: Position,
    },
    PhaseChanged {
        from: TurnPhase,
        to: TurnPhase,
    },
    LevelFinished {
        result: LevelResult,
    },
}

/// Observer for [`GameEvent`]s.
///
/// Override [`EventSink::on_event`] to see every event, or any of the named
/// hooks to react to a single kind. The default `on_event` dispatches to the
/// hooks, which do nothing by default.
pub trait EventSink {
    fn on_event(&mut self, event: &GameEvent) {
        match *event {
            GameEvent::MoveResolved {
                entity,
                from,
                to,
                stop_cause,
            } => self.on_move_resolved(entity, from, to, stop_cause),
            GameEvent::DamageDealt {
                entity,
                amount,
                is_critical,
            } => self.on_damage_dealt(entity, amount, is_critical),
            GameEvent::WallBroken { position } => self.on_wall_broken(position),
            GameEvent::EntityKilled { entity } => self.on_entity_killed(entity),
            GameEvent::TrapTriggered { entity, position } => {
                self.on_trap_triggered(entity, position)
            }
            GameEvent::PhaseChanged { from, to } => self.on_phase_changed(from, to),
            GameEvent::LevelFinished { result } => self.on_level_finished(result),
        }
    }

    fn on_move_resolved(
        &mut self,
        _entity: EntityId,
        _from: Position,
        _to: Position,
        _stop_cause: StopCause,
    ) {
    }

    fn on_damage_dealt(&mut self, _entity: EntityId, _amount: i32, _is_critical: bool) {}

    fn on_wall_broken(&mut self, _position: Position) {}

    fn on_entity_killed(&mut self, _entity: EntityId) {}

    fn on_trap_triggered(&mut self, _entity: EntityId, _position: Position) {}

    fn on_phase_changed(&mut self, _from: TurnPhase, _to: TurnPhase) {}

    fn on_level_finished(&mut self, _result: LevelResult) {}
}

/// Collects events in order.
impl EventSink for Vec<GameEvent> {
    fn on_event(&mut self, event: &GameEvent) {
        self.push(event.clone());
    }
}

/// Discards everything.
#[derive(Clone, Copy, Debug, Default)]
pub struct NullSink;

impl EventSink for NullSink {}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Default)]
    struct KillCounter {
        kills: Vec<EntityId>,
        walls: usize,
    }

    impl EventSink for KillCounter {
        fn on_entity_killed(&mut self, entity: EntityId) {
            self.kills.push(entity);
        }

        fn on_wall_broken(&mut self, _position: Position) {
            self.walls += 1;
        }
    }

    #[test]
    fn default_dispatch_reaches_named_hooks() {
        let mut counter = KillCounter::default();
        counter.on_event(&GameEvent::EntityKilled {
            entity: EntityId(4),
        });
        counter.on_event(&GameEvent::WallBroken {
            position: Position::new(1, 1),
        });
        counter.on_event(&GameEvent::DamageDealt {
            entity: EntityId(4),
            amount: 1,
            is_critical: false,
        });
        assert_eq!(counter.kills, vec![EntityId(4)]);
        assert_eq!(counter.walls, 1);
    }

    #[test]
    fn vec_sink_records_in_order() {
        let mut sink: Vec<GameEvent> = Vec::new();
        let first = GameEvent::WallBroken {
            position: Position::new(0, 0),
        };
        let second = GameEvent::EntityKilled {
            entity: EntityId(1),
        };
        sink.on_event(&first);
        sink.on_event(&second);
        assert_eq!(sink, vec![first, second]);
    }
}
