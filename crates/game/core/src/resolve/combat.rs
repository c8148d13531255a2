//! Collision side effects: damage, wall slams, knockback, traps and chains.
//!
//! [`resolve_collision`] takes a finished [`SlideResult`] for a mover that has
//! already been placed on its final cell, and applies every consequence of
//! how that slide ended. Chain reactions recurse through the same code with
//! the knocked-back defender acting as the new attacker.

use std::collections::BTreeSet;

use tracing::{debug, info};

use crate::action::CardinalDirection;
use crate::config::GameConfig;
use crate::engine::EngineError;
use crate::events::{EventSink, GameEvent};
use crate::state::{CellType, EntityId, EntityRegistry, Grid, MotionState, Position};

use super::slide::{SlideResult, StopCause, resolve_slide_bounded};

/// Tracks which entities already entered chain processing during one
/// originating move. An entity is admitted at most once.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ReactionGuard {
    entered: BTreeSet<EntityId>,
}

impl ReactionGuard {
    pub fn new() -> Self {
        Self::default()
    }

    /// Marks `entity` as in progress. Returns `false` if it was already marked.
    pub fn enter(&mut self, entity: EntityId) -> bool {
        self.entered.insert(entity)
    }

    pub fn contains(&self, entity: EntityId) -> bool {
        self.entered.contains(&entity)
    }

    pub fn len(&self) -> usize {
        self.entered.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entered.is_empty()
    }
}

/// Damage from a trap that fired under an entity.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct TrapHit {
    pub entity: EntityId,
    pub position: Position,
    pub damage: i32,
    pub killed: bool,
}

/// Everything a collision changed.
///
/// `defender` and the damage fields describe the entity that was struck, if
/// any. Traps fired by the mover or by a knocked-back defender are listed in
/// `traps_triggered`. Hits caused by the defender being shoved into another
/// entity are nested in `chained`.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct CombatOutcome {
    pub defender: Option<EntityId>,
    pub damage_dealt: i32,
    pub is_critical: bool,
    pub knockback_direction: Option<CardinalDirection>,
    pub knockback_to: Option<Position>,
    pub entity_killed: bool,
    pub chain_triggered: bool,
    pub wall_broken: Option<Position>,
    pub traps_triggered: Vec<TrapHit>,
    pub chained: Vec<CombatOutcome>,
}

impl CombatOutcome {
    /// True when nothing happened: the slide ended against a boundary or hard wall.
    pub fn is_quiet(&self) -> bool {
        *self == CombatOutcome::default()
    }

    /// Entities killed by this outcome and all of its chained hits, in resolution order.
    pub fn kills(&self) -> Vec<EntityId> {
        let mut kills = Vec::new();
        self.collect_kills(&mut kills);
        kills
    }

    fn collect_kills(&self, kills: &mut Vec<EntityId>) {
        if self.entity_killed
            && let Some(defender) = self.defender
        {
            kills.push(defender);
        }
        kills.extend(
            self.traps_triggered
                .iter()
                .filter(|hit| hit.killed && Some(hit.entity) != self.defender)
                .map(|hit| hit.entity),
        );
        for chained in &self.chained {
            chained.collect_kills(kills);
        }
    }

    /// Depth of the chain reaction rooted at this outcome.
    pub fn chain_depth(&self) -> usize {
        self.chained
            .iter()
            .map(|chained| 1 + chained.chain_depth())
            .max()
            .unwrap_or(0)
    }
}

/// Mutable world borrowed for the duration of one collision.
pub struct CombatContext<'a> {
    pub grid: &'a mut Grid,
    pub registry: &'a mut EntityRegistry,
    pub config: &'a GameConfig,
    pub events: &'a mut dyn EventSink,
    pub guard: &'a mut ReactionGuard,
}

impl CombatContext<'_> {
    fn emit(&mut self, event: GameEvent) {
        self.events.on_event(&event);
    }

    fn damage(
        &mut self,
        entity: EntityId,
        amount: i32,
        is_critical: bool,
    ) -> Result<bool, EngineError> {
        let killed = self.registry.apply_damage(entity, amount)?;
        self.emit(GameEvent::DamageDealt {
            entity,
            amount,
            is_critical,
        });
        if killed {
            info!(%entity, "entity killed");
            self.emit(GameEvent::EntityKilled { entity });
        }
        Ok(killed)
    }

    fn break_wall(&mut self, position: Position) -> Result<(), EngineError> {
        self.grid.set_cell(position, CellType::Empty)?;
        info!(%position, "breakable wall destroyed");
        self.emit(GameEvent::WallBroken { position });
        Ok(())
    }

    fn trigger_trap(
        &mut self,
        entity: EntityId,
        position: Position,
    ) -> Result<TrapHit, EngineError> {
        self.emit(GameEvent::TrapTriggered { entity, position });
        let damage = self.config.trap_damage;
        let killed = self.damage(entity, damage, false)?;
        if self.config.disarm_traps_on_trigger {
            self.grid.set_cell(position, CellType::Empty)?;
        }
        Ok(TrapHit {
            entity,
            position,
            damage,
            killed,
        })
    }
}

/// Applies the consequences of `attacker`'s finished slide.
///
/// The attacker must already stand on `slide.final_position`.
pub fn resolve_collision(
    attacker: EntityId,
    slide: &SlideResult,
    ctx: &mut CombatContext<'_>,
) -> Result<CombatOutcome, EngineError> {
    ctx.guard.enter(attacker);

    let mut outcome = match slide.stop_cause {
        StopCause::BlockedByEntity(defender) => {
            ctx.registry
                .set_motion(attacker, MotionState::ResolvingCollision)?;
            strike(attacker, defender, slide.direction, ctx)?
        }
        StopCause::BreakableWall(position) => {
            ctx.registry
                .set_motion(attacker, MotionState::ResolvingCollision)?;
            ctx.break_wall(position)?;
            CombatOutcome {
                wall_broken: Some(position),
                ..CombatOutcome::default()
            }
        }
        StopCause::Boundary | StopCause::HardWall | StopCause::RanOutOfDistance => {
            CombatOutcome::default()
        }
    };

    if let Some(trap) = slide.trap_crossed {
        let hit = ctx.trigger_trap(attacker, trap)?;
        outcome.traps_triggered.push(hit);
    }

    Ok(outcome)
}

/// `attacker` runs into `defender` while moving in `direction`.
fn strike(
    attacker: EntityId,
    defender: EntityId,
    direction: CardinalDirection,
    ctx: &mut CombatContext<'_>,
) -> Result<CombatOutcome, EngineError> {
    ctx.registry
        .set_motion(defender, MotionState::ResolvingCollision)?;
    let origin = ctx.registry.get(defender)?.position;
    let knockback = resolve_slide_bounded(ctx.grid, ctx.registry, origin, direction, defender, 1);

    let mut outcome = CombatOutcome {
        defender: Some(defender),
        knockback_direction: Some(direction),
        ..CombatOutcome::default()
    };

    if knockback.stop_cause.is_obstruction() {
        debug!(%attacker, %defender, obstruction = %knockback.stop_cause, "wall slam");
        if let StopCause::BreakableWall(wall) = knockback.stop_cause
            && ctx.config.slam_breaks_walls
        {
            ctx.break_wall(wall)?;
            outcome.wall_broken = Some(wall);
        }
        let damage = ctx.config.critical_damage();
        outcome.damage_dealt = damage;
        outcome.is_critical = true;
        outcome.entity_killed = ctx.damage(defender, damage, true)?;
    } else {
        let landing = knockback.final_position;
        debug!(%attacker, %defender, from = %origin, to = %landing, "knockback");
        ctx.registry.set_position(defender, landing)?;
        ctx.emit(GameEvent::MoveResolved {
            entity: defender,
            from: origin,
            to: landing,
            stop_cause: knockback.stop_cause,
        });
        outcome.knockback_to = Some(landing);

        let damage = ctx.config.base_damage;
        outcome.damage_dealt = damage;
        outcome.entity_killed = ctx.damage(defender, damage, false)?;

        if let Some(trap) = knockback.trap_crossed {
            let hit = ctx.trigger_trap(defender, trap)?;
            outcome.entity_killed |= hit.killed;
            outcome.traps_triggered.push(hit);
        }

        let follow = resolve_slide_bounded(ctx.grid, ctx.registry, landing, direction, defender, 1);
        if let StopCause::BlockedByEntity(next) = follow.stop_cause
            && ctx.guard.enter(defender)
        {
            debug!(%defender, %next, "chain reaction");
            outcome.chain_triggered = true;
            let chained = strike(defender, next, direction, ctx)?;
            outcome.chained.push(chained);
        }
    }

    ctx.registry.set_motion(defender, MotionState::Idle)?;
    Ok(outcome)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::resolve::resolve_slide;
    use crate::state::Faction;

    const PLAYER: EntityId = EntityId(1);
    const ENEMY: EntityId = EntityId(2);

    struct Board {
        grid: Grid,
        registry: EntityRegistry,
        config: GameConfig,
        events: Vec<GameEvent>,
    }

    impl Board {
        fn new(rows: &[&str]) -> Self {
            Self {
                grid: Grid::from_ascii(rows).unwrap(),
                registry: EntityRegistry::new(),
                config: GameConfig::default(),
                events: Vec::new(),
            }
        }

        fn spawn(&mut self, id: EntityId, faction: Faction, x: i32, y: i32, hp: i32) {
            self.registry
                .add(id, faction, Position::new(x, y), hp)
                .unwrap();
        }

        /// Slides `mover`, places it, then resolves the collision.
        fn play(
            &mut self,
            mover: EntityId,
            direction: CardinalDirection,
        ) -> (SlideResult, CombatOutcome) {
            let start = self.registry.get(mover).unwrap().position;
            let slide = resolve_slide(&self.grid, &self.registry, start, direction, mover);
            self.registry
                .set_position(mover, slide.final_position)
                .unwrap();
            let mut guard = ReactionGuard::new();
            let mut ctx = CombatContext {
                grid: &mut self.grid,
                registry: &mut self.registry,
                config: &self.config,
                events: &mut self.events,
                guard: &mut guard,
            };
            let outcome = resolve_collision(mover, &slide, &mut ctx).unwrap();
            (slide, outcome)
        }

        fn hp(&self, id: EntityId) -> i32 {
            self.registry.get(id).unwrap().hit_points
        }

        fn position(&self, id: EntityId) -> Position {
            self.registry.get(id).unwrap().position
        }
    }

    #[test]
    fn open_knockback_deals_base_damage() {
        let mut board = Board::new(&["......"]);
        board.spawn(PLAYER, Faction::Player, 2, 0, 3);
        board.spawn(ENEMY, Faction::Enemy, 4, 0, 3);

        let (slide, outcome) = board.play(PLAYER, CardinalDirection::East);
        assert_eq!(slide.final_position, Position::new(3, 0));
        assert_eq!(outcome.damage_dealt, 1);
        assert!(!outcome.is_critical);
        assert_eq!(outcome.knockback_to, Some(Position::new(5, 0)));
        assert_eq!(board.position(ENEMY), Position::new(5, 0));
        assert_eq!(board.hp(ENEMY), 2);
    }

    #[test]
    fn wall_slam_is_critical_and_keeps_position() {
        let mut board = Board::new(&["..#"]);
        board.spawn(PLAYER, Faction::Player, 0, 0, 3);
        board.spawn(ENEMY, Faction::Enemy, 1, 0, 3);

        let (_, outcome) = board.play(PLAYER, CardinalDirection::East);
        assert!(outcome.is_critical);
        assert_eq!(outcome.damage_dealt, 2);
        assert_eq!(outcome.knockback_to, None);
        assert_eq!(board.position(ENEMY), Position::new(1, 0));
        assert_eq!(board.hp(ENEMY), 1);
    }

    #[test]
    fn slam_into_breakable_wall_breaks_it() {
        let mut board = Board::new(&["..%."]);
        board.spawn(PLAYER, Faction::Player, 0, 0, 3);
        board.spawn(ENEMY, Faction::Enemy, 1, 0, 3);

        let (_, outcome) = board.play(PLAYER, CardinalDirection::East);
        assert!(outcome.is_critical);
        assert_eq!(outcome.wall_broken, Some(Position::new(2, 0)));
        assert_eq!(
            board.grid.cell_at(Position::new(2, 0)).unwrap(),
            CellType::Empty
        );
        assert!(
            board
                .events
                .contains(&GameEvent::WallBroken { position: Position::new(2, 0) })
        );
    }

    #[test]
    fn slam_keeps_breakable_wall_when_disabled() {
        let mut board = Board::new(&["..%."]);
        board.config.slam_breaks_walls = false;
        board.spawn(PLAYER, Faction::Player, 0, 0, 3);
        board.spawn(ENEMY, Faction::Enemy, 1, 0, 3);

        let (_, outcome) = board.play(PLAYER, CardinalDirection::East);
        assert!(outcome.is_critical);
        assert_eq!(outcome.wall_broken, None);
        assert_eq!(board.grid.count(CellType::BreakableWall), 1);
    }

    #[test]
    fn sliding_into_breakable_wall_breaks_it_once() {
        let mut board = Board::new(&["...%."]);
        board.spawn(PLAYER, Faction::Player, 0, 0, 3);

        let (slide, outcome) = board.play(PLAYER, CardinalDirection::East);
        assert_eq!(slide.final_position, Position::new(2, 0));
        assert_eq!(outcome.wall_broken, Some(Position::new(3, 0)));
        assert_eq!(board.grid.count(CellType::BreakableWall), 0);

        // The path is open now; the next slide runs to the boundary.
        let (slide, outcome) = board.play(PLAYER, CardinalDirection::East);
        assert_eq!(slide.final_position, Position::new(4, 0));
        assert_eq!(outcome.wall_broken, None);
        let broken = board
            .events
            .iter()
            .filter(|event| matches!(event, GameEvent::WallBroken { .. }))
            .count();
        assert_eq!(broken, 1);
    }

    #[test]
    fn mover_takes_trap_damage_once() {
        let mut board = Board::new(&["..^^.#"]);
        board.spawn(PLAYER, Faction::Player, 0, 0, 3);
        board.config.trap_damage = 1;

        let (slide, outcome) = board.play(PLAYER, CardinalDirection::East);
        assert_eq!(slide.trap_crossed, Some(Position::new(3, 0)));
        assert_eq!(outcome.traps_triggered.len(), 1);
        assert_eq!(board.hp(PLAYER), 2);
    }

    #[test]
    fn default_trap_damage_kills() {
        let mut board = Board::new(&[".^#"]);
        board.spawn(PLAYER, Faction::Player, 0, 0, 3);

        let (_, outcome) = board.play(PLAYER, CardinalDirection::East);
        assert!(outcome.traps_triggered[0].killed);
        assert_eq!(outcome.kills(), vec![PLAYER]);
        assert!(!board.registry.is_alive(PLAYER));
    }

    #[test]
    fn disarm_turns_trap_into_floor() {
        let mut board = Board::new(&[".^#"]);
        board.config.disarm_traps_on_trigger = true;
        board.config.trap_damage = 1;
        board.spawn(PLAYER, Faction::Player, 0, 0, 3);

        board.play(PLAYER, CardinalDirection::East);
        assert_eq!(board.grid.count(CellType::Trap), 0);
    }

    #[test]
    fn knockback_onto_trap_hurts_defender() {
        let mut board = Board::new(&["...^"]);
        board.spawn(PLAYER, Faction::Player, 0, 0, 3);
        board.spawn(ENEMY, Faction::Enemy, 2, 0, 3);

        let (_, outcome) = board.play(PLAYER, CardinalDirection::East);
        assert_eq!(outcome.knockback_to, Some(Position::new(3, 0)));
        assert!(outcome.entity_killed);
        assert_eq!(outcome.traps_triggered[0].entity, ENEMY);
        assert_eq!(outcome.kills(), vec![ENEMY]);
    }

    #[test]
    fn chain_passes_hit_down_the_line() {
        let third = EntityId(3);
        let mut board = Board::new(&["......."]);
        board.spawn(PLAYER, Faction::Player, 0, 0, 3);
        board.spawn(ENEMY, Faction::Enemy, 2, 0, 3);
        board.spawn(third, Faction::Enemy, 4, 0, 3);

        let (_, outcome) = board.play(PLAYER, CardinalDirection::East);
        assert!(outcome.chain_triggered);
        assert_eq!(outcome.chain_depth(), 1);
        assert_eq!(board.position(ENEMY), Position::new(3, 0));
        assert_eq!(board.position(third), Position::new(5, 0));
        assert_eq!(board.hp(third), 2);

        let chained = &outcome.chained[0];
        assert_eq!(chained.defender, Some(third));
        assert!(!chained.chain_triggered);
    }

    #[test]
    fn guard_admits_each_entity_once() {
        let mut guard = ReactionGuard::new();
        assert!(guard.enter(PLAYER));
        assert!(!guard.enter(PLAYER));
        assert!(guard.contains(PLAYER));
        assert_eq!(guard.len(), 1);
    }

    #[test]
    fn motion_returns_to_idle() {
        let mut board = Board::new(&["......"]);
        board.spawn(PLAYER, Faction::Player, 0, 0, 3);
        board.spawn(ENEMY, Faction::Enemy, 3, 0, 3);

        board.play(PLAYER, CardinalDirection::East);
        assert_eq!(board.registry.get(ENEMY).unwrap().motion, MotionState::Idle);
    }
}
