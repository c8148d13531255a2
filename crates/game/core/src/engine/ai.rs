//! Enemy move selection.
//!
//! Enemies chase the closest living player: pick the nearest target by
//! Manhattan distance, then slide along the axis with the larger gap. When
//! that slide would neither move the enemy nor hit anything, the first of
//! North, East, South, West that does is used instead.

use crate::action::CardinalDirection;
use crate::config::GameConfig;
use crate::resolve::{StopCause, resolve_slide};
use crate::state::{EntityId, EntityRegistry, Faction, Grid, Position};

/// Fallback order when the preferred direction is a no-op.
pub const FALLBACK_ORDER: [CardinalDirection; 4] = [
    CardinalDirection::North,
    CardinalDirection::East,
    CardinalDirection::South,
    CardinalDirection::West,
];

/// Nearest living opponent of `hunter`, lowest id on ties.
///
/// Targets farther than `detection_range` are ignored.
pub fn choose_target(
    registry: &EntityRegistry,
    hunter: EntityId,
    detection_range: Option<u32>,
) -> Option<EntityId> {
    let record = registry.get(hunter).ok()?;
    let origin = record.position;
    registry
        .all_alive(record.faction.opponent())
        .into_iter()
        .filter_map(|id| {
            let distance = registry.get(id).ok()?.position.manhattan(origin);
            Some((distance, id))
        })
        .filter(|(distance, _)| detection_range.is_none_or(|range| *distance <= range))
        .min()
        .map(|(_, id)| id)
}

/// Axis with the larger absolute delta; horizontal wins ties.
/// `None` when `from == to`.
pub fn preferred_direction(from: Position, to: Position) -> Option<CardinalDirection> {
    let dx = to.x - from.x;
    let dy = to.y - from.y;
    if dx == 0 && dy == 0 {
        return None;
    }
    let direction = if dx.abs() >= dy.abs() {
        if dx > 0 {
            CardinalDirection::East
        } else {
            CardinalDirection::West
        }
    } else if dy > 0 {
        CardinalDirection::North
    } else {
        CardinalDirection::South
    };
    Some(direction)
}

/// Whether sliding `direction` would change anything on the board.
fn is_productive(
    grid: &Grid,
    registry: &EntityRegistry,
    position: Position,
    direction: CardinalDirection,
    mover: EntityId,
) -> bool {
    let slide = resolve_slide(grid, registry, position, direction, mover);
    slide.moved()
        || matches!(
            slide.stop_cause,
            StopCause::BlockedByEntity(_) | StopCause::BreakableWall(_)
        )
}

/// Direction for `enemy` this turn, or `None` to stay put.
pub fn choose_direction(
    grid: &Grid,
    registry: &EntityRegistry,
    enemy: EntityId,
    config: &GameConfig,
) -> Option<CardinalDirection> {
    let record = registry.get(enemy).ok()?;
    if record.faction != Faction::Enemy || !record.is_alive() {
        return None;
    }
    let origin = record.position;

    let target = choose_target(registry, enemy, config.ai_detection_range)?;
    let target_position = registry.get(target).ok()?.position;
    let preferred = preferred_direction(origin, target_position)?;

    if is_productive(grid, registry, origin, preferred, enemy) {
        return Some(preferred);
    }
    FALLBACK_ORDER
        .into_iter()
        .find(|direction| is_productive(grid, registry, origin, *direction, enemy))
}
