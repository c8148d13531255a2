//! Straight-line slide simulation.
//!
//! A slide walks one cell at a time from its start until something stops it.
//! The walk is read-only: walls are reported, never broken, and entities are
//! never moved. Applying the result is the caller's job.

use tracing::debug;

use crate::action::CardinalDirection;
use crate::state::{CellType, EntityId, EntityRegistry, Grid, Position};

/// Why a slide ended.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, strum::Display)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum StopCause {
    /// Step budget exhausted with the path still open. Only bounded probes end this way.
    RanOutOfDistance,
    /// The next cell lies outside the grid.
    Boundary,
    HardWall,
    /// The next cell holds a breakable wall at the given position.
    BreakableWall(Position),
    /// A living entity other than the mover holds the next cell.
    BlockedByEntity(EntityId),
}

impl StopCause {
    /// Whether something physically stands in the way.
    pub fn is_obstruction(self) -> bool {
        !matches!(self, StopCause::RanOutOfDistance)
    }
}

/// Outcome of a single slide computation.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SlideResult {
    pub start: Position,
    pub direction: CardinalDirection,
    /// Last cell the mover legally reached.
    pub final_position: Position,
    pub stop_cause: StopCause,
    /// Last trap cell the mover entered, if any.
    pub trap_crossed: Option<Position>,
}

impl SlideResult {
    /// Number of cells travelled.
    pub fn distance(&self) -> u32 {
        self.start.manhattan(self.final_position)
    }

    pub fn moved(&self) -> bool {
        self.start != self.final_position
    }

    pub fn blocking_entity(&self) -> Option<EntityId> {
        match self.stop_cause {
            StopCause::BlockedByEntity(id) => Some(id),
            _ => None,
        }
    }
}

/// Slides `mover` from `start` until an obstruction.
///
/// The walk is bounded by the longest grid axis, so it always ends on a
/// physical obstruction and never with [`StopCause::RanOutOfDistance`].
///
/// A trap only counts once the mover actually enters its cell: a trap held by
/// another living entity stops the slide in front of it and is not recorded.
pub fn resolve_slide(
    grid: &Grid,
    registry: &EntityRegistry,
    start: Position,
    direction: CardinalDirection,
    mover: EntityId,
) -> SlideResult {
    resolve_slide_bounded(grid, registry, start, direction, mover, grid.max_extent())
}

/// Slides at most `max_steps` cells. Used for one-cell knockback probes.
pub fn resolve_slide_bounded(
    grid: &Grid,
    registry: &EntityRegistry,
    start: Position,
    direction: CardinalDirection,
    mover: EntityId,
    max_steps: u32,
) -> SlideResult {
    let mut current = start;
    let mut trap_crossed = None;
    let mut steps = 0;

    let stop_cause = loop {
        if steps >= max_steps {
            break StopCause::RanOutOfDistance;
        }

        let next = direction.step(current);
        let Ok(cell) = grid.cell_at(next) else {
            break StopCause::Boundary;
        };

        match cell {
            CellType::Wall => break StopCause::HardWall,
            CellType::BreakableWall => break StopCause::BreakableWall(next),
            CellType::Empty | CellType::Trap => {}
        }

        if let Some(occupant) = registry.entity_at(next)
            && occupant != mover
        {
            break StopCause::BlockedByEntity(occupant);
        }

        if cell == CellType::Trap {
            trap_crossed = Some(next);
        }
        current = next;
        steps += 1;
    };

    debug!(
        %mover,
        %start,
        %direction,
        to = %current,
        %stop_cause,
        "slide resolved"
    );

    SlideResult {
        start,
        direction,
        final_position: current,
        stop_cause,
        trap_crossed,
    }
}
