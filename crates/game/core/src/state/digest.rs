//! Deterministic fingerprint of the board.
//!
//! Two engines that received the same level and the same inputs produce the
//! same digest, which makes replays and regression fixtures cheap to compare.

use sha2::{Digest, Sha256};

use super::{EntityRegistry, Faction, Grid, MotionState};

/// Computes a SHA-256 commitment over the grid and every registry record.
///
/// Layout (all integers little-endian):
/// - `width`, `height` as u32, then one code byte per cell in row-major order
/// - per entity in id order: id u32, faction byte, x i32, y i32, hp i32, motion byte
pub fn compute_state_digest(grid: &Grid, registry: &EntityRegistry) -> [u8; 32] {
    let mut hasher = Sha256::new();

    hasher.update(grid.width().to_le_bytes());
    hasher.update(grid.height().to_le_bytes());
    let codes: Vec<u8> = grid.cells().iter().map(|cell| cell.code()).collect();
    hasher.update(&codes);

    hasher.update((registry.len() as u32).to_le_bytes());
    for record in registry.iter() {
        hasher.update(record.id.as_u32().to_le_bytes());
        hasher.update([faction_byte(record.faction)]);
        hasher.update(record.position.x.to_le_bytes());
        hasher.update(record.position.y.to_le_bytes());
        hasher.update(record.hit_points.to_le_bytes());
        hasher.update([motion_byte(record.motion)]);
    }

    hasher.finalize().into()
}

fn faction_byte(faction: Faction) -> u8 {
    match faction {
        Faction::Player => 0,
        Faction::Enemy => 1,
    }
}

fn motion_byte(motion: MotionState) -> u8 {
    match motion {
        MotionState::Idle => 0,
        MotionState::Sliding => 1,
        MotionState::ResolvingCollision => 2,
    }
}
