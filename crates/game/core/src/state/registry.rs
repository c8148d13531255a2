//! Entity bookkeeping: who exists, where they stand and whether they live.
//!
//! Records are keyed by [`EntityId`] in a `BTreeMap`, so every iteration the
//! registry exposes is in ascending id order. Dead entities stay in the map
//! until [`EntityRegistry::remove`] or [`EntityRegistry::clear`] so that
//! events can still refer to them, but they never count as occupants.

use std::collections::BTreeMap;

use crate::error::{ErrorSeverity, GameError};

use super::{EntityId, Faction, Position};

/// Logical resolution state of a single entity within a move.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Default, strum::Display)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum MotionState {
    #[default]
    Idle,
    Sliding,
    ResolvingCollision,
}

/// A single tracked entity.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct EntityRecord {
    pub id: EntityId,
    pub faction: Faction,
    pub position: Position,
    /// Alive while strictly positive. Negative values are kept as-is.
    pub hit_points: i32,
    pub motion: MotionState,
}

impl EntityRecord {
    pub fn new(id: EntityId, faction: Faction, position: Position, hit_points: i32) -> Self {
        Self {
            id,
            faction,
            position,
            hit_points,
            motion: MotionState::Idle,
        }
    }

    pub fn is_alive(&self) -> bool {
        self.hit_points > 0
    }
}

/// Errors raised by registry operations.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum RegistryError {
    #[error("entity {0} already exists")]
    DuplicateId(EntityId),

    #[error("position {position} is already occupied by {occupant}")]
    CellOccupied {
        position: Position,
        occupant: EntityId,
    },

    #[error("entity {0} not found")]
    UnknownEntityId(EntityId),
}

impl GameError for RegistryError {
    fn severity(&self) -> ErrorSeverity {
        match self {
            RegistryError::DuplicateId(_) | RegistryError::UnknownEntityId(_) => {
                ErrorSeverity::Validation
            }
            // Slide resolution never ends two living entities on one cell.
            RegistryError::CellOccupied { .. } => ErrorSeverity::Internal,
        }
    }

    fn error_code(&self) -> &'static str {
        match self {
            RegistryError::DuplicateId(_) => "REGISTRY_DUPLICATE_ID",
            RegistryError::CellOccupied { .. } => "REGISTRY_CELL_OCCUPIED",
            RegistryError::UnknownEntityId(_) => "REGISTRY_UNKNOWN_ENTITY",
        }
    }
}

/// Exclusive owner of all entity records for the loaded level.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct EntityRegistry {
    entities: BTreeMap<EntityId, EntityRecord>,
}

impl EntityRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a new entity.
    ///
    /// Fails on a duplicate id, or when a living entity already stands on
    /// `position`. Spawning with non-positive hit points is allowed and
    /// produces an entity that is dead from the start.
    pub fn add(
        &mut self,
        id: EntityId,
        faction: Faction,
        position: Position,
        hit_points: i32,
    ) -> Result<(), RegistryError> {
        if self.entities.contains_key(&id) {
            return Err(RegistryError::DuplicateId(id));
        }
        if let Some(occupant) = self.entity_at(position) {
            return Err(RegistryError::CellOccupied { position, occupant });
        }
        self.entities
            .insert(id, EntityRecord::new(id, faction, position, hit_points));
        Ok(())
    }

    pub fn get(&self, id: EntityId) -> Result<&EntityRecord, RegistryError> {
        self.entities
            .get(&id)
            .ok_or(RegistryError::UnknownEntityId(id))
    }

    fn get_mut(&mut self, id: EntityId) -> Result<&mut EntityRecord, RegistryError> {
        self.entities
            .get_mut(&id)
            .ok_or(RegistryError::UnknownEntityId(id))
    }

    pub fn contains(&self, id: EntityId) -> bool {
        self.entities.contains_key(&id)
    }

    /// First living occupant of `position`, lowest id first.
    pub fn entity_at(&self, position: Position) -> Option<EntityId> {
        self.entities
            .values()
            .find(|record| record.is_alive() && record.position == position)
            .map(|record| record.id)
    }

    /// Subtracts `amount` from the entity's hit points.
    ///
    /// Returns `true` only when this call moved the entity from alive to dead.
    pub fn apply_damage(&mut self, id: EntityId, amount: i32) -> Result<bool, RegistryError> {
        let record = self.get_mut(id)?;
        let was_alive = record.is_alive();
        record.hit_points = record.hit_points.saturating_sub(amount);
        Ok(was_alive && !record.is_alive())
    }

    /// Moves an entity. A living entity may not be placed on a cell that
    /// another living entity already holds.
    pub fn set_position(&mut self, id: EntityId, position: Position) -> Result<(), RegistryError> {
        let alive = self.get(id)?.is_alive();
        if alive
            && let Some(occupant) = self.entity_at(position)
            && occupant != id
        {
            return Err(RegistryError::CellOccupied { position, occupant });
        }
        self.get_mut(id)?.position = position;
        Ok(())
    }

    pub fn set_motion(&mut self, id: EntityId, motion: MotionState) -> Result<(), RegistryError> {
        self.get_mut(id)?.motion = motion;
        Ok(())
    }

    /// Permanently removes an entity, returning its final record.
    pub fn remove(&mut self, id: EntityId) -> Result<EntityRecord, RegistryError> {
        self.entities
            .remove(&id)
            .ok_or(RegistryError::UnknownEntityId(id))
    }

    /// `false` for unknown ids as well as dead entities.
    pub fn is_alive(&self, id: EntityId) -> bool {
        self.entities.get(&id).is_some_and(EntityRecord::is_alive)
    }

    /// Living members of `faction` in ascending id order.
    pub fn all_alive(&self, faction: Faction) -> Vec<EntityId> {
        self.entities
            .values()
            .filter(|record| record.faction == faction && record.is_alive())
            .map(|record| record.id)
            .collect()
    }

    pub fn alive_count(&self, faction: Faction) -> usize {
        self.entities
            .values()
            .filter(|record| record.faction == faction && record.is_alive())
            .count()
    }

    /// All records, dead ones included, in ascending id order.
    pub fn iter(&self) -> impl Iterator<Item = &EntityRecord> {
        self.entities.values()
    }

    pub fn len(&self) -> usize {
        self.entities.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entities.is_empty()
    }

    /// Drops every record. Used on level teardown.
    pub fn clear(&mut self) {
        self.entities.clear();
    }
}
