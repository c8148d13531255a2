//! Normalized level definitions.
//!
//! Content loaders translate whatever file format they read into a
//! [`LevelDefinition`]. The core validates it and builds a fresh grid and
//! registry from it; a definition that fails validation never reaches the
//! engine's state.

use std::collections::{BTreeMap, BTreeSet};

use tracing::warn;

use crate::config::GameConfig;
use crate::error::{ErrorSeverity, GameError};
use crate::state::{
    CellType, EntityId, EntityRegistry, Faction, Grid, GridError, Position, RegistryError,
};

/// One entity placement.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SpawnSpec {
    /// Explicit id. Spawns without one get the lowest free id starting at 1.
    #[cfg_attr(feature = "serde", serde(default))]
    pub id: Option<EntityId>,
    pub faction: Faction,
    pub position: Position,
    /// Starting hit points. Falls back to [`GameConfig::spawn_hp`].
    #[cfg_attr(feature = "serde", serde(default))]
    pub hp: Option<i32>,
}

impl SpawnSpec {
    pub fn new(faction: Faction, position: Position) -> Self {
        Self {
            id: None,
            faction,
            position,
            hp: None,
        }
    }

    pub fn with_id(mut self, id: EntityId) -> Self {
        self.id = Some(id);
        self
    }

    pub fn with_hp(mut self, hp: i32) -> Self {
        self.hp = Some(hp);
        self
    }
}

/// Grid plus entity placements for a single level.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct LevelDefinition {
    pub id: u32,
    #[cfg_attr(feature = "serde", serde(default))]
    pub name: String,
    pub width: u32,
    pub height: u32,
    /// Row-major, `y = 0` first.
    pub cells: Vec<CellType>,
    pub spawns: Vec<SpawnSpec>,
}

/// A spawn after id assignment and hit point defaults.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ResolvedSpawn {
    pub id: EntityId,
    pub faction: Faction,
    pub position: Position,
    pub hp: i32,
}

#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum LevelError {
    #[error("invalid grid: {0}")]
    Grid(#[from] GridError),

    #[error("spawn {index} at {position} lies outside the grid")]
    SpawnOutOfRange { index: usize, position: Position },

    #[error("spawn {index} at {position} is inside a wall")]
    SpawnOnWall { index: usize, position: Position },

    #[error("spawns {first} and {second} both start at {position}")]
    OverlappingSpawns {
        first: usize,
        second: usize,
        position: Position,
    },

    #[error("entity id {0} is used by more than one spawn")]
    DuplicateId(EntityId),

    #[error("spawn {index} has non-positive hit points {hp}")]
    InvalidHitPoints { index: usize, hp: i32 },

    #[error("level has no {0} spawn")]
    MissingFaction(Faction),

    #[error("could not place spawns: {0}")]
    Registry(#[from] RegistryError),
}

impl GameError for LevelError {
    fn severity(&self) -> ErrorSeverity {
        ErrorSeverity::Validation
    }

    fn error_code(&self) -> &'static str {
        match self {
            LevelError::Grid(_) => "LEVEL_INVALID_GRID",
            LevelError::SpawnOutOfRange { .. } => "LEVEL_SPAWN_OUT_OF_RANGE",
            LevelError::SpawnOnWall { .. } => "LEVEL_SPAWN_ON_WALL",
            LevelError::OverlappingSpawns { .. } => "LEVEL_OVERLAPPING_SPAWNS",
            LevelError::DuplicateId(_) => "LEVEL_DUPLICATE_ID",
            LevelError::InvalidHitPoints { .. } => "LEVEL_INVALID_HIT_POINTS",
            LevelError::MissingFaction(_) => "LEVEL_MISSING_FACTION",
            LevelError::Registry(_) => "LEVEL_REGISTRY",
        }
    }
}

impl LevelDefinition {
    pub fn new(id: u32, grid: &Grid, spawns: Vec<SpawnSpec>) -> Self {
        Self {
            id,
            name: String::new(),
            width: grid.width(),
            height: grid.height(),
            cells: grid.cells().to_vec(),
            spawns,
        }
    }

    /// Parses an ASCII picture in the [`Grid::from_ascii`] format, extended
    /// with `P` for a player spawn and `E` for an enemy spawn on empty floor.
    ///
    /// ```
    /// use jelly_core::{Faction, LevelDefinition};
    ///
    /// let level = LevelDefinition::from_ascii(1, &[
    ///     "#####",
    ///     "#P.E#",
    ///     "#####",
    /// ]).unwrap();
    /// assert_eq!(level.spawns.len(), 2);
    /// assert_eq!(level.spawns[0].faction, Faction::Player);
    /// ```
    pub fn from_ascii(id: u32, rows: &[&str]) -> Result<Self, LevelError> {
        let mut spawns = Vec::new();
        let mut terrain = Vec::with_capacity(rows.len());
        let height = rows.len() as i32;
        for (line, row) in rows.iter().enumerate() {
            let y = height - 1 - line as i32;
            let mut cleaned = String::with_capacity(row.len());
            for (x, glyph) in row.chars().enumerate() {
                let faction = match glyph {
                    'P' => Some(Faction::Player),
                    'E' => Some(Faction::Enemy),
                    _ => None,
                };
                match faction {
                    Some(faction) => {
                        spawns.push(SpawnSpec::new(faction, Position::new(x as i32, y)));
                        cleaned.push('.');
                    }
                    None => cleaned.push(glyph),
                }
            }
            terrain.push(cleaned);
        }
        let terrain: Vec<&str> = terrain.iter().map(String::as_str).collect();
        let grid = Grid::from_ascii(&terrain)?;
        Ok(Self::new(id, &grid, spawns))
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    /// Builds the grid this definition describes.
    pub fn grid(&self) -> Result<Grid, LevelError> {
        Ok(Grid::new(self.width, self.height, self.cells.clone())?)
    }

    /// Checks the definition and assigns ids and hit points to every spawn.
    ///
    /// Auto ids are handed out in spawn order, starting at 1 and skipping any
    /// id claimed explicitly by another spawn.
    pub fn resolve_spawns(&self, config: &GameConfig) -> Result<Vec<ResolvedSpawn>, LevelError> {
        let grid = self.grid()?;

        let mut occupied: BTreeMap<Position, usize> = BTreeMap::new();
        let mut explicit: BTreeSet<EntityId> = BTreeSet::new();
        for (index, spawn) in self.spawns.iter().enumerate() {
            let cell = grid
                .cell_at(spawn.position)
                .map_err(|_| LevelError::SpawnOutOfRange {
                    index,
                    position: spawn.position,
                })?;
            if cell.is_obstruction() {
                return Err(LevelError::SpawnOnWall {
                    index,
                    position: spawn.position,
                });
            }
            if let Some(&first) = occupied.get(&spawn.position) {
                return Err(LevelError::OverlappingSpawns {
                    first,
                    second: index,
                    position: spawn.position,
                });
            }
            occupied.insert(spawn.position, index);

            if let Some(id) = spawn.id
                && !explicit.insert(id)
            {
                return Err(LevelError::DuplicateId(id));
            }
            if let Some(hp) = spawn.hp
                && hp <= 0
            {
                return Err(LevelError::InvalidHitPoints { index, hp });
            }
        }

        for faction in [Faction::Player, Faction::Enemy] {
            if !self.spawns.iter().any(|spawn| spawn.faction == faction) {
                return Err(LevelError::MissingFaction(faction));
            }
        }

        let mut next_auto = 1u32;
        let resolved = self
            .spawns
            .iter()
            .map(|spawn| {
                let id = spawn.id.unwrap_or_else(|| {
                    while explicit.contains(&EntityId(next_auto)) {
                        next_auto += 1;
                    }
                    let id = EntityId(next_auto);
                    next_auto += 1;
                    id
                });
                ResolvedSpawn {
                    id,
                    faction: spawn.faction,
                    position: spawn.position,
                    hp: spawn.hp.unwrap_or_else(|| config.spawn_hp(spawn.faction)),
                }
            })
            .collect();
        Ok(resolved)
    }

    /// Validates the definition and returns a fresh grid and registry.
    pub fn build(&self, config: &GameConfig) -> Result<(Grid, EntityRegistry), LevelError> {
        let outcome = self.grid().and_then(|grid| {
            let spawns = self.resolve_spawns(config)?;
            Ok((grid, spawns))
        });
        let (grid, spawns) = match outcome {
            Ok(parts) => parts,
            Err(err) => {
                warn!(level = self.id, error = %err, "rejected level definition");
                return Err(err);
            }
        };

        let mut registry = EntityRegistry::new();
        for spawn in spawns {
            registry.add(spawn.id, spawn.faction, spawn.position, spawn.hp)?;
        }
        Ok((grid, registry))
    }
}
