//! Level layout loader.
//!
//! Two formats are understood:
//!
//! - **JSON** code grids:
//!   `{ "levelId": 1, "instruction": "..", "mapRows": [{ "row": [1, 0, 2] }], "enemyHp": 3 }`.
//!   Rows are listed top to bottom. Codes: `0` empty, `1` wall, `2` player
//!   spawn, `3` enemy spawn, `4` breakable wall, `5` trap.
//! - **RON** files holding a [`LevelDefinition`] verbatim.

use std::path::Path;

use anyhow::{Context, bail};
use jelly_core::{CellType, Faction, LevelDefinition, Position, SpawnSpec};
use serde::Deserialize;
use tracing::debug;

use crate::loaders::{LoadResult, read_file};

const PLAYER_SPAWN: i32 = 2;
const ENEMY_SPAWN: i32 = 3;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct LevelFileJson {
    level_id: u32,
    #[serde(default)]
    instruction: String,
    map_rows: Vec<RowJson>,
    /// `0` or absent means "use the configured default".
    #[serde(default)]
    enemy_hp: i32,
    #[serde(default)]
    player_hp: i32,
}

#[derive(Debug, Deserialize)]
struct RowJson {
    row: Vec<i32>,
}

/// Loader for level layouts.
pub struct LevelLoader;

impl LevelLoader {
    /// Load a level, picking the format from the file extension (`json` or `ron`).
    pub fn load(path: &Path) -> LoadResult<LevelDefinition> {
        let content = read_file(path)?;
        let extension = path
            .extension()
            .and_then(|ext| ext.to_str())
            .unwrap_or_default()
            .to_ascii_lowercase();
        let level = match extension.as_str() {
            "json" => Self::from_json_str(&content),
            "ron" => Self::from_ron_str(&content),
            other => bail!("Unsupported level format {:?}", other),
        }
        .with_context(|| format!("Failed to load level {}", path.display()))?;

        debug!(
            path = %path.display(),
            level = level.id,
            spawns = level.spawns.len(),
            "loaded level file"
        );
        Ok(level)
    }

    pub fn from_json_str(content: &str) -> LoadResult<LevelDefinition> {
        let data: LevelFileJson =
            serde_json::from_str(content).context("Failed to parse level JSON")?;
        let rows: Vec<Vec<i32>> = data.map_rows.into_iter().map(|row| row.row).collect();
        let hp = |value: i32| (value > 0).then_some(value);
        Self::from_code_rows(
            data.level_id,
            data.instruction,
            &rows,
            hp(data.player_hp),
            hp(data.enemy_hp),
        )
    }

    pub fn from_ron_str(content: &str) -> LoadResult<LevelDefinition> {
        let level: LevelDefinition = ron::from_str(content).context("Failed to parse level RON")?;
        level.grid().context("Invalid level grid")?;
        Ok(level)
    }

    /// Builds a definition from top-to-bottom rows of level codes.
    ///
    /// The first row becomes the highest `y`. Spawn markers become empty
    /// cells plus a spawn without an explicit id, listed in file order.
    pub fn from_code_rows(
        id: u32,
        name: String,
        rows: &[Vec<i32>],
        player_hp: Option<i32>,
        enemy_hp: Option<i32>,
    ) -> LoadResult<LevelDefinition> {
        let Some(first) = rows.first() else {
            bail!("Level {} has no rows", id);
        };
        let width = first.len();
        if width == 0 {
            bail!("Level {} has an empty first row", id);
        }
        let height = rows.len();

        let mut cells = vec![CellType::Empty; width * height];
        let mut spawns = Vec::new();
        for (line, row) in rows.iter().enumerate() {
            if row.len() != width {
                bail!(
                    "Row {} of level {} has {} cells, expected {}",
                    line,
                    id,
                    row.len(),
                    width
                );
            }
            let y = height - 1 - line;
            for (x, &code) in row.iter().enumerate() {
                let position = Position::new(x as i32, y as i32);
                let cell = match code {
                    PLAYER_SPAWN => {
                        spawns.push(spawn(Faction::Player, position, player_hp));
                        CellType::Empty
                    }
                    ENEMY_SPAWN => {
                        spawns.push(spawn(Faction::Enemy, position, enemy_hp));
                        CellType::Empty
                    }
                    other => CellType::from_code(other)
                        .with_context(|| format!("Cell {} of level {}", position, id))?,
                };
                cells[y * width + x] = cell;
            }
        }

        Ok(LevelDefinition {
            id,
            name,
            width: width as u32,
            height: height as u32,
            cells,
            spawns,
        })
    }
}

fn spawn(faction: Faction, position: Position, hp: Option<i32>) -> SpawnSpec {
    let spec = SpawnSpec::new(faction, position);
    match hp {
        Some(hp) => spec.with_hp(hp),
        None => spec,
    }
}
