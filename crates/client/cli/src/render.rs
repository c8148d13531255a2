//! Plain-text board rendering.
use jelly_core::{EntityRegistry, Faction, Grid};

/// Grid rows top to bottom with living entities drawn over their cells.
///
/// Players are `P`, enemies `E`. Cells use the level glyphs
/// (`.` floor, `#` wall, `%` breakable wall, `^` trap).
pub fn board_lines(grid: &Grid, registry: &EntityRegistry) -> Vec<String> {
    let mut rows: Vec<Vec<char>> = grid
        .to_ascii()
        .into_iter()
        .map(|line| line.chars().collect())
        .collect();
    let height = grid.height() as i32;

    for record in registry.iter().filter(|record| record.is_alive()) {
        let position = record.position;
        if !grid.contains(position) {
            continue;
        }
        let line = (height - 1 - position.y) as usize;
        if let Some(cell) = rows
            .get_mut(line)
            .and_then(|row| row.get_mut(position.x as usize))
        {
            *cell = match record.faction {
                Faction::Player => 'P',
                Faction::Enemy => 'E',
            };
        }
    }

    rows.into_iter().map(String::from_iter).collect()
}

/// One line per entity: id, faction, position, hit points.
pub fn roster_lines(registry: &EntityRegistry) -> Vec<String> {
    registry
        .iter()
        .map(|record| {
            let status = if record.is_alive() { "" } else { " (dead)" };
            format!(
                "#{} {:<6} at {} hp {}{}",
                record.id,
                record.faction.to_string(),
                record.position,
                record.hit_points,
                status
            )
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use jelly_core::{EntityId, GameConfig, LevelDefinition};

    #[test]
    fn entities_are_drawn_over_cells() {
        let level = LevelDefinition::from_ascii(1, &["#..E", "P.^%"]).unwrap();
        let (grid, registry) = level.build(&GameConfig::default()).unwrap();
        assert_eq!(board_lines(&grid, &registry), vec!["#..E", "P.^%"]);
    }

    #[test]
    fn dead_entities_are_hidden() {
        let level = LevelDefinition::from_ascii(1, &["P.E"]).unwrap();
        let (grid, mut registry) = level.build(&GameConfig::default()).unwrap();
        registry.apply_damage(EntityId(2), 99).unwrap();
        assert_eq!(board_lines(&grid, &registry), vec!["P.."]);
        assert!(roster_lines(&registry)[1].ends_with("(dead)"));
    }
}
