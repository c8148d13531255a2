//! Property tests for slides, chains and level outcomes.

use std::collections::BTreeSet;

use jelly_core::{
    CardinalDirection, CellType, CombatOutcome, EntityId, EntityRegistry, Faction, GameConfig,
    Grid, LevelDefinition, LevelResult, Position, StopCause, TurnEngine, resolve_slide,
};
use proptest::prelude::*;

fn direction() -> impl Strategy<Value = CardinalDirection> {
    prop::sample::select(CardinalDirection::ALL.to_vec())
}

/// Every defender struck anywhere in the reaction, in visit order.
fn defenders(outcome: &CombatOutcome, out: &mut Vec<EntityId>) {
    out.extend(outcome.defender);
    for chained in &outcome.chained {
        defenders(chained, out);
    }
}

proptest! {
    #[test]
    fn empty_grid_slides_reach_the_edge(
        (width, height, x, y) in (1u32..12, 1u32..12)
            .prop_flat_map(|(w, h)| (Just(w), Just(h), 0..w as i32, 0..h as i32)),
        direction in direction(),
    ) {
        let grid = Grid::filled(width, height, CellType::Empty).unwrap();
        let mut registry = EntityRegistry::new();
        let start = Position::new(x, y);
        registry.add(EntityId(1), Faction::Player, start, 3).unwrap();

        let slide = resolve_slide(&grid, &registry, start, direction, EntityId(1));
        let (w, h) = (width as i32, height as i32);
        let expected = match direction {
            CardinalDirection::North => Position::new(x, h - 1),
            CardinalDirection::South => Position::new(x, 0),
            CardinalDirection::East => Position::new(w - 1, y),
            CardinalDirection::West => Position::new(0, y),
        };
        prop_assert_eq!(slide.final_position, expected);
        prop_assert_eq!(slide.stop_cause, StopCause::Boundary);
        prop_assert_eq!(slide.trap_crossed, None);
    }

    #[test]
    fn chains_visit_each_defender_once(
        occupied in prop::collection::vec(any::<bool>(), 2..16),
        walled in any::<bool>(),
    ) {
        prop_assume!(occupied.iter().any(|cell| *cell));
        let mut row = String::from("P");
        row.extend(occupied.iter().map(|cell| if *cell { 'E' } else { '.' }));
        if walled {
            row.push('#');
        }
        let level = LevelDefinition::from_ascii(1, &[row.as_str()]).unwrap();
        let enemies = occupied.iter().filter(|cell| **cell).count();

        let mut engine = TurnEngine::new(GameConfig::default());
        engine.init_level(&level).unwrap();
        let outcomes = engine.request_move(EntityId(1), CardinalDirection::East).unwrap();

        let mut visited = Vec::new();
        defenders(&outcomes[0].combat, &mut visited);
        let unique: BTreeSet<_> = visited.iter().copied().collect();
        prop_assert_eq!(unique.len(), visited.len());
        prop_assert!(visited.len() <= enemies);
        prop_assert!(outcomes[0].combat.chain_depth() < enemies.max(1));
    }

    #[test]
    fn win_takes_precedence_over_loss(
        player_dead in any::<bool>(),
        enemy_dead in any::<bool>(),
    ) {
        // Trap damage kills outright; march the chosen sides onto traps.
        let level = LevelDefinition::from_ascii(1, &["P^", "E^"]).unwrap();
        let mut engine = TurnEngine::new(GameConfig::default());
        engine.init_level(&level).unwrap();
        if player_dead {
            engine.request_move(EntityId(1), CardinalDirection::East).unwrap();
        }
        if enemy_dead {
            engine.request_move(EntityId(2), CardinalDirection::East).unwrap();
        }

        let expected = match (player_dead, enemy_dead) {
            (_, true) => Some(LevelResult::Won),
            (true, false) => Some(LevelResult::Lost),
            (false, false) => None,
        };
        prop_assert_eq!(engine.evaluate(), expected);
        prop_assert_eq!(engine.check_win_condition(), enemy_dead);
        prop_assert_eq!(engine.check_lose_condition(), player_dead);
    }
}
