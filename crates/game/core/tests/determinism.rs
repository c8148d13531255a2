//! Replaying the same moves on the same level must give the same board.

use jelly_core::{CardinalDirection, GameConfig, LevelDefinition, TurnEngine};

const LEVEL: &[&str] = &[
    "#########",
    "#P..%..E#",
    "#.^.....#",
    "#..E..#.#",
    "#########",
];

fn replay(moves: &str) -> String {
    let level = LevelDefinition::from_ascii(1, LEVEL).unwrap();
    let mut engine = TurnEngine::new(GameConfig::default());
    engine.init_level(&level).unwrap();
    for symbol in moves.chars() {
        if engine.phase().is_finished() {
            break;
        }
        let direction = CardinalDirection::try_from(symbol).unwrap();
        engine.play_round(direction).unwrap();
    }
    hex::encode(engine.state_digest().unwrap())
}

#[test]
fn same_moves_same_digest() {
    let first = replay("RDLURRDD");
    let second = replay("RDLURRDD");
    assert_eq!(first, second);
    assert_eq!(first.len(), 64);
}

#[test]
fn initial_digest_is_stable_across_engines() {
    assert_eq!(replay(""), replay(""));
}

#[test]
fn different_moves_change_the_digest() {
    assert_ne!(replay(""), replay("R"));
}
