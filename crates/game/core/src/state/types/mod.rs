pub mod common;

pub use common::{EntityId, Faction, Position};
