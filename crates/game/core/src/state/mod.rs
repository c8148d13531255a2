//! Authoritative board state.
//!
//! The grid and the entity registry are the only mutable data in the core.
//! Both are owned by [`crate::TurnEngine`]; resolvers borrow them for the
//! duration of a single move.
pub mod digest;
pub mod grid;
pub mod registry;
pub mod types;

pub use digest::compute_state_digest;
pub use grid::{CellType, Grid, GridError};
pub use registry::{EntityRecord, EntityRegistry, MotionState, RegistryError};
pub use types::{EntityId, Faction, Position};
