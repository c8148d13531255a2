//! Move intents.
//!
//! The only action in the game is a slide in one of four directions. Raw
//! `(dx, dy)` vectors and script letters are validated here before anything
//! reaches the resolvers.
pub mod movement;

pub use movement::{CardinalDirection, DirectionError, MoveRequest};
