//! Slide and collision resolution.
//!
//! [`resolve_slide`] is a pure read of the board. [`resolve_collision`]
//! applies the consequences of a finished slide and is the only code outside
//! the engine that mutates the grid or registry.
pub mod combat;
pub mod slide;

pub use combat::{CombatContext, CombatOutcome, ReactionGuard, TrapHit, resolve_collision};
pub use slide::{SlideResult, StopCause, resolve_slide, resolve_slide_bounded};
