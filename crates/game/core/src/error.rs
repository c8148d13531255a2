//! Common error infrastructure for jelly-core.
//!
//! Domain-specific errors (`GridError`, `RegistryError`, `DirectionError`,
//! `LevelError`, `EngineError`) live next to the code that raises them. They
//! all implement [`GameError`] so callers can classify failures uniformly.
//!
//! Gameplay outcomes (hitting a wall, dying, missing a target) are never
//! errors. Every error in this crate is a broken caller contract or a data
//! problem detected while loading a level.

/// Severity level of an error, used for categorization and logging priority.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ErrorSeverity {
    /// Invalid input from the caller; retrying with the same input fails again.
    ///
    /// Examples: unknown entity id, non-unit direction, malformed level.
    Validation,

    /// Unexpected state inconsistency inside the core.
    ///
    /// These indicate bugs and should be investigated.
    Internal,
}

impl ErrorSeverity {
    /// Returns a human-readable description of this severity level.
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Validation => "validation",
            Self::Internal => "internal",
        }
    }

    /// Returns true if this error indicates an internal bug.
    pub const fn is_internal(&self) -> bool {
        matches!(self, Self::Internal)
    }
}

/// Common trait for all jelly-core errors.
///
/// # Implementation Guidelines
///
/// - Use `#[derive(thiserror::Error)]` for the Display/Error impl
/// - Classify severity by who is at fault, not by impact
/// - Error codes are stable strings suitable for metrics and tests
pub trait GameError: core::fmt::Display + core::fmt::Debug {
    /// Returns the severity level of this error.
    fn severity(&self) -> ErrorSeverity;

    /// Returns a static string identifier for this error variant.
    fn error_code(&self) -> &'static str {
        core::any::type_name::<Self>()
    }
}
