//! Error types for rope configuration and world management.
//!
//! The per-tick pipeline never fails; these errors are raised when a rope is
//! configured or looked up.

use std::fmt;

use crate::utils::allocator::EntityId;

/// Main error type for the crate.
#[derive(Debug, Clone, PartialEq)]
pub enum RopeError {
    /// Particle count outside the supported range.
    InvalidParticleCount {
        requested: usize,
        min: usize,
        max: usize,
    },
    /// Rope length must be positive and finite.
    InvalidRopeLength(f32),
    /// Stiffness outside the supported range.
    InvalidStiffness(f32),
    /// A chain was requested from an empty list of positions.
    EmptyPositions,
    /// No rope is registered under the given id.
    RopeNotFound(EntityId),
}

impl fmt::Display for RopeError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Self::InvalidParticleCount { requested, min, max } => write!(
                f,
                "particle count {requested} out of range ({min}..={max})"
            ),
            Self::InvalidRopeLength(length) => {
                write!(f, "rope length must be positive and finite, got {length}")
            }
            Self::InvalidStiffness(stiffness) => {
                write!(f, "stiffness {stiffness} out of supported range")
            }
            Self::EmptyPositions => write!(f, "cannot build a chain from no positions"),
            Self::RopeNotFound(id) => write!(f, "rope {id:?} not found"),
        }
    }
}

impl std::error::Error for RopeError {}

/// Convenient Result type alias for rope operations.
pub type Result<T> = std::result::Result<T, RopeError>;
