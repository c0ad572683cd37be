//! Errors raised by the world's construction API.

use crate::world::PointKey;
use thiserror::Error;

/// Rejected attempts to build invalid entities.
///
/// The editor turns every one of these into a no-op; they only surface to
/// callers that build worlds programmatically.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum WorldError {
    #[error("mass must be positive and finite, got {0}")]
    InvalidMass(f32),
    #[error("a spring cannot connect a mass point to itself")]
    SelfSpring,
    #[error("mass point {0:?} is not part of the world")]
    UnknownMassPoint(PointKey),
    #[error("a spring already connects these mass points")]
    DuplicateSpring,
    #[error("spring rest length must be positive, got {0}")]
    InvalidRestLength(f32),
    #[error("a polygon obstacle needs at least 3 vertices, got {0}")]
    TooFewVertices(usize),
    #[error("grid must have at least one column and one row, got {columns}x{rows}")]
    InvalidGridDimensions { columns: usize, rows: usize },
    #[error("grid spacing must be positive and finite, got {0}")]
    InvalidSpacing(f32),
}
