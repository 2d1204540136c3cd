//! Error types for ring validation and reduction.

use thiserror::Error;

/// Reasons a coordinate sequence is not a usable ring.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum MalformedRing {
    #[error("coordinate {index} is not finite")]
    NonFinite { index: usize },

    #[error("ring has {count} points, at least 4 are required")]
    TooFewPoints { count: usize },

    #[error("first and last points differ")]
    NotClosed,

    #[error("ring has {count} unique points, at least 3 are required")]
    TooFewUniquePoints { count: usize },
}

/// Errors raised by the reduction stages.
///
/// None of these abort a batch: the orchestrator maps each one to an outcome.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum Error {
    #[error("ring still has {vertices} vertices at the largest tolerance (max {max})")]
    StillTooComplex { vertices: usize, max: usize },

    #[error("degenerate geometry: {points} points, area {area_m2} m²")]
    DegenerateGeometry { points: usize, area_m2: f64 },

    #[error("malformed ring: {0}")]
    MalformedRing(#[from] MalformedRing),

    #[error("invalid configuration: {0}")]
    InvalidConfig(String),
}

/// Result type alias for reduction operations.
pub type Result<T> = std::result::Result<T, Error>;
