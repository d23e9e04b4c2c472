//! Landmark Error Types

use thiserror::Error;

/// Errors while reading landmark geometry
#[derive(Debug, Clone, PartialEq, Error)]
pub enum LandmarkError {
    /// Frame contains no points
    #[error("Landmark frame is empty")]
    EmptyFrame,

    /// Requested landmark index is not present in the frame
    #[error("Landmark index {index} out of range (frame has {len} points)")]
    IndexOutOfRange { index: usize, len: usize },

    /// Coordinate is NaN or infinite
    #[error("Landmark {index} has a non-finite coordinate")]
    NonFinite { index: usize },

    /// Reference distance used as a denominator is zero
    #[error("Degenerate geometry: {0} is zero")]
    DegenerateGeometry(&'static str),

    /// Fewer points than a computation needs
    #[error("Expected at least {expected} points, got {actual}")]
    TooFewPoints { expected: usize, actual: usize },
}
