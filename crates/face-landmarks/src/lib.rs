//! Facial Landmark Frames
//!
//! Input-side types shared by the eye and expression analyzers:
//! - 2D points and distance helpers
//! - Immutable per-frame landmark arrays from an external detector
//! - Detector-specific landmark index sets
//! - Frame validation

mod error;
mod frame;
mod point;
mod topology;
mod validator;

pub use error::LandmarkError;
pub use frame::{unix_timestamp, EyeLandmarks, LandmarkFrame};
pub use point::{centroid, Point2};
pub use topology::{EyeIndices, LandmarkTopology};
pub use validator::{FrameValidator, ValidationConfig, ValidationResult};
