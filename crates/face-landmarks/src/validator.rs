//! Landmark frame validation

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::{LandmarkError, LandmarkFrame};

/// Validation configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ValidationConfig {
    /// Minimum number of points a usable frame must carry
    pub min_points: usize,
    /// Reject frames containing NaN/infinite coordinates
    pub require_finite: bool,
}

impl Default for ValidationConfig {
    fn default() -> Self {
        Self {
            min_points: 468,
            require_finite: true,
        }
    }
}

/// Result of validation
#[derive(Debug, Clone)]
pub struct ValidationResult {
    /// Whether the frame is usable
    pub valid: bool,
    /// List of validation errors
    pub errors: Vec<LandmarkError>,
    /// Number of points inspected
    pub points_checked: usize,
}

impl ValidationResult {
    /// Create a valid result
    pub fn valid(points_checked: usize) -> Self {
        Self {
            valid: true,
            errors: Vec::new(),
            points_checked,
        }
    }

    /// Create an invalid result with errors
    pub fn invalid(errors: Vec<LandmarkError>, points_checked: usize) -> Self {
        Self {
            valid: false,
            errors,
            points_checked,
        }
    }
}

/// Validator for detector output frames
pub struct FrameValidator {
    config: ValidationConfig,
}

impl FrameValidator {
    /// Create a new validator with given config
    pub fn new(config: ValidationConfig) -> Self {
        Self { config }
    }

    /// Check point count and coordinate sanity
    pub fn validate(&self, frame: &LandmarkFrame) -> ValidationResult {
        if frame.is_empty() {
            return ValidationResult::invalid(vec![LandmarkError::EmptyFrame], 0);
        }

        let mut errors = Vec::new();

        if frame.len() < self.config.min_points {
            errors.push(LandmarkError::TooFewPoints {
                expected: self.config.min_points,
                actual: frame.len(),
            });
        }

        if self.config.require_finite {
            errors.extend(
                frame
                    .points()
                    .iter()
                    .enumerate()
                    .filter(|(_, p)| !p.is_finite())
                    .map(|(index, _)| LandmarkError::NonFinite { index }),
            );
        }

        if errors.is_empty() {
            ValidationResult::valid(frame.len())
        } else {
            debug!("Frame rejected with {} validation errors", errors.len());
            ValidationResult::invalid(errors, frame.len())
        }
    }
}

impl Default for FrameValidator {
    fn default() -> Self {
        Self::new(ValidationConfig::default())
    }
}
