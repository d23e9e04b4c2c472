//! Neutral-face baseline measurements

use face_landmarks::{LandmarkError, LandmarkFrame, LandmarkTopology};
use serde::{Deserialize, Serialize};

use crate::action_units::{jaw_width, point};

/// Reference measurements of the driver's relaxed face (pixels).
/// Fields stay `None` until calibrated or, for the jaw width, first measured.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct BaselineMeasurements {
    pub mouth_width: Option<f64>,
    pub mouth_height: Option<f64>,
    pub eyebrow_distance: Option<f64>,
    pub jaw_width: Option<f64>,
}

impl BaselineMeasurements {
    /// Measure every baseline quantity from one frame. Fails without partial
    /// results if any required landmark is missing or non-finite.
    pub fn measure(frame: &LandmarkFrame, topology: &LandmarkTopology) -> Result<Self, LandmarkError> {
        if frame.is_empty() {
            return Err(LandmarkError::EmptyFrame);
        }

        let left_corner = point(frame, topology.mouth_corners.0)?;
        let right_corner = point(frame, topology.mouth_corners.1)?;
        let upper_lip = point(frame, topology.upper_lip)?;
        let lower_lip = point(frame, topology.lower_lip)?;
        let left_brow = point(frame, topology.inner_brows.0)?;
        let right_brow = point(frame, topology.inner_brows.1)?;

        Ok(Self {
            mouth_width: Some(left_corner.distance(&right_corner)),
            mouth_height: Some((upper_lip.y - lower_lip.y).abs()),
            eyebrow_distance: Some(left_brow.distance(&right_brow)),
            jaw_width: Some(jaw_width(frame, topology)?),
        })
    }

    pub fn is_calibrated(&self) -> bool {
        self.mouth_width.is_some()
            && self.mouth_height.is_some()
            && self.eyebrow_distance.is_some()
            && self.jaw_width.is_some()
    }
}
