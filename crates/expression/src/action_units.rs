//! Facial action units from landmark geometry
//!
//! Image coordinates: y grows downwards, so a raised feature has a smaller y.

use std::collections::BTreeMap;

use face_landmarks::{LandmarkError, LandmarkFrame, LandmarkTopology, Point2};
use serde::{Deserialize, Serialize};

/// Facial action unit
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum ActionUnit {
    /// Inner brow raiser
    AU1,
    /// Outer brow raiser
    AU2,
    /// Brow lowerer (furrow)
    AU4,
    /// Lip corner puller (smile)
    AU12,
    /// Lip corner depressor (frown)
    AU15,
    /// Lip tightener
    AU23,
    /// Jaw drop
    AU26,
    /// Jaw clench relative to baseline width
    #[serde(rename = "JAW_CLENCH")]
    JawClench,
}

impl ActionUnit {
    pub const ALL: [ActionUnit; 8] = [
        ActionUnit::AU12,
        ActionUnit::AU15,
        ActionUnit::AU4,
        ActionUnit::AU1,
        ActionUnit::AU2,
        ActionUnit::AU26,
        ActionUnit::JawClench,
        ActionUnit::AU23,
    ];
}

/// AU intensities for one frame. Units that were not computed read as 0.0.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ActionUnits(BTreeMap<ActionUnit, f64>);

impl ActionUnits {
    pub fn get(&self, unit: ActionUnit) -> f64 {
        self.0.get(&unit).copied().unwrap_or(0.0)
    }

    pub fn set(&mut self, unit: ActionUnit, value: f64) {
        self.0.insert(unit, value);
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (ActionUnit, f64)> + '_ {
        self.0.iter().map(|(&unit, &value)| (unit, value))
    }
}

impl FromIterator<(ActionUnit, f64)> for ActionUnits {
    fn from_iter<I: IntoIterator<Item = (ActionUnit, f64)>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

/// Landmark at `index`, rejecting non-finite coordinates
pub(crate) fn point(frame: &LandmarkFrame, index: usize) -> Result<Point2, LandmarkError> {
    let p = frame.get(index)?;
    if p.is_finite() {
        Ok(p)
    } else {
        Err(LandmarkError::NonFinite { index })
    }
}

fn nonzero(value: f64, what: &'static str) -> Result<f64, LandmarkError> {
    if value == 0.0 {
        Err(LandmarkError::DegenerateGeometry(what))
    } else {
        Ok(value)
    }
}

fn unit(value: f64) -> f64 {
    value.clamp(0.0, 1.0)
}

/// Mouth corners, lip-center midpoint and mouth width
struct Mouth {
    left: Point2,
    right: Point2,
    upper: Point2,
    lower: Point2,
    width: f64,
}

impl Mouth {
    fn read(frame: &LandmarkFrame, topology: &LandmarkTopology) -> Result<Self, LandmarkError> {
        let left = point(frame, topology.mouth_corners.0)?;
        let right = point(frame, topology.mouth_corners.1)?;
        Ok(Self {
            left,
            right,
            upper: point(frame, topology.upper_lip)?,
            lower: point(frame, topology.lower_lip)?,
            width: left.distance(&right),
        })
    }

    fn center(&self) -> Point2 {
        self.upper.midpoint(&self.lower)
    }

    /// Sum of both corners' downward offsets from the mouth center
    fn corner_drop(&self) -> f64 {
        let center = self.center();
        (self.left.y - center.y) + (self.right.y - center.y)
    }

    fn height(&self) -> f64 {
        (self.upper.y - self.lower.y).abs()
    }
}

/// Vertical distance between the two face-height reference landmarks
pub(crate) fn face_height(frame: &LandmarkFrame, topology: &LandmarkTopology) -> Result<f64, LandmarkError> {
    let top = point(frame, topology.face_height.0)?;
    let bottom = point(frame, topology.face_height.1)?;
    nonzero((top.y - bottom.y).abs(), "face height")
}

/// AU12: corners raised above the mouth center
pub fn smile(frame: &LandmarkFrame, topology: &LandmarkTopology) -> Result<f64, LandmarkError> {
    let mouth = Mouth::read(frame, topology)?;
    let width = nonzero(mouth.width, "mouth width")?;
    let intensity = (-mouth.corner_drop() / (2.0 * width)).max(0.0);
    Ok(unit(intensity * 2.0))
}

/// AU15: corners lowered below the mouth center
pub fn frown(frame: &LandmarkFrame, topology: &LandmarkTopology) -> Result<f64, LandmarkError> {
    let mouth = Mouth::read(frame, topology)?;
    let width = nonzero(mouth.width, "mouth width")?;
    let intensity = (mouth.corner_drop() / (2.0 * width)).max(0.0);
    Ok(unit(intensity * 2.0))
}

/// AU4: inner brows pulled together relative to the outer brows
pub fn brow_furrow(frame: &LandmarkFrame, topology: &LandmarkTopology) -> Result<f64, LandmarkError> {
    let inner = point(frame, topology.inner_brows.0)?.distance(&point(frame, topology.inner_brows.1)?);
    let outer = point(frame, topology.outer_brows.0)?.distance(&point(frame, topology.outer_brows.1)?);
    let outer = nonzero(outer, "outer brow distance")?;
    Ok(unit((1.0 - inner / outer) * 3.0))
}

/// AU1: inner brows above the eye centers, relative to face height
pub fn inner_brow_raise(frame: &LandmarkFrame, topology: &LandmarkTopology) -> Result<f64, LandmarkError> {
    let left_eye = point(frame, topology.left_eye_corners.0)?.midpoint(&point(frame, topology.left_eye_corners.1)?);
    let right_eye = point(frame, topology.right_eye_corners.0)?.midpoint(&point(frame, topology.right_eye_corners.1)?);
    let left_brow = point(frame, topology.inner_brows.0)?;
    let right_brow = point(frame, topology.inner_brows.1)?;
    let height = face_height(frame, topology)?;

    let raise = (left_eye.y - left_brow.y) + (right_eye.y - right_brow.y);
    Ok(unit(raise / (2.0 * height) * 5.0))
}

/// AU2: outer brows above the outer eye corners, relative to face height
pub fn outer_brow_raise(frame: &LandmarkFrame, topology: &LandmarkTopology) -> Result<f64, LandmarkError> {
    let left_eye = point(frame, topology.outer_eye_corners.0)?;
    let right_eye = point(frame, topology.outer_eye_corners.1)?;
    let left_brow = point(frame, topology.outer_brows.0)?;
    let right_brow = point(frame, topology.outer_brows.1)?;
    let height = face_height(frame, topology)?;

    let raise = (left_eye.y - left_brow.y) + (right_eye.y - right_brow.y);
    Ok(unit(raise / (2.0 * height) * 5.0))
}

/// AU26: gap between lower jaw and upper lip, relative to face height
pub fn jaw_drop(frame: &LandmarkFrame, topology: &LandmarkTopology) -> Result<f64, LandmarkError> {
    let jaw = point(frame, topology.jaw_bottom)?;
    let lip = point(frame, topology.upper_lip)?;
    let height = face_height(frame, topology)?;
    Ok(unit((jaw.y - lip.y).abs() / height * 10.0))
}

/// Distance between the jaw angle landmarks
pub fn jaw_width(frame: &LandmarkFrame, topology: &LandmarkTopology) -> Result<f64, LandmarkError> {
    let left = point(frame, topology.jaw_width.0)?;
    let right = point(frame, topology.jaw_width.1)?;
    Ok(left.distance(&right))
}

/// JAW_CLENCH: relative widening of the jaw against a baseline width
pub fn jaw_clench(width: f64, baseline: f64) -> Result<f64, LandmarkError> {
    let baseline = nonzero(baseline, "baseline jaw width")?;
    Ok(unit((width - baseline) / baseline * 5.0))
}

/// AU23: lips pressed thin relative to mouth width
pub fn lip_tightness(frame: &LandmarkFrame, topology: &LandmarkTopology) -> Result<f64, LandmarkError> {
    let mouth = Mouth::read(frame, topology)?;
    let width = nonzero(mouth.width, "lip width")?;
    Ok(unit(1.0 - mouth.height() / width * 10.0))
}

/// Mouth height over width
pub fn mouth_aspect_ratio(frame: &LandmarkFrame, topology: &LandmarkTopology) -> Result<f64, LandmarkError> {
    let mouth = Mouth::read(frame, topology)?;
    let width = nonzero(mouth.width, "mouth width")?;
    Ok(mouth.height() / width)
}

/// Relative difference between each corner's distance to the upper lip center
pub fn mouth_asymmetry(frame: &LandmarkFrame, topology: &LandmarkTopology) -> Result<f64, LandmarkError> {
    let upper = point(frame, topology.upper_lip)?;
    let left = point(frame, topology.mouth_corners.0)?.distance(&upper);
    let right = point(frame, topology.mouth_corners.1)?.distance(&upper);
    Ok((left - right).abs() / left.max(right).max(1e-6))
}
