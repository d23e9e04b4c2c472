//! Landmark frame types

use std::time::{SystemTime, UNIX_EPOCH};

use serde::{Deserialize, Serialize};

use crate::{LandmarkError, Point2};

/// Per-frame landmark array produced by the external detector.
///
/// Index layout is fixed by the detector topology; see [`crate::LandmarkTopology`].
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct LandmarkFrame {
    points: Vec<Point2>,
}

impl LandmarkFrame {
    /// Create a frame from detector output
    pub fn new(points: Vec<Point2>) -> Self {
        Self { points }
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub fn points(&self) -> &[Point2] {
        &self.points
    }

    /// Landmark at `index`
    pub fn get(&self, index: usize) -> Result<Point2, LandmarkError> {
        self.points
            .get(index)
            .copied()
            .ok_or(LandmarkError::IndexOutOfRange {
                index,
                len: self.points.len(),
            })
    }

    /// Landmarks at `indices`, in the given order
    pub fn select(&self, indices: &[usize]) -> Result<Vec<Point2>, LandmarkError> {
        indices.iter().map(|&i| self.get(i)).collect()
    }
}

impl From<Vec<Point2>> for LandmarkFrame {
    fn from(points: Vec<Point2>) -> Self {
        Self::new(points)
    }
}

impl FromIterator<Point2> for LandmarkFrame {
    fn from_iter<I: IntoIterator<Item = Point2>>(iter: I) -> Self {
        Self::new(iter.into_iter().collect())
    }
}

/// Eye-region landmarks for one frame. Either side may be missing.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct EyeLandmarks {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub left: Option<Vec<Point2>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub right: Option<Vec<Point2>>,
}

impl EyeLandmarks {
    pub fn new(left: Option<Vec<Point2>>, right: Option<Vec<Point2>>) -> Self {
        Self { left, right }
    }

    pub fn both(left: Vec<Point2>, right: Vec<Point2>) -> Self {
        Self::new(Some(left), Some(right))
    }

    pub fn is_empty(&self) -> bool {
        self.left.is_none() && self.right.is_none()
    }

    /// Present sides, left first
    pub fn sides(&self) -> impl Iterator<Item = &[Point2]> {
        self.left
            .as_deref()
            .into_iter()
            .chain(self.right.as_deref())
    }
}

/// Wall-clock capture time in seconds since the Unix epoch, used when a
/// frame arrives without its own timestamp
pub fn unix_timestamp() -> f64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs_f64())
        .unwrap_or(0.0)
}
